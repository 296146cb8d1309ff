//! Built-in template helpers.

use std::sync::Arc;

use minijinja::{Error, ErrorKind, Value};

use super::engine::HelperFn;
use crate::url::join_url;

/// Helper joining a path onto the base URL.
pub const BASE_URL_HELPER: &str = "baseurl";

/// Helper joining a path onto the static-asset URL.
pub const STATIC_URL_HELPER: &str = "staticurl";

/// Wraps a plain function as a [`HelperFn`].
///
/// ```rust
/// use minijinja::Value;
/// use vellum::helper;
///
/// let twice = helper(|args: &[Value]| {
///     let n = args.first().and_then(|v| i64::try_from(v.clone()).ok()).unwrap_or(0);
///     Ok(Value::from(n * 2))
/// });
/// assert_eq!(twice(&[Value::from(21)]).unwrap(), Value::from(42));
/// ```
pub fn helper<F>(f: F) -> HelperFn
where
    F: Fn(&[Value]) -> Result<Value, Error> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A helper taking one string argument and joining it onto `base`.
///
/// The joined URL is a plain string, so auto-escaping applies to it like any
/// other value. The argument may come from render data.
pub(crate) fn url_helper(name: &'static str, base: String) -> HelperFn {
    helper(move |args: &[Value]| match args {
        [uri] => {
            let uri = uri.as_str().ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidOperation,
                    format!("{} expects a string argument", name),
                )
            })?;
            Ok(Value::from(join_url(&base, uri)))
        }
        _ => Err(Error::new(
            ErrorKind::InvalidOperation,
            format!("{} expects exactly one argument, got {}", name, args.len()),
        )),
    })
}
