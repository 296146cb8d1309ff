//! Static fallback error page.

use std::io;

use minijinja::{Environment, Value};
use serde::Serialize;

use crate::data::to_render_data;
use crate::error::{Result, TemplateError};

/// Source of the fallback page. Parsed with default delimiters, independent
/// of any manager configuration.
pub const ERROR_PAGE_SOURCE: &str = r#"<html>
	<head>
		<title>{% if title %}{{ title }}{% else %}Server Error{% endif %}</title>
		<style>
			html, body {margin:0; padding:0; font-family: Verdana, Geneva, sans-serif;}
			body {background-color: #292929;}
			h1 {color: #fff; text-align: center;}
		</style>
	</head>
	<body>
		<h1>{% if message %}{{ message }}{% else %}Server Error{% endif %}</h1>
	</body>
</html>
"#;

const ERROR_PAGE_NAME: &str = "error.html";

/// A minimal styled HTML error page.
///
/// Accepts two optional fields, `title` and `message`. Each falls back to
/// `Server Error` when absent or empty. Values are HTML-escaped.
///
/// ```rust
/// use serde_json::json;
/// use vellum::ErrorTemplate;
///
/// let page = ErrorTemplate::new();
/// let html = page.render(&json!({"title": "Oops", "message": "bad"})).unwrap();
/// assert!(html.contains("<title>Oops</title>"));
/// assert!(html.contains("<h1>bad</h1>"));
/// ```
#[derive(Debug, Clone)]
pub struct ErrorTemplate {
    env: Environment<'static>,
}

impl ErrorTemplate {
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
        }
    }

    /// The page's template source.
    pub fn source(&self) -> &'static str {
        ERROR_PAGE_SOURCE
    }

    /// Renders the page into `out`.
    pub fn execute<W, S>(&self, out: W, data: &S) -> Result<()>
    where
        W: io::Write,
        S: Serialize + ?Sized,
    {
        let data = to_render_data(data)?;
        let tmpl = self
            .env
            .template_from_named_str(ERROR_PAGE_NAME, ERROR_PAGE_SOURCE)
            .map_err(|source| TemplateError::Parse {
                name: ERROR_PAGE_NAME.to_string(),
                source,
            })?;
        tmpl.render_to_write(Value::from_serialize(&data), out)
            .map_err(|source| TemplateError::Execute {
                name: ERROR_PAGE_NAME.to_string(),
                source,
            })?;
        Ok(())
    }

    /// Renders the page to a string.
    pub fn render<S: Serialize + ?Sized>(&self, data: &S) -> Result<String> {
        let mut out = Vec::new();
        self.execute(&mut out, data)?;
        String::from_utf8(out).map_err(|e| TemplateError::Data(e.to_string()))
    }
}

impl Default for ErrorTemplate {
    fn default() -> Self {
        Self::new()
    }
}
