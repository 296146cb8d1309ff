//! URL joining used by the `baseurl` and `staticurl` template helpers.

/// Joins `uri` onto `base`.
///
/// A `uri` starting with `/` is appended as is; anything else gets a `/`
/// separator. No normalization happens: a `base` ending in `/` combined with
/// an absolute `uri` yields a double slash, exactly as written.
///
/// ```rust
/// use vellum::join_url;
///
/// assert_eq!(join_url("https://cdn.example.com", "css/site.css"), "https://cdn.example.com/css/site.css");
/// assert_eq!(join_url("https://cdn.example.com", "/css/site.css"), "https://cdn.example.com/css/site.css");
/// ```
pub fn join_url(base: &str, uri: &str) -> String {
    if uri.starts_with('/') {
        format!("{base}{uri}")
    } else {
        format!("{base}/{uri}")
    }
}
