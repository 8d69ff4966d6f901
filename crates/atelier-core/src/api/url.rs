//! URL resolution for request paths.

use serde_json::Value;

/// True if `url` starts with an `http://` or `https://` scheme (any case).
pub fn has_http_scheme(url: &str) -> bool {
    let lower = url
        .get(..8)
        .unwrap_or(url)
        .to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// The API base as an absolute URL, without a trailing slash.
pub fn resolve_base(api_base: &str, origin: &str) -> String {
    let base = api_base.trim_end_matches('/');
    if has_http_scheme(base) {
        base.to_string()
    } else {
        let origin = origin.trim_end_matches('/');
        if base.is_empty() {
            origin.to_string()
        } else if base.starts_with('/') {
            format!("{}{}", origin, base)
        } else {
            format!("{}/{}", origin, base)
        }
    }
}

/// Resolve a request path against the configured base.
///
/// - absolute `http(s)` URLs are returned unchanged;
/// - paths starting with `/` are appended to the resolved base;
/// - anything else is treated as relative to the base.
pub fn build_url(path: &str, api_base: &str, origin: &str) -> String {
    if has_http_scheme(path) {
        return path.to_string();
    }
    let base = resolve_base(api_base, origin);
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

/// The same URL with `http` and `https` swapped. `None` for other schemes.
pub fn flip_scheme(url: &str) -> Option<String> {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    if lower.starts_with("https://") {
        Some(format!("http://{}", &url[8..]))
    } else if lower.starts_with("http://") {
        Some(format!("https://{}", &url[7..]))
    } else {
        None
    }
}

/// Form-encode the top-level fields of a JSON object as a query string.
///
/// Strings are sent raw, arrays are comma-joined, nested objects are sent as
/// JSON. Non-object values produce an empty query.
pub fn query_string(data: &Value) -> String {
    let Value::Object(map) = data else {
        return String::new();
    };
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in map {
        serializer.append_pair(key, &query_value(value));
    }
    serializer.finish()
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|v| match v {
                Value::Null => String::new(),
                other => query_value(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

/// Append `data` as a query string, joining with `&` if `url` already has one.
pub fn append_query(url: &str, data: &Value) -> String {
    let query = query_string(data);
    if query.is_empty() {
        return url.to_string();
    }
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}", url, separator, query)
}

/// Current page path plus a `redirect` query for the login page.
pub fn login_redirect(login_path: &str, current_path: &str) -> String {
    if current_path == "/" || current_path.is_empty() {
        login_path.to_string()
    } else {
        format!("{}?redirect={}", login_path, urlencoding::encode(current_path))
    }
}
