//! Cookie header parsing

use axum::http::{header, HeaderMap};

/// Value of the named cookie across all `Cookie` headers, if present and non-empty.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookie_str| cookie_str.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_cookie_value() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; admin-token=abc.def.ghi; other=1"),
        );

        assert_eq!(
            cookie_value(&headers, "admin-token").as_deref(),
            Some("abc.def.ghi")
        );
        assert_eq!(cookie_value(&headers, "theme").as_deref(), Some("dark"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn test_empty_cookie_is_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("admin-token="));
        assert_eq!(cookie_value(&headers, "admin-token"), None);
    }

    #[test]
    fn test_name_must_match_exactly() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("xadmin-token=nope"));
        assert_eq!(cookie_value(&headers, "admin-token"), None);
    }
}
