//! Client IP extraction
//!
//! The site runs behind a single reverse proxy, which sets `X-Forwarded-For` / `X-Real-IP`.
//! The resolved address is only used as a rate-limit key.

use axum::http::HeaderMap;
use std::net::IpAddr;

/// Address used when no proxy header identifies the caller
pub const FALLBACK_CLIENT_IP: &str = "127.0.0.1";

/// Resolve the caller IP: the first `X-Forwarded-For` entry, else `X-Real-IP`, else
/// [`FALLBACK_CLIENT_IP`].
///
/// Header values that do not parse as an IP address are ignored.
pub fn extract_client_ip(headers: &HeaderMap) -> String {
    if let Some(forwarded_for) = headers.get("x-forwarded-for") {
        if let Ok(header_value) = forwarded_for.to_str() {
            if let Some(ip) = header_value
                .split(',')
                .map(|s| s.trim())
                .find(|s| !s.is_empty())
                .filter(|s| is_valid_ip(s))
            {
                return ip.to_string();
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip") {
        if let Ok(header_value) = real_ip.to_str() {
            let trimmed = header_value.trim();
            if is_valid_ip(trimmed) {
                return trimmed.to_string();
            }
        }
    }

    FALLBACK_CLIENT_IP.to_string()
}

/// Validate that a string is a valid IPv4 or IPv6 address
fn is_valid_ip(ip_str: &str) -> bool {
    ip_str.parse::<IpAddr>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_forwarded_for_first_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.2"));
        assert_eq!(extract_client_ip(&headers), "203.0.113.7");
    }

    #[test]
    fn test_real_ip_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static(" 2001:db8::1 "));
        assert_eq!(extract_client_ip(&headers), "2001:db8::1");
    }

    #[test]
    fn test_invalid_forwarded_for_falls_through() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("not-an-ip"));
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.2"));
        assert_eq!(extract_client_ip(&headers), "198.51.100.2");
    }

    #[test]
    fn test_default_loopback() {
        assert_eq!(extract_client_ip(&HeaderMap::new()), FALLBACK_CLIENT_IP);
    }
}
