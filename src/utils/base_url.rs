//! Public base URL resolution for building short links.

use axum::http::{HeaderMap, header};

const DEFAULT_HOST: &str = "localhost:8080";
const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Resolves the base that short codes are appended to.
///
/// A configured base wins (trailing `/` removed). Otherwise the base is
/// rebuilt from the request:
/// - scheme is `http` unless `X-Forwarded-Proto` names another one (first
///   comma-separated value)
/// - host comes from `Host`, falling back to `localhost:8080`
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert(header::HOST, "sho.rt".parse().unwrap());
///
/// assert_eq!(resolve_base_url(None, &headers), "http://sho.rt");
/// ```
pub fn resolve_base_url(configured: Option<&str>, headers: &HeaderMap) -> String {
    if let Some(base) = configured.map(str::trim).filter(|b| !b.is_empty()) {
        return base.trim_end_matches('/').to_string();
    }

    let scheme = header_str(headers, FORWARDED_PROTO)
        .and_then(|proto| proto.split(',').next())
        .map(str::trim)
        .filter(|proto| !proto.is_empty())
        .unwrap_or("http");

    let host = header_str(headers, header::HOST.as_str()).unwrap_or(DEFAULT_HOST);

    format!("{scheme}://{host}")
}

/// Joins a base and a code into a short URL.
pub fn short_url(base: &str, code: &str) -> String {
    format!("{base}/{code}")
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_configured_base_wins() {
        let h = headers(&[("host", "ignored.example")]);
        assert_eq!(
            resolve_base_url(Some("https://sho.rt/"), &h),
            "https://sho.rt"
        );
    }

    #[test]
    fn test_blank_configured_base_is_ignored() {
        let h = headers(&[("host", "api.example.com")]);
        assert_eq!(resolve_base_url(Some("  "), &h), "http://api.example.com");
    }

    #[test]
    fn test_host_with_port() {
        let h = headers(&[("host", "localhost:3000")]);
        assert_eq!(resolve_base_url(None, &h), "http://localhost:3000");
    }

    #[test]
    fn test_missing_host_falls_back() {
        assert_eq!(
            resolve_base_url(None, &HeaderMap::new()),
            "http://localhost:8080"
        );
    }

    #[test]
    fn test_forwarded_proto_first_value() {
        let h = headers(&[
            ("host", "sho.rt"),
            ("x-forwarded-proto", "https, http"),
        ]);
        assert_eq!(resolve_base_url(None, &h), "https://sho.rt");
    }

    #[test]
    fn test_short_url_join() {
        assert_eq!(short_url("https://sho.rt", "abc123"), "https://sho.rt/abc123");
    }
}
