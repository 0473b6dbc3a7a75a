//! CORS origin configuration.
//!
//! Origins come from the `ALLOWED_ORIGINS` environment variable as a
//! comma-separated list. No wildcard origins: an explicit whitelist is
//! required, and entries that are not http(s) URLs are dropped.

use axum::http::HeaderValue;

/// Origins used when `ALLOWED_ORIGINS` is unset or empty.
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";

/// Parse a comma-separated origin whitelist into header values.
///
/// Whitespace around entries is tolerated; non-URL entries are filtered out.
/// An empty input falls back to [`DEFAULT_ALLOWED_ORIGINS`].
pub fn parse_allowed_origins(raw: &str) -> Vec<HeaderValue> {
    let source = if raw.trim().is_empty() {
        DEFAULT_ALLOWED_ORIGINS
    } else {
        raw
    };

    source
        .split(',')
        .map(str::trim)
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .filter_map(|s| s.parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_origin() {
        let origins = parse_allowed_origins("https://docqa.example.com");
        assert_eq!(origins.len(), 1);
        assert_eq!(origins[0].to_str().unwrap(), "https://docqa.example.com");
    }

    #[test]
    fn test_multiple_origins_with_whitespace() {
        let origins =
            parse_allowed_origins("https://docqa.example.com, http://localhost:3000 ,https://app.example.com");
        assert_eq!(origins.len(), 3);
    }

    #[test]
    fn test_invalid_entries_filtered() {
        let origins = parse_allowed_origins("https://valid.com,not-a-url,http://localhost:3000");
        assert_eq!(origins.len(), 2);
    }

    #[test]
    fn test_empty_uses_defaults() {
        let origins = parse_allowed_origins("");
        assert!(!origins.is_empty());
        assert_eq!(origins[0].to_str().unwrap(), DEFAULT_ALLOWED_ORIGINS);
    }
}
