/// Keyword extraction from short URLs
use crate::settings::sanitize_base_url;
use url::Url;

/// Reduce a short URL or bare keyword to the keyword YOURLS expects
///
/// - "https://sho.rt/abcd" with base "https://sho.rt" → "abcd"
/// - "abcd" → "abcd"
/// - "https://sho.rt/abcd?x=1#top" → "abcd"
/// - a full URL on another host → its last path segment
pub fn extract_keyword(base: &str, value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }

    let base = sanitize_base_url(base);
    if !base.is_empty() {
        if let Some(rest) = value.strip_prefix(&format!("{}/", base)) {
            return last_segment(rest).to_string();
        }
    }

    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => url
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .map(|s| s.to_string())
            .unwrap_or_default(),
        _ => value.to_string(),
    }
}

/// Last path segment with query and fragment removed
pub fn last_segment(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    path[..end]
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or("")
}

/// Whether a URL points at a link on the configured server
pub fn is_short_url(base: &str, url: &str) -> bool {
    let base = sanitize_base_url(base);
    !base.is_empty() && url.starts_with(&base) && url.len() > base.len() + 1
}

/// Only http(s) URLs can be shortened
pub fn is_http_url(value: &str) -> bool {
    let lower = value.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://short.example.com";

    #[test]
    fn test_extract_keyword_from_short_url() {
        assert_eq!(extract_keyword(BASE, "https://short.example.com/abcd"), "abcd");
    }

    #[test]
    fn test_extract_keyword_bare() {
        assert_eq!(extract_keyword(BASE, "abcd"), "abcd");
        assert_eq!(extract_keyword(BASE, "  abcd  "), "abcd");
    }

    #[test]
    fn test_extract_keyword_base_with_trailing_slash() {
        assert_eq!(extract_keyword("https://short.example.com/", "https://short.example.com/abcd"), "abcd");
    }

    #[test]
    fn test_extract_keyword_strips_query_and_fragment() {
        assert_eq!(extract_keyword(BASE, "https://short.example.com/abcd?utm=1"), "abcd");
        assert_eq!(extract_keyword(BASE, "https://short.example.com/abcd#x"), "abcd");
        assert_eq!(extract_keyword(BASE, "https://short.example.com/abcd/"), "abcd");
    }

    #[test]
    fn test_extract_keyword_subdirectory_install() {
        let base = "https://example.com/yourls";
        assert_eq!(extract_keyword(base, "https://example.com/yourls/xyz"), "xyz");
    }

    #[test]
    fn test_extract_keyword_other_host() {
        assert_eq!(extract_keyword(BASE, "https://other.example.org/k1"), "k1");
    }

    #[test]
    fn test_extract_keyword_empty() {
        assert_eq!(extract_keyword(BASE, ""), "");
        assert_eq!(extract_keyword(BASE, "https://short.example.com/"), "");
    }

    #[test]
    fn test_is_short_url() {
        assert!(is_short_url(BASE, "https://short.example.com/abcd"));
        assert!(!is_short_url(BASE, "https://short.example.com/"));
        assert!(!is_short_url(BASE, "https://example.org/page"));
        assert!(!is_short_url("", "https://example.org/page"));
    }

    #[test]
    fn test_is_http_url() {
        assert!(is_http_url("https://example.com"));
        assert!(is_http_url("HTTP://EXAMPLE.COM"));
        assert!(!is_http_url("ftp://example.com"));
        assert!(!is_http_url("example.com"));
    }
}
