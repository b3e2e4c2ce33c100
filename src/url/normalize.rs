use crate::UrlError;
use url::Url;

/// Normalizes a URL into the canonical form used as a document key
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed or non-HTTP(S)
/// 2. Lowercase the scheme and host (the parser guarantees this)
/// 3. Strip trailing slashes from the path, except for the root `/`
/// 4. Remove the fragment (everything after `#`)
/// 5. Preserve query string and path parameters verbatim
///
/// Deterministic and idempotent: normalizing an already-normalized URL
/// is a no-op.
///
/// # Examples
///
/// ```
/// use dredge::url::normalize_url;
///
/// let url = normalize_url("HTTP://Example.com/Path/").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/Path");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    // Strip trailing slashes; the root path stays "/"
    let path = url.path();
    if path != "/" && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/').to_string();
        if trimmed.is_empty() {
            // An all-slash path collapses back to the root
            url.set_path("/");
        } else {
            url.set_path(&trimmed);
        }
    }

    url.set_fragment(None);

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_scheme_and_host() {
        let result = normalize_url("HTTP://EXAMPLE.COM/Page").unwrap();
        assert_eq!(result.as_str(), "http://example.com/Page");
    }

    #[test]
    fn test_path_case_preserved() {
        let result = normalize_url("https://example.com/Path/To/Page").unwrap();
        assert_eq!(result.as_str(), "https://example.com/Path/To/Page");
    }

    #[test]
    fn test_remove_trailing_slash() {
        let result = normalize_url("https://example.com/page/").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_keep_root_slash() {
        let result = normalize_url("https://example.com/").unwrap();
        assert_eq!(result.as_str(), "https://example.com/");
    }

    #[test]
    fn test_empty_path_becomes_root() {
        let result = normalize_url("https://example.com").unwrap();
        assert_eq!(result.as_str(), "https://example.com/");
    }

    #[test]
    fn test_remove_fragment() {
        let result = normalize_url("https://example.com/page#section").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_query_preserved() {
        let result = normalize_url("https://example.com/page?b=2&a=1").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page?b=2&a=1");
    }

    #[test]
    fn test_query_preserved_with_trailing_slash_stripped() {
        let result = normalize_url("https://example.com/page/?q=rust").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page?q=rust");
    }

    #[test]
    fn test_idempotent() {
        let once = normalize_url("HTTP://Example.com/Path/#frag").unwrap();
        let twice = normalize_url(once.as_str()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_case_and_slash_canonical() {
        let a = normalize_url("HTTP://Example.com/Path/").unwrap();
        let b = normalize_url("http://example.com/Path").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_multiple_trailing_slashes_collapse() {
        let result = normalize_url("https://example.com/page///").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_all_slash_path_becomes_root() {
        let result = normalize_url("https://example.com///").unwrap();
        assert_eq!(result.as_str(), "https://example.com/");
    }

    #[test]
    fn test_invalid_scheme() {
        let result = normalize_url("ftp://example.com/page");
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), UrlError::InvalidScheme(_)));
    }

    #[test]
    fn test_malformed_url() {
        let result = normalize_url("not a url");
        assert!(result.is_err());
    }

    #[test]
    fn test_port_preserved() {
        let result = normalize_url("http://example.com:8080/page/").unwrap();
        assert_eq!(result.as_str(), "http://example.com:8080/page");
    }
}
