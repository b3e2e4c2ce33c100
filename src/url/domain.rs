use crate::{UrlError, UrlResult};
use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use dredge::url::extract_domain;
///
/// let url = Url::parse("https://Blog.Example.com/post").unwrap();
/// assert_eq!(extract_domain(&url), Some("blog.example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the `scheme://host[:port]` origin of a URL
///
/// Used as the cache key for per-domain robots policy and as the base
/// for conventional sitemap path probes.
pub fn origin_of(url: &Url) -> UrlResult<String> {
    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(url.origin().ascii_serialization())
}
