use crate::UrlError;
use url::Url;

/// Extracts the hostname from a URL
///
/// The host is lowercased; ports are not part of the result.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use hermes::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.COM:8080/path").unwrap();
/// assert_eq!(extract_host(&url).unwrap(), "example.com");
/// ```
pub fn extract_host(url: &Url) -> Result<String, UrlError> {
    url.host_str()
        .map(|h| h.to_lowercase())
        .ok_or(UrlError::MissingHost)
}

/// Returns the origin of a URL (scheme + host + port) as a cache key
///
/// Default ports are omitted, so `https://example.com:443/` and
/// `https://example.com/` share the key `https://example.com`.
pub fn origin_key(url: &Url) -> String {
    url.origin().ascii_serialization()
}

/// Checks whether two URLs share scheme, host, and port
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.origin() == b.origin()
}
