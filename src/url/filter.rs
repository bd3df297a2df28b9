use crate::url::domain::same_origin;
use crate::url::normalize::normalize_url;
use url::Url;

/// File extensions that never hold readable page content
pub const BINARY_EXTENSIONS: &[&str] = &[
    // documents
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".odt",
    // images
    ".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg", ".bmp", ".ico",
    // archives
    ".zip", ".gz", ".tgz", ".tar", ".rar", ".7z",
    // executables
    ".exe", ".msi", ".dmg", ".apk",
];

/// Checks if a URL path ends in one of the binary file extensions
///
/// The comparison is case-insensitive.
pub fn is_binary_path(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    BINARY_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Decides whether a discovered link may enter the crawl frontier
///
/// Returns the normalized absolute URL when the link:
/// - resolves against `base` to an http(s) URL,
/// - contains no `#` fragment marker anywhere,
/// - shares scheme, host, and port with `origin`,
/// - does not end in a binary file extension.
///
/// Returns `None` otherwise.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use hermes::url::crawlable_link;
///
/// let origin = Url::parse("https://x.com/").unwrap();
/// assert!(crawlable_link("/guide", &origin, &origin).is_some());
/// assert!(crawlable_link("https://x.com/doc.pdf", &origin, &origin).is_none());
/// assert!(crawlable_link("/guide#install", &origin, &origin).is_none());
/// assert!(crawlable_link("https://y.com/", &origin, &origin).is_none());
/// ```
pub fn crawlable_link(href: &str, base: &Url, origin: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.contains('#') {
        return None;
    }

    let absolute = base.join(href).ok()?;

    if !same_origin(&absolute, origin) {
        return None;
    }

    if is_binary_path(absolute.path()) {
        return None;
    }

    normalize_url(absolute.as_str()).ok()
}
