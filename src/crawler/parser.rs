//! HTML parser for extracting readable text, metadata, and links
//!
//! This module handles parsing HTML content to extract:
//! - Page title and meta description
//! - Readable text from the main content container
//! - Links to follow (from <a> tags)

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Containers tried in order when looking for the main content
const CONTENT_SELECTORS: &[&str] = &[
    "main",
    "[role=\"main\"]",
    "article",
    "#content",
    ".content",
    "#main",
    ".main",
    "body",
];

/// Elements whose text never counts as page content
const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "nav", "footer", "header", "iframe", "noscript", "svg", "button",
];

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// The `<meta name="description">` content
    pub description: Option<String>,

    /// Readable text, one trimmed non-empty line per text block
    pub text: String,

    /// All links found on the page (absolute URLs)
    pub links: Vec<String>,
}

/// Parses HTML content and extracts text, metadata, and links
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags anywhere in the document
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links (same page anchors)
///
/// Same-origin and file-type filtering happen later, in
/// [`crawlable_link`](crate::url::crawlable_link).
///
/// # Example
///
/// ```
/// use hermes::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><main><p>Hello</p><a href="/page">Link</a></main></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.links, vec!["https://example.com/page".to_string()]);
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        description: extract_description(&document),
        text: extract_text(&document),
        links: extract_links(&document, base_url),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts the meta description from the HTML document
fn extract_description(document: &Html) -> Option<String> {
    let selector = Selector::parse("meta[name=\"description\"]").ok()?;

    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts readable text from the first matching content container
fn extract_text(document: &Html) -> String {
    let root = CONTENT_SELECTORS
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .find_map(|selector| document.select(&selector).next());

    match root {
        Some(root) => clean_text(&collect_text(root)),
        None => String::new(),
    }
}

/// Collects text nodes under `root`, leaving out anything inside a skipped tag
///
/// Text nodes are concatenated without a separator, so inline markup inside a
/// word (`<b>tok</b>io`) leaves the word whole. Line structure comes from the
/// whitespace already in the document.
fn collect_text(root: ElementRef<'_>) -> String {
    let mut text_content = String::new();

    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node
            .ancestors()
            .take_while(|ancestor| ancestor.id() != root.id())
            .filter_map(|ancestor| ancestor.value().as_element())
            .any(|element| SKIPPED_TAGS.contains(&element.name()));

        if !hidden {
            text_content.push_str(text);
        }
    }

    text_content
}

/// Trims every line and drops the empty ones
fn clean_text(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extracts all valid links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            // Skip if it has the download attribute
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
        Some(absolute_url.to_string())
    } else {
        None
    }
}
