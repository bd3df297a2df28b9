//! Context block rendering

use crate::document::Document;

/// Default character budget per document
pub const DEFAULT_CHARS_PER_DOCUMENT: usize = 2000;

/// Appended after content that was cut to the budget
pub const TRUNCATION_MARKER: &str = "[... content truncated]";

/// Renders documents as numbered source blocks for the answering model
///
/// Blocks keep input order. Content longer than `chars_per_document`
/// characters is cut to exactly that many and followed by
/// [`TRUNCATION_MARKER`] on its own line.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use hermes::retrieval::build_context;
/// use hermes::Document;
///
/// let doc = Document {
///     url: "https://example.com/".to_string(),
///     title: "Home".to_string(),
///     content: "Welcome".to_string(),
///     description: String::new(),
///     domain: "example.com".to_string(),
///     fetched_at: Utc::now(),
/// };
///
/// let context = build_context(&[doc], 2000);
/// assert!(context.starts_with("\n--- Source 1 ---\nURL: https://example.com/\n"));
/// ```
pub fn build_context(documents: &[Document], chars_per_document: usize) -> String {
    let mut context = String::new();

    for (i, document) in documents.iter().enumerate() {
        let (content, truncated) = truncate_chars(&document.content, chars_per_document);

        context.push_str(&format!(
            "\n--- Source {} ---\nURL: {}\nTitle: {}\nDomain: {}\nContent: {}\n",
            i + 1,
            document.url,
            document.title,
            document.domain,
            content
        ));

        if truncated {
            context.push_str(TRUNCATION_MARKER);
            context.push('\n');
        }
    }

    context
}

/// Cuts `text` to at most `max_chars` characters on a char boundary
fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => (&text[..byte_index], true),
        None => (text, false),
    }
}
