//! Query keyword extraction

/// Common English function words that never count as keywords
pub const STOP_WORDS: &[&str] = &[
    "the", "is", "at", "which", "on", "a", "an", "and", "or", "but", "in", "with", "to", "for",
    "of", "as", "by", "that", "this", "from", "are", "was", "were", "been", "be", "have", "has",
    "had", "do", "does", "did", "will", "would", "should", "could", "may", "might", "must", "can",
    "what", "when", "where", "who", "how", "why",
];

/// Tokens this short or shorter are dropped
const MIN_KEYWORD_CHARS: usize = 4;

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Extracts scoring keywords from a query
///
/// Lower-cases the query, splits on whitespace, and keeps tokens longer than
/// three characters that are not stop words. Order and duplicates are kept.
///
/// # Example
///
/// ```
/// use hermes::retrieval::keywords;
///
/// assert_eq!(keywords("How does Machine Learning work?"), vec!["machine", "learning", "work?"]);
/// assert!(keywords("the is at").is_empty());
/// ```
pub fn keywords(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .filter(|token| token.chars().count() >= MIN_KEYWORD_CHARS && !is_stop_word(token))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_short_tokens() {
        assert_eq!(keywords("api key rust crate"), vec!["rust", "crate"]);
    }

    #[test]
    fn test_drops_stop_words_of_any_length() {
        assert!(keywords("which where would should").is_empty());
    }

    #[test]
    fn test_lowercases() {
        assert_eq!(keywords("Tokio RUNTIME"), vec!["tokio", "runtime"]);
    }

    #[test]
    fn test_keeps_duplicates() {
        assert_eq!(keywords("rust rust"), vec!["rust", "rust"]);
    }

    #[test]
    fn test_blank_query() {
        assert!(keywords("   ").is_empty());
    }

    #[test]
    fn test_stop_word_list_size() {
        assert_eq!(STOP_WORDS.len(), 45);
    }
}
