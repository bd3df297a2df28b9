//! Path pattern matching for robots.txt rules
//!
//! Patterns are matched against the URL path without building a regular
//! expression. A pattern with no `*` is a literal prefix; otherwise it is split
//! into literal segments that must appear in order, the first one anchored at
//! the start of the path.

use std::fmt;

/// A compiled robots.txt path pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    kind: PatternKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PatternKind {
    /// No wildcard: plain prefix comparison
    Prefix,
    /// Literal pieces between `*` characters, in order
    Wildcard(Vec<String>),
}

impl PathPattern {
    /// Compiles a pattern string
    pub fn new(raw: &str) -> Self {
        let kind = if raw.contains('*') {
            PatternKind::Wildcard(raw.split('*').map(str::to_string).collect())
        } else {
            PatternKind::Prefix
        };

        Self {
            raw: raw.to_string(),
            kind,
        }
    }

    /// Returns the pattern as written in robots.txt
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Checks whether the pattern matches the given path
    ///
    /// Matching is case-sensitive and anchored at the start of the path only;
    /// anything may follow the last literal piece.
    pub fn matches(&self, path: &str) -> bool {
        match &self.kind {
            PatternKind::Prefix => path.starts_with(&self.raw),
            PatternKind::Wildcard(pieces) => match_pieces(pieces, path),
        }
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Matches literal pieces in order, first one anchored at position 0
///
/// Taking the leftmost occurrence of each later piece is always sufficient
/// because the pattern has no end anchor.
fn match_pieces(pieces: &[String], path: &str) -> bool {
    let Some((first, rest)) = pieces.split_first() else {
        return true;
    };

    if !path.starts_with(first.as_str()) {
        return false;
    }

    let mut cursor = first.len();
    for piece in rest {
        if piece.is_empty() {
            continue;
        }
        match path[cursor..].find(piece.as_str()) {
            Some(offset) => cursor += offset + piece.len(),
            None => return false,
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_prefix() {
        let pattern = PathPattern::new("/private");
        assert!(pattern.matches("/private"));
        assert!(pattern.matches("/private/x"));
        assert!(pattern.matches("/privateer"));
        assert!(!pattern.matches("/public/private"));
    }

    #[test]
    fn test_case_sensitive() {
        let pattern = PathPattern::new("/Admin");
        assert!(pattern.matches("/Admin/users"));
        assert!(!pattern.matches("/admin/users"));
    }

    #[test]
    fn test_wildcard_middle() {
        let pattern = PathPattern::new("/*/secret");
        assert!(pattern.matches("/a/secret"));
        assert!(pattern.matches("/a/b/c/secret/more"));
        assert!(!pattern.matches("/secret"));
        assert!(!pattern.matches("a/secret"));
    }

    #[test]
    fn test_wildcard_anchored_at_start() {
        let pattern = PathPattern::new("/shop*cart");
        assert!(pattern.matches("/shop/cart"));
        assert!(pattern.matches("/shopping-cart"));
        assert!(!pattern.matches("/x/shop/cart"));
    }

    #[test]
    fn test_trailing_wildcard() {
        let pattern = PathPattern::new("/tmp*");
        assert!(pattern.matches("/tmp"));
        assert!(pattern.matches("/tmp/file"));
        assert!(!pattern.matches("/tm"));
    }

    #[test]
    fn test_leading_wildcard() {
        let pattern = PathPattern::new("*.json");
        assert!(pattern.matches("/data/feed.json"));
        assert!(pattern.matches("/feed.json?page=2"));
        assert!(!pattern.matches("/feed.xml"));
    }

    #[test]
    fn test_consecutive_wildcards() {
        let pattern = PathPattern::new("/a**b");
        assert!(pattern.matches("/a/x/b"));
        assert!(pattern.matches("/ab"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let pattern = PathPattern::new("/search?q=(.+)");
        assert!(pattern.matches("/search?q=(.+)&page=1"));
        assert!(!pattern.matches("/search?q=rust"));
    }

    #[test]
    fn test_pieces_do_not_overlap() {
        let pattern = PathPattern::new("/aba*aba");
        assert!(!pattern.matches("/aba"));
        assert!(pattern.matches("/abaaba"));
    }

    #[test]
    fn test_display_is_raw_pattern() {
        let pattern = PathPattern::new("/*/x");
        assert_eq!(pattern.to_string(), "/*/x");
        assert_eq!(pattern.as_str(), "/*/x");
    }
}
