//! Robots.txt parser and policy evaluation
//!
//! Only the groups addressed to the wildcard agent or to this crawler's own
//! token are kept. Evaluation checks allow rules before disallow rules; within
//! each list the first matching pattern wins.

use crate::robots::matcher::PathPattern;
use std::fmt;
use url::Url;

/// Parsed robots.txt rules that apply to this crawler
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RobotsRuleset {
    /// Patterns from `Disallow` lines, in file order
    pub disallowed: Vec<PathPattern>,

    /// Patterns from `Allow` lines, in file order
    pub allowed: Vec<PathPattern>,

    /// `Crawl-delay` converted to milliseconds
    pub crawl_delay_ms: Option<u64>,
}

/// Why a URL was allowed or refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictReason {
    ExplicitlyAllowed,
    Disallowed,
    NotRestricted,
}

impl fmt::Display for VerdictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::ExplicitlyAllowed => "explicitly allowed",
            Self::Disallowed => "disallowed",
            Self::NotRestricted => "not restricted",
        };
        f.write_str(text)
    }
}

/// Result of checking one URL against a ruleset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RobotsVerdict {
    pub allowed: bool,
    pub crawl_delay_ms: Option<u64>,
    pub reason: VerdictReason,
    pub matched_pattern: Option<String>,
}

impl RobotsRuleset {
    /// Creates a ruleset with no restrictions
    ///
    /// This is used when robots.txt cannot be fetched.
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Parses robots.txt content
    ///
    /// # Arguments
    ///
    /// * `content` - The raw robots.txt body
    /// * `agent_token` - This crawler's user-agent token, compared case-insensitively
    ///
    /// # Returns
    ///
    /// The rules from groups addressed to `*` or to `agent_token`. Parsing
    /// never fails; malformed lines are skipped.
    pub fn parse(content: &str, agent_token: &str) -> Self {
        let mut ruleset = Self::default();
        let mut applies = false;

        for line in content.lines() {
            let trimmed = line.trim();

            // Skip comments and empty lines
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let Some((key, value)) = trimmed.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim();

            match key.as_str() {
                "user-agent" => {
                    applies = value == "*" || value.eq_ignore_ascii_case(agent_token);
                }
                _ if !applies => {}
                // An empty rule restricts nothing
                "disallow" if !value.is_empty() => {
                    ruleset.disallowed.push(PathPattern::new(value));
                }
                "allow" if !value.is_empty() => {
                    ruleset.allowed.push(PathPattern::new(value));
                }
                "crawl-delay" => {
                    if let Some(ms) = parse_crawl_delay(value) {
                        ruleset.crawl_delay_ms = Some(ms);
                    }
                }
                _ => {}
            }
        }

        ruleset
    }

    /// Returns true if the ruleset restricts nothing
    pub fn is_empty(&self) -> bool {
        self.disallowed.is_empty() && self.allowed.is_empty() && self.crawl_delay_ms.is_none()
    }

    /// Checks whether a URL may be crawled
    ///
    /// `url` may be an absolute URL or a bare path. Every allow pattern is
    /// tried first; if none match, every disallow pattern is tried; if none
    /// match either, the URL is allowed.
    pub fn is_allowed(&self, url: &str) -> RobotsVerdict {
        let path = request_path(url);

        if let Some(pattern) = self.allowed.iter().find(|p| p.matches(&path)) {
            return RobotsVerdict {
                allowed: true,
                crawl_delay_ms: self.crawl_delay_ms,
                reason: VerdictReason::ExplicitlyAllowed,
                matched_pattern: Some(pattern.to_string()),
            };
        }

        if let Some(pattern) = self.disallowed.iter().find(|p| p.matches(&path)) {
            return RobotsVerdict {
                allowed: false,
                crawl_delay_ms: self.crawl_delay_ms,
                reason: VerdictReason::Disallowed,
                matched_pattern: Some(pattern.to_string()),
            };
        }

        RobotsVerdict {
            allowed: true,
            crawl_delay_ms: self.crawl_delay_ms,
            reason: VerdictReason::NotRestricted,
            matched_pattern: None,
        }
    }
}

/// Converts a `Crawl-delay` value in seconds to milliseconds
fn parse_crawl_delay(value: &str) -> Option<u64> {
    let seconds: f64 = value.parse().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    Some((seconds * 1000.0).round() as u64)
}

/// Extracts the path (and query, if any) that robots rules are matched against
fn request_path(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => match parsed.query() {
            Some(query) => format!("{}?{}", parsed.path(), query),
            None => parsed.path().to_string(),
        },
        Err(_) => url.to_string(),
    }
}
