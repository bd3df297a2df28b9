//! Robots.txt handling module
//!
//! This module provides parsing of robots.txt files into rulesets, URL policy
//! checks against those rulesets, and a per-session cache that fetches each
//! origin's robots.txt on first use.

mod cache;
mod matcher;
mod parser;

pub use cache::RobotsCache;
pub use matcher::PathPattern;
pub use parser::{RobotsRuleset, RobotsVerdict, VerdictReason};

use std::time::Duration;

/// Chooses the per-page delay for a crawl
///
/// A `Crawl-delay` declared by the site replaces the requested delay entirely,
/// whether it is longer or shorter.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use hermes::robots::{effective_delay, RobotsRuleset};
///
/// let robots = RobotsRuleset::parse("User-agent: *\nCrawl-delay: 5", "Hermes");
/// assert_eq!(
///     effective_delay(Duration::from_millis(500), &robots),
///     Duration::from_millis(5000)
/// );
/// ```
pub fn effective_delay(requested: Duration, ruleset: &RobotsRuleset) -> Duration {
    ruleset
        .crawl_delay_ms
        .map(Duration::from_millis)
        .unwrap_or(requested)
}
