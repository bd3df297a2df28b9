//! Per-session robots.txt cache
//!
//! A [`RobotsCache`] belongs to one crawl session. Each origin's robots.txt is
//! fetched lazily, at most once, and shared by every lookup that follows.

use crate::robots::RobotsRuleset;
use crate::url::origin_key;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use url::Url;

/// Origin-keyed cache of parsed robots.txt rules
///
/// The map lock is held across the fetch so concurrent lookups for the same
/// origin never fetch twice.
pub struct RobotsCache {
    client: Client,
    agent_token: String,
    rulesets: Mutex<HashMap<String, Arc<RobotsRuleset>>>,
}

impl RobotsCache {
    /// Creates an empty cache
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client used to download robots.txt
    /// * `agent_token` - This crawler's user-agent token for group selection
    pub fn new(client: Client, agent_token: impl Into<String>) -> Self {
        Self {
            client,
            agent_token: agent_token.into(),
            rulesets: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the ruleset for the origin of `url`, fetching it on first use
    ///
    /// Fetch failures and non-success responses yield an empty ruleset.
    pub async fn resolve(&self, url: &Url) -> Arc<RobotsRuleset> {
        let key = origin_key(url);
        let mut rulesets = self.rulesets.lock().await;

        if let Some(ruleset) = rulesets.get(&key) {
            tracing::trace!("Using cached robots.txt for {}", key);
            return Arc::clone(ruleset);
        }

        let ruleset = Arc::new(self.fetch(&key).await);
        rulesets.insert(key, Arc::clone(&ruleset));
        ruleset
    }

    /// Seeds the cache with an already-known ruleset for an origin
    pub async fn insert(&self, url: &Url, ruleset: RobotsRuleset) {
        self.rulesets
            .lock()
            .await
            .insert(origin_key(url), Arc::new(ruleset));
    }

    /// Returns the number of origins cached so far
    pub async fn len(&self) -> usize {
        self.rulesets.lock().await.len()
    }

    /// Returns true if nothing has been cached yet
    pub async fn is_empty(&self) -> bool {
        self.rulesets.lock().await.is_empty()
    }

    async fn fetch(&self, origin: &str) -> RobotsRuleset {
        let robots_url = format!("{}/robots.txt", origin);
        tracing::debug!("Fetching robots.txt: {}", robots_url);

        let response = match self.client.get(&robots_url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Could not fetch {}, treating as unrestricted: {}", robots_url, e);
                return RobotsRuleset::allow_all();
            }
        };

        if !response.status().is_success() {
            tracing::debug!(
                "{} returned HTTP {}, treating as unrestricted",
                robots_url,
                response.status().as_u16()
            );
            return RobotsRuleset::allow_all();
        }

        match response.text().await {
            Ok(body) => RobotsRuleset::parse(&body, &self.agent_token),
            Err(e) => {
                tracing::warn!("Could not read {}, treating as unrestricted: {}", robots_url, e);
                RobotsRuleset::allow_all()
            }
        }
    }
}
