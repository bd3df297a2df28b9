use serde::{Deserialize, Serialize};

/// Main configuration structure for Hermes
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub answering: AnsweringConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CrawlerConfig {
    /// Upper bound on pages fetched by one crawl
    pub max_pages_per_crawl: u32,

    /// Settle delay before extracting each page (milliseconds)
    pub crawl_delay_ms: u64,

    /// Whether robots.txt is consulted before crawling
    pub respect_robots_txt: bool,

    /// How long navigation may take before the page is skipped (seconds)
    pub page_load_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages_per_crawl: 50,
            crawl_delay_ms: 2000,
            respect_robots_txt: true,
            page_load_timeout_secs: 30,
        }
    }
}

impl CrawlerConfig {
    /// Returns the crawl settings this config provides when none are stored
    pub fn default_settings(&self) -> CrawlSettings {
        CrawlSettings {
            max_pages_per_crawl: self.max_pages_per_crawl,
            crawl_delay_ms: self.crawl_delay_ms,
            respect_robots_txt: self.respect_robots_txt,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler; also the robots.txt user-agent token
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: String,
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }

    /// The token matched against robots.txt `User-agent` lines
    pub fn robots_token(&self) -> &str {
        &self.crawler_name
    }
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StorageConfig {
    /// Path to the SQLite database file
    pub database_path: String,
}

/// Retrieval and context configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RetrievalConfig {
    /// Number of documents handed to the answering model
    pub limit: usize,

    /// Character budget per document in the context block
    pub context_chars_per_document: usize,

    /// Weight per keyword occurrence in title + content
    pub combined_weight: f64,

    /// Extra weight per keyword occurrence in the title
    pub title_weight: f64,

    /// Bonus per word containing the keyword
    pub partial_weight: f64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            limit: 5,
            context_chars_per_document: 2000,
            combined_weight: 2.0,
            title_weight: 5.0,
            partial_weight: 0.5,
        }
    }
}

/// Answering model configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct AnsweringConfig {
    /// Messages endpoint of the answering model
    pub api_url: String,

    /// Model identifier sent with each request
    pub model: String,

    /// Maximum tokens in the generated answer
    pub max_tokens: u32,

    /// Environment variable holding the API key
    pub api_key_env: String,
}

impl Default for AnsweringConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.anthropic.com/v1/messages".to_string(),
            model: "claude-sonnet-4-5-20250929".to_string(),
            max_tokens: 2048,
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
        }
    }
}

/// Crawl settings persisted in the store
///
/// When present they take precedence over the `[crawler]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlSettings {
    pub max_pages_per_crawl: u32,
    pub crawl_delay_ms: u64,
    pub respect_robots_txt: bool,
}
