//! Application workflows
//!
//! [`Hermes`] owns the configuration, the store, an HTTP client, and the one
//! browsing surface crawls run on. Each method is one user-facing workflow:
//! index a page, crawl a site, ask a question, and the bookkeeping around them.

use crate::answer::{Answer, AnsweringModel, Answerer, AnthropicModel};
use crate::config::{validate_settings, Config, CrawlSettings};
use crate::crawler::{
    build_http_client, CrawlOutcome, CrawlRequest, Crawler, FetchError, HttpPageFetcher,
    PageFetcher, ProgressSink, Surface,
};
use crate::document::Document;
use crate::output::{load_statistics, IndexStatistics};
use crate::robots::RobotsCache;
use crate::storage::{ChatMessage, DomainRecord, NewChatMessage, SqliteStorage, Storage};
use crate::url::{extract_host, normalize_url};
use crate::Result;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;

/// Timeout for a single answering model call
const ANSWER_TIMEOUT: Duration = Duration::from_secs(120);

pub struct Hermes {
    config: Config,
    storage: SqliteStorage,
    client: Client,
    surface: Surface,
}

impl Hermes {
    /// Creates the application around an already-open store
    pub fn new(config: Config, storage: SqliteStorage) -> Result<Self> {
        let client = build_http_client(&config.user_agent, page_load_timeout(&config))?;

        Ok(Self {
            config,
            storage,
            client,
            surface: Surface::new(),
        })
    }

    /// Opens the database named in the config and creates the application
    pub fn open(config: Config) -> Result<Self> {
        let storage = SqliteStorage::new(Path::new(&config.storage.database_path))?;
        tracing::debug!("Opened database {}", config.storage.database_path);
        Self::new(config, storage)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    /// Crawl settings in effect: persisted ones, else the config defaults
    pub fn settings(&self) -> Result<CrawlSettings> {
        Ok(self
            .storage
            .get_settings()?
            .unwrap_or_else(|| self.config.crawler.default_settings()))
    }

    /// Validates and persists new crawl settings
    pub fn update_settings(&mut self, settings: CrawlSettings) -> Result<()> {
        validate_settings(&settings)?;
        self.storage.update_settings(&settings)?;
        tracing::info!(
            "Settings updated: max {} pages, {}ms delay, robots.txt {}",
            settings.max_pages_per_crawl,
            settings.crawl_delay_ms,
            if settings.respect_robots_txt { "respected" } else { "ignored" }
        );
        Ok(())
    }

    /// Fetches a single page and stores it
    ///
    /// robots.txt is not consulted; indexing one page is an explicit user action.
    pub async fn index_page(&mut self, url: &str) -> Result<Document> {
        let url = normalize_url(url)?;
        let fetcher = HttpPageFetcher::new(self.client.clone());
        let timeout = page_load_timeout(&self.config);

        match tokio::time::timeout(timeout, fetcher.navigate(&mut self.surface, &url)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(FetchError::NavigationTimeout {
                    url: url.to_string(),
                    timeout,
                }
                .into())
            }
        }

        let page = fetcher.extract_document(&self.surface).await?;
        let final_url = normalize_url(&page.url)?;
        let domain = extract_host(&final_url)?;

        let document = Document {
            url: final_url.to_string(),
            title: page.title,
            content: page.content,
            description: page.description,
            domain: domain.clone(),
            fetched_at: page.timestamp,
        };

        self.storage.put_document(&document)?;
        self.storage.add_domain(&domain)?;

        tracing::info!("Indexed {} ({} characters)", document.url, document.content.len());
        Ok(document)
    }

    /// Crawls a site and stores every collected document
    ///
    /// # Arguments
    ///
    /// * `url` - Start URL; fixes the origin
    /// * `max_pages` - Requested budget, capped by the persisted settings
    /// * `progress` - Receives one event per page visit
    pub async fn crawl_site(
        &mut self,
        url: &str,
        max_pages: Option<u32>,
        progress: &ProgressSink,
    ) -> Result<CrawlOutcome> {
        let settings = self.settings()?;
        let max_pages = max_pages
            .unwrap_or(settings.max_pages_per_crawl)
            .min(settings.max_pages_per_crawl);

        let start_url = normalize_url(url)?;
        let robots = RobotsCache::new(self.client.clone(), self.config.user_agent.robots_token());
        let crawler = Crawler::new(HttpPageFetcher::new(self.client.clone()), robots)
            .with_page_load_timeout(page_load_timeout(&self.config));

        let request = CrawlRequest {
            start_url,
            max_pages: max_pages as usize,
            delay: Duration::from_millis(settings.crawl_delay_ms),
            respect_robots: settings.respect_robots_txt,
        };

        let outcome = crawler.crawl(&mut self.surface, request, progress).await?;

        self.storage.put_documents(&outcome.documents)?;
        self.storage.add_domain(&outcome.origin_host)?;

        tracing::info!(
            "Stored {} of {} requested pages for {}",
            outcome.document_count,
            outcome.max_pages,
            outcome.origin_host
        );
        Ok(outcome)
    }

    /// Answers a question with the configured Anthropic model
    pub async fn ask(&mut self, question: &str, domain: Option<&str>) -> Result<Answer> {
        let client = Client::builder().timeout(ANSWER_TIMEOUT).build()?;
        let model = AnthropicModel::from_env(client, &self.config.answering)?;
        self.ask_with(model, question, domain).await
    }

    /// Answers a question with any model and records the exchange
    pub async fn ask_with<M: AnsweringModel>(
        &mut self,
        model: M,
        question: &str,
        domain: Option<&str>,
    ) -> Result<Answer> {
        let documents = self.storage.get_documents(None)?;
        let answerer = Answerer::from_config(model, &self.config.retrieval);

        let answer = answerer.ask(question, &documents, domain).await?;

        let domain = domain.map(str::to_string);
        self.storage
            .add_chat_message(&NewChatMessage::user(question, domain.clone()))?;
        self.storage.add_chat_message(&NewChatMessage::assistant(
            answer.answer.clone(),
            answer.sources.clone(),
            domain,
        ))?;

        Ok(answer)
    }

    /// Whether the answering API key is present in the environment
    pub fn has_api_key(&self) -> bool {
        std::env::var(&self.config.answering.api_key_env)
            .map(|key| !key.trim().is_empty())
            .unwrap_or(false)
    }

    pub fn stats(&self) -> Result<IndexStatistics> {
        load_statistics(&self.storage, self.has_api_key())
    }

    pub fn domains(&self) -> Result<Vec<DomainRecord>> {
        Ok(self.storage.get_domains()?)
    }

    /// Removes a domain and its documents
    ///
    /// # Returns
    ///
    /// The number of documents removed
    pub fn remove_domain(&mut self, domain: &str) -> Result<u64> {
        Ok(self.storage.remove_domain(domain)?)
    }

    /// Removes every document and domain
    pub fn clear_all(&mut self) -> Result<()> {
        self.storage.clear_all()?;
        tracing::info!("Cleared all indexed data");
        Ok(())
    }

    pub fn chat_history(&self) -> Result<Vec<ChatMessage>> {
        Ok(self.storage.get_chat_history()?)
    }

    pub fn clear_chat_history(&mut self) -> Result<()> {
        Ok(self.storage.clear_chat_history()?)
    }
}

fn page_load_timeout(config: &Config) -> Duration {
    Duration::from_secs(config.crawler.page_load_timeout_secs)
}
