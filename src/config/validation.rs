use crate::config::types::{
    AnsweringConfig, Config, CrawlSettings, CrawlerConfig, RetrievalConfig, StorageConfig,
    UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

/// Allowed range for pages per crawl
const MAX_PAGES_RANGE: std::ops::RangeInclusive<u32> = 1..=100;

/// Allowed range for the per-page settle delay (milliseconds)
const CRAWL_DELAY_RANGE: std::ops::RangeInclusive<u64> = 500..=10_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_storage_config(&config.storage)?;
    validate_retrieval_config(&config.retrieval)?;
    validate_answering_config(&config.answering)?;
    Ok(())
}

/// Validates crawl settings, whether from the config file or the store
pub fn validate_settings(settings: &CrawlSettings) -> Result<(), ConfigError> {
    if !MAX_PAGES_RANGE.contains(&settings.max_pages_per_crawl) {
        return Err(ConfigError::Validation(format!(
            "max_pages_per_crawl must be between {} and {}, got {}",
            MAX_PAGES_RANGE.start(),
            MAX_PAGES_RANGE.end(),
            settings.max_pages_per_crawl
        )));
    }

    if !CRAWL_DELAY_RANGE.contains(&settings.crawl_delay_ms) {
        return Err(ConfigError::Validation(format!(
            "crawl_delay_ms must be between {}ms and {}ms, got {}ms",
            CRAWL_DELAY_RANGE.start(),
            CRAWL_DELAY_RANGE.end(),
            settings.crawl_delay_ms
        )));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_settings(&config.default_settings())?;

    if config.page_load_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "page_load_timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Crawler name doubles as the robots.txt token: alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    Ok(())
}

/// Validates storage configuration
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates retrieval configuration
fn validate_retrieval_config(config: &RetrievalConfig) -> Result<(), ConfigError> {
    if config.limit < 1 {
        return Err(ConfigError::Validation(format!(
            "limit must be >= 1, got {}",
            config.limit
        )));
    }

    if config.context_chars_per_document < 1 {
        return Err(ConfigError::Validation(
            "context_chars_per_document must be >= 1".to_string(),
        ));
    }

    for (name, weight) in [
        ("combined_weight", config.combined_weight),
        ("title_weight", config.title_weight),
        ("partial_weight", config.partial_weight),
    ] {
        if !weight.is_finite() || weight < 0.0 {
            return Err(ConfigError::Validation(format!(
                "{} must be a non-negative number, got {}",
                name, weight
            )));
        }
    }

    Ok(())
}

/// Validates answering model configuration
fn validate_answering_config(config: &AnsweringConfig) -> Result<(), ConfigError> {
    Url::parse(&config.api_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid api_url: {}", e)))?;

    if config.model.trim().is_empty() {
        return Err(ConfigError::Validation("model cannot be empty".to_string()));
    }

    if config.max_tokens < 1 {
        return Err(ConfigError::Validation(
            "max_tokens must be >= 1".to_string(),
        ));
    }

    if config.api_key_env.trim().is_empty() {
        return Err(ConfigError::Validation(
            "api_key_env cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(max_pages: u32, delay: u64) -> CrawlSettings {
        CrawlSettings {
            max_pages_per_crawl: max_pages,
            crawl_delay_ms: delay,
            respect_robots_txt: true,
        }
    }

    #[test]
    fn test_validate_settings_bounds() {
        assert!(validate_settings(&settings(1, 500)).is_ok());
        assert!(validate_settings(&settings(100, 10_000)).is_ok());

        assert!(validate_settings(&settings(0, 2000)).is_err());
        assert!(validate_settings(&settings(101, 2000)).is_err());
        assert!(validate_settings(&settings(50, 499)).is_err());
        assert!(validate_settings(&settings(50, 10_001)).is_err());
    }

    #[test]
    fn test_validate_crawler_name() {
        let mut config = UserAgentConfig {
            crawler_name: "Hermes-Bot".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/bot".to_string(),
        };
        assert!(validate_user_agent_config(&config).is_ok());

        config.crawler_name = "Hermes Bot".to_string();
        assert!(validate_user_agent_config(&config).is_err());

        config.crawler_name = String::new();
        assert!(validate_user_agent_config(&config).is_err());
    }

    #[test]
    fn test_validate_contact_url() {
        let config = UserAgentConfig {
            crawler_name: "Hermes".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "not a url".to_string(),
        };
        assert!(matches!(
            validate_user_agent_config(&config),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_validate_retrieval_weights() {
        let mut config = RetrievalConfig::default();
        assert!(validate_retrieval_config(&config).is_ok());

        config.title_weight = -1.0;
        assert!(validate_retrieval_config(&config).is_err());

        config = RetrievalConfig::default();
        config.partial_weight = f64::NAN;
        assert!(validate_retrieval_config(&config).is_err());

        config = RetrievalConfig::default();
        config.limit = 0;
        assert!(validate_retrieval_config(&config).is_err());
    }

    #[test]
    fn test_validate_answering_defaults() {
        assert!(validate_answering_config(&AnsweringConfig::default()).is_ok());

        let config = AnsweringConfig {
            max_tokens: 0,
            ..AnsweringConfig::default()
        };
        assert!(validate_answering_config(&config).is_err());
    }
}
