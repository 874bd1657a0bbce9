use crate::config::types::{Config, CrawlConfig, OutputConfig, SearchConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_search_config(&config.search)?;
    validate_crawl_config(&config.crawl)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the search endpoint and filters
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.search_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid search-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "search-url '{}' must use http or https",
            config.search_url
        )));
    }

    if !config.sort.split(',').any(|s| !s.trim().is_empty()) {
        return Err(ConfigError::Validation(format!(
            "sort must contain at least one directive, got '{}'",
            config.sort
        )));
    }

    Ok(())
}

/// Validates crawl behavior settings
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    // limit == 0 is accepted: every genre gets an empty file

    if config.max_concurrent_genres == Some(0) {
        return Err(ConfigError::Validation(
            "max-concurrent-genres must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}
