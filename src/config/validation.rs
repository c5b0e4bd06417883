use crate::config::types::{CollectionConfig, Config, FetcherConfig, RetryConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_collection_config(&config.collection)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_retry_config(&config.retry)?;

    if config.output.root.is_empty() {
        return Err(ConfigError::Validation(
            "output root cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the collection section
fn validate_collection_config(config: &CollectionConfig) -> Result<(), ConfigError> {
    validate_collection_name(&config.name)?;
    validate_http_url("sample-metadata-url", &config.sample_metadata_url)?;

    if config.first_edition_id > config.last_edition_id {
        return Err(ConfigError::Validation(format!(
            "first-edition-id ({}) must not exceed last-edition-id ({})",
            config.first_edition_id, config.last_edition_id
        )));
    }

    if config.size < 1 {
        return Err(ConfigError::Validation(format!(
            "collection size must be >= 1, got {}",
            config.size
        )));
    }

    Ok(())
}

/// Validates the fetcher section
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.page_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "page-timeout must be >= 1ms, got {}ms",
            config.page_timeout
        )));
    }

    validate_http_url("gateway-base", &config.gateway_base)?;

    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the retry section
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.max_stuck_count < 1 {
        return Err(ConfigError::Validation(format!(
            "max-stuck-count must be >= 1, got {}",
            config.max_stuck_count
        )));
    }

    if config.max_delay < config.delay {
        return Err(ConfigError::Validation(format!(
            "max-delay ({}ms) must be >= delay ({}ms)",
            config.max_delay, config.delay
        )));
    }

    Ok(())
}

/// The collection name becomes a directory, so it must be a single path component
fn validate_collection_name(name: &str) -> Result<(), ConfigError> {
    if name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "collection name cannot be empty".to_string(),
        ));
    }

    if name == "." || name == ".." || name.contains('/') || name.contains('\\') {
        return Err(ConfigError::Validation(format!(
            "collection name must be a single directory name, got '{}'",
            name
        )));
    }

    Ok(())
}

fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(())
}
