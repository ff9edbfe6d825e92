use crate::config::types::{BatchConfig, Config, CrawlerConfig, OutputConfig, StorageBackend, UserAgentConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_batch_config(&config.batch)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.worker_count < 1 || config.worker_count > 64 {
        return Err(ConfigError::Validation(format!(
            "worker_count must be between 1 and 64, got {}",
            config.worker_count
        )));
    }

    if config.max_attempts < 1 || config.max_attempts > 10 {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be between 1 and 10, got {}",
            config.max_attempts
        )));
    }

    if config.retry_delay_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "retry_delay_ms must be <= 60000ms, got {}ms",
            config.retry_delay_ms
        )));
    }

    if config.request_timeout_secs < 1 || config.request_timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be between 1 and 300, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
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

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    match config.backend {
        StorageBackend::Files if config.directory.as_os_str().is_empty() => Err(
            ConfigError::Validation("directory cannot be empty".to_string()),
        ),
        StorageBackend::Sqlite if config.database_path.as_os_str().is_empty() => Err(
            ConfigError::Validation("database_path cannot be empty".to_string()),
        ),
        _ => Ok(()),
    }
}

/// Validates batch configuration
fn validate_batch_config(config: &BatchConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_jobs < 1 || config.max_concurrent_jobs > 64 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_jobs must be between 1 and 64, got {}",
            config.max_concurrent_jobs
        )));
    }

    Ok(())
}
