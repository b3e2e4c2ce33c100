use crate::config::types::{Config, DbConfig, LogicConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_logic_config(&config.logic)?;
    validate_db_config(&config.db)?;
    Ok(())
}

/// Validates crawl behavior configuration
fn validate_logic_config(config: &LogicConfig) -> Result<(), ConfigError> {
    if !config.delay.is_finite() || config.delay < 0.0 {
        return Err(ConfigError::Validation(format!(
            "delay must be a non-negative number of seconds, got {}",
            config.delay
        )));
    }

    if config.recheck_interval == 0 {
        return Err(ConfigError::Validation(
            "recheck_interval must be >= 1 second".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    for source in &config.sources {
        if source.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "source with url '{}' has an empty name",
                source.url
            )));
        }

        let url = Url::parse(&source.url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid source URL '{}': {}", source.url, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Source URL '{}' must use an HTTP(S) scheme",
                source.url
            )));
        }
    }

    Ok(())
}

/// Validates database configuration
fn validate_db_config(config: &DbConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "db path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
