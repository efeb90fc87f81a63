use crate::config::types::{Config, CrawlerConfig, DownloaderConfig, OutputConfig};
use crate::ConfigError;

/// Upper bound on concurrent downloads
pub const MAX_WORKERS_LIMIT: usize = 64;

/// Upper bound on recorded `data:` references
pub const DATA_URL_LIMIT_MAX: usize = 10_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_downloader_config(&config.downloader)?;
    validate_output_config(&config.output)?;
    Ok(())
}

fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    Ok(())
}

fn validate_downloader_config(config: &DownloaderConfig) -> Result<(), ConfigError> {
    if config.max_workers < 1 || config.max_workers > MAX_WORKERS_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_workers must be between 1 and {}, got {}",
            MAX_WORKERS_LIMIT, config.max_workers
        )));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if let Some(directory) = &config.directory {
        if directory.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output directory cannot be empty".to_string(),
            ));
        }
    }

    if config.data_url_limit > DATA_URL_LIMIT_MAX {
        return Err(ConfigError::Validation(format!(
            "data_url_limit must be <= {}, got {}",
            DATA_URL_LIMIT_MAX, config.data_url_limit
        )));
    }

    Ok(())
}
