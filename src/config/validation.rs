use crate::config::types::{Config, CrawlerConfig, OutputConfig, RendererConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_renderer_config(&config.renderer)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawl scope and traversal settings
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    for seed in &config.seeds {
        validate_seed(seed)?;
    }

    validate_non_empty_entries("whitelist", &config.whitelist)?;
    validate_non_empty_entries("filetype-blacklist", &config.filetype_blacklist)?;

    if config.max_attempts < 1 || config.max_attempts > 10 {
        return Err(ConfigError::Validation(format!(
            "max-attempts must be between 1 and 10, got {}",
            config.max_attempts
        )));
    }

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max-pages must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates renderer settings
fn validate_renderer_config(config: &RendererConfig) -> Result<(), ConfigError> {
    if config.timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "timeout-ms must be >= 100ms, got {}ms",
            config.timeout_ms
        )));
    }

    for (name, value) in [
        ("viewport-width", config.viewport_width),
        ("viewport-height", config.viewport_height),
    ] {
        if !(100..=10_000).contains(&value) {
            return Err(ConfigError::Validation(format!(
                "{} must be between 100 and 10000, got {}",
                name, value
            )));
        }
    }

    if let Some(selector) = &config.cookie_selector {
        if selector.trim().is_empty() {
            return Err(ConfigError::Validation(
                "cookie-selector cannot be empty".to_string(),
            ));
        }
    }

    validate_non_empty_entries("download-extensions", &config.download_extensions)?;

    Ok(())
}

/// Validates output settings
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "directory cannot be empty".to_string(),
        ));
    }

    if config.archive_directory.is_empty() {
        return Err(ConfigError::Validation(
            "archive-directory cannot be empty".to_string(),
        ));
    }

    if config.quality > 100 {
        return Err(ConfigError::Validation(format!(
            "quality must be between 0 and 100, got {}",
            config.quality
        )));
    }

    if config.recompress && config.cwebp_path.is_empty() {
        return Err(ConfigError::Validation(
            "cwebp-path cannot be empty when recompress is enabled".to_string(),
        ));
    }

    Ok(())
}

/// Validates a seed URL: absolute, HTTP(S), with a host
fn validate_seed(seed: &str) -> Result<(), ConfigError> {
    let url = Url::parse(seed)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Seed URL '{}' must use HTTP or HTTPS",
            seed
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' has no host",
            seed
        )));
    }

    Ok(())
}

fn validate_non_empty_entries(name: &str, entries: &[String]) -> Result<(), ConfigError> {
    if entries.iter().any(|e| e.trim().is_empty()) {
        return Err(ConfigError::Validation(format!(
            "{} cannot contain empty entries",
            name
        )));
    }
    Ok(())
}
