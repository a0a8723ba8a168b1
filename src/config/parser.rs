use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Reads, parses and validates a configuration file
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let (config, _) = read_config(path)?;
    validate(&config)?;
    Ok(config)
}

/// Reads and parses a configuration file without validating it
///
/// Returns the config together with the SHA-256 of the file content. The
/// binary applies command-line overrides first and validates the merged
/// result.
pub fn read_config(path: &Path) -> Result<(Config, String), ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    Ok((config, content_hash(&content)))
}

/// Parses TOML content; every section and key is optional
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Hex SHA-256 of the configuration text
///
/// Logged at startup and written to the report, so two archives can be
/// traced back to the same settings.
pub fn content_hash(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}
