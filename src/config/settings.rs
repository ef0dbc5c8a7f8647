//! Application settings loaded from config.toml
//!
//! The file is optional. It sets the currency symbol used in replies and lists
//! buckets to create on startup when no bucket with that name exists yet.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

fn default_currency_symbol() -> String {
    "₹".to_string()
}

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Symbol prefixed to every amount shown to users
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    /// Buckets to seed on startup
    #[serde(default)]
    pub buckets: Vec<BucketConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            buckets: Vec::new(),
        }
    }
}

/// Configuration for a single seeded bucket
#[derive(Debug, Deserialize, Clone)]
pub struct BucketConfig {
    /// Name of the bucket
    pub name: String,
    /// Share of each salary, 0 to 100
    pub percentage: f64,
    /// What the bucket is for
    pub purpose: String,
}

/// Parses settings from a TOML string.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads settings from a TOML file.
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A bucket entry is missing a required field
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    parse_config(&contents)
}

/// Loads settings from ./config.toml, falling back to defaults when the file is absent.
pub fn load_default_config() -> Result<AppConfig> {
    if !Path::new(DEFAULT_CONFIG_PATH).exists() {
        warn!("No {DEFAULT_CONFIG_PATH} found, using default settings.");
        return Ok(AppConfig::default());
    }

    let config = load_config(DEFAULT_CONFIG_PATH)?;
    info!(
        "Loaded {DEFAULT_CONFIG_PATH} with {} seeded bucket(s).",
        config.buckets.len()
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_parse_bucket_config() {
        let toml_str = r#"
            currency_symbol = "$"

            [[buckets]]
            name = "Emergency"
            percentage = 20.0
            purpose = "Six months of expenses"

            [[buckets]]
            name = "Travel"
            percentage = 10
            purpose = "Next trip"
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.buckets.len(), 2);
        assert_eq!(config.buckets[0].name, "Emergency");
        assert_eq!(config.buckets[0].percentage, 20.0);
        assert_eq!(config.buckets[1].percentage, 10.0);
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.currency_symbol, "₹");
        assert!(config.buckets.is_empty());
    }

    #[test]
    fn test_parse_config_missing_field() {
        let toml_str = r#"
            [[buckets]]
            name = "Emergency"
            percentage = 20.0
        "#;

        let result = parse_config(toml_str);
        assert!(matches!(result, Err(Error::Config { message: _ })));
    }
}
