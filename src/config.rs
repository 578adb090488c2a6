//! Configuration management for the EstateAI application
//!
//! Handles loading configuration from files and environment variables and
//! validates all settings. The loaded struct is passed into each collaborator
//! constructor at startup; there are no module-level globals.

use crate::EstateAiError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the EstateAI application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstateAiConfig {
    /// Geocoding API configuration
    pub geocoding: GeocodingConfig,
    /// Place search API configuration
    pub places: PlacesConfig,
    /// Open-data portal configuration
    pub open_data: OpenDataConfig,
    /// Language model API configuration
    pub llm: LlmConfig,
    /// Search tuning
    pub search: SearchConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Geocoding API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Geocoding API key
    pub api_key: Option<String>,
    /// Base URL for the geocoding API
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for failed requests
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

/// Place search API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesConfig {
    /// Places API key
    pub api_key: Option<String>,
    /// Base URL for the places API
    #[serde(default = "default_places_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for failed requests
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

/// Open-data portal configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenDataConfig {
    /// Base URL for the open-data portal
    #[serde(default = "default_open_data_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for failed requests
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Number of reference records to request per fetch
    #[serde(default = "default_record_limit")]
    pub record_limit: u32,
}

/// Language model API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key for the language model provider
    pub api_key: Option<String>,
    /// Base URL for the chat completions API
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    /// Model identifier
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_seconds: u32,
}

/// Search tuning settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Radius for school searches in meters
    #[serde(default = "default_school_radius")]
    pub school_radius_m: u32,
    /// Radius for transit searches in meters
    #[serde(default = "default_transit_radius")]
    pub transit_radius_m: u32,
    /// Radius for parks and community centre searches in meters
    #[serde(default = "default_parks_radius")]
    pub parks_radius_m: u32,
    /// Time budget for the concurrent parks fetches, in seconds
    #[serde(default = "default_parks_budget")]
    pub parks_budget_seconds: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_geocoding_base_url() -> String {
    "https://maps.googleapis.com/maps/api/geocode/json".to_string()
}

fn default_places_base_url() -> String {
    "https://maps.googleapis.com/maps/api/place".to_string()
}

fn default_open_data_base_url() -> String {
    "https://opendata.vancouver.ca".to_string()
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout() -> u32 {
    10
}

fn default_llm_timeout() -> u32 {
    20
}

fn default_max_retries() -> u32 {
    3
}

fn default_record_limit() -> u32 {
    194
}

fn default_school_radius() -> u32 {
    1000
}

fn default_transit_radius() -> u32 {
    1000
}

fn default_parks_radius() -> u32 {
    1500
}

fn default_parks_budget() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for EstateAiConfig {
    fn default() -> Self {
        Self {
            geocoding: GeocodingConfig {
                api_key: None,
                base_url: default_geocoding_base_url(),
                timeout_seconds: default_timeout(),
                max_retries: default_max_retries(),
            },
            places: PlacesConfig {
                api_key: None,
                base_url: default_places_base_url(),
                timeout_seconds: default_timeout(),
                max_retries: default_max_retries(),
            },
            open_data: OpenDataConfig {
                base_url: default_open_data_base_url(),
                timeout_seconds: default_timeout(),
                max_retries: default_max_retries(),
                record_limit: default_record_limit(),
            },
            llm: LlmConfig {
                api_key: None,
                base_url: default_llm_base_url(),
                model: default_llm_model(),
                timeout_seconds: default_llm_timeout(),
            },
            search: SearchConfig {
                school_radius_m: default_school_radius(),
                transit_radius_m: default_transit_radius(),
                parks_radius_m: default_parks_radius(),
                parks_budget_seconds: default_parks_budget(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
            },
        }
    }
}

impl EstateAiConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Add environment variable overrides with ESTATEAI_ prefix
        builder = builder.add_source(
            Environment::with_prefix("ESTATEAI")
                .separator("_")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: EstateAiConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("estateai").join("config.toml"))
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        for (name, key) in [
            ("Geocoding", &self.geocoding.api_key),
            ("Places", &self.places.api_key),
            ("Language model", &self.llm.api_key),
        ] {
            if let Some(api_key) = key {
                if api_key.is_empty() {
                    return Err(EstateAiError::config(format!(
                        "{name} API key cannot be empty if provided. Either remove it or provide a valid key."
                    ))
                    .into());
                }

                if api_key.len() > 200 {
                    return Err(EstateAiError::config(format!(
                        "{name} API key appears to be invalid (too long). Please check your API key."
                    ))
                    .into());
                }
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        for (name, timeout) in [
            ("Geocoding", self.geocoding.timeout_seconds),
            ("Places", self.places.timeout_seconds),
            ("Open-data", self.open_data.timeout_seconds),
            ("Language model", self.llm.timeout_seconds),
        ] {
            if timeout == 0 || timeout > 300 {
                return Err(EstateAiError::config(format!(
                    "{name} timeout must be between 1 and 300 seconds"
                ))
                .into());
            }
        }

        for (name, retries) in [
            ("Geocoding", self.geocoding.max_retries),
            ("Places", self.places.max_retries),
            ("Open-data", self.open_data.max_retries),
        ] {
            if retries > 10 {
                return Err(EstateAiError::config(format!(
                    "{name} max retries cannot exceed 10"
                ))
                .into());
            }
        }

        for (name, radius) in [
            ("School", self.search.school_radius_m),
            ("Transit", self.search.transit_radius_m),
            ("Parks", self.search.parks_radius_m),
        ] {
            if radius == 0 || radius > 50_000 {
                return Err(EstateAiError::config(format!(
                    "{name} search radius must be between 1 and 50000 meters"
                ))
                .into());
            }
        }

        if self.open_data.record_limit == 0 || self.open_data.record_limit > 10_000 {
            return Err(EstateAiError::config(
                "Open-data record limit must be between 1 and 10000",
            )
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(EstateAiError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(EstateAiError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Geocoding", &self.geocoding.base_url),
            ("Places", &self.places.base_url),
            ("Open-data", &self.open_data.base_url),
            ("Language model", &self.llm.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(EstateAiError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EstateAiConfig::default();
        assert_eq!(
            config.geocoding.base_url,
            "https://maps.googleapis.com/maps/api/geocode/json"
        );
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.search.school_radius_m, 1000);
        assert_eq!(config.search.parks_radius_m, 1500);
        assert_eq!(config.open_data.record_limit, 194);
        assert_eq!(config.logging.level, "info");
        assert!(config.geocoding.api_key.is_none());
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = EstateAiConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_empty_api_key() {
        let mut config = EstateAiConfig::default();
        config.places.api_key = Some(String::new());
        let result = config.validate_api_keys();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = EstateAiConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = EstateAiConfig::default();
        config.geocoding.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("timeout must be between"));

        let mut config = EstateAiConfig::default();
        config.search.parks_radius_m = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_base_url() {
        let mut config = EstateAiConfig::default();
        config.open_data.base_url = "ftp://example.com".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("base URL"));
    }

    #[test]
    fn test_config_path_generation() {
        let path = EstateAiConfig::get_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("estateai"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }
}
