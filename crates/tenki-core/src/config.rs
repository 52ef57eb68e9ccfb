use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// JMA endpoint settings
    #[serde(default)]
    pub jma: JmaSettings,

    /// Local forecast cache settings
    #[serde(default)]
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JmaSettings {
    /// Base URL for the JMA bosai API
    #[serde(default = "default_jma_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_jma_timeout_secs")]
    pub timeout_secs: u64,

    /// Refresh interval in minutes for the selected region
    #[serde(default = "default_refresh_minutes")]
    pub refresh_minutes: u32,
}

fn default_jma_base_url() -> String {
    "https://www.jma.go.jp/bosai".to_string()
}

fn default_jma_timeout_secs() -> u64 {
    10
}

fn default_refresh_minutes() -> u32 {
    30
}

impl Default for JmaSettings {
    fn default() -> Self {
        Self {
            base_url: default_jma_base_url(),
            timeout_secs: default_jma_timeout_secs(),
            refresh_minutes: default_refresh_minutes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Forecast database filename, relative to the config directory
    #[serde(default = "default_database_file")]
    pub database_file: String,
}

fn default_database_file() -> String {
    "weather.db".to_string()
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            database_file: default_database_file(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tenki");

        Self {
            config_dir,
            jma: JmaSettings::default(),
            cache: CacheSettings::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(&config_path)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents)
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        if !validation.warnings.is_empty() {
            for warning in &validation.warnings {
                tracing::warn!("Config warning: {}", warning);
            }
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        // Validate JMA base URL
        self.validate_url(&self.jma.base_url, "jma.base_url", &mut result);

        // Validate request timeout
        if self.jma.timeout_secs == 0 {
            result.add_error("jma.timeout_secs", "Timeout must be greater than 0");
        } else if self.jma.timeout_secs > 120 {
            result.add_warning(
                "jma.timeout_secs",
                "Timeout is unusually long (>120 seconds)",
            );
        }

        // Validate refresh interval
        if self.jma.refresh_minutes == 0 {
            result.add_warning(
                "jma.refresh_minutes",
                "Forecast refresh disabled (0 minutes)",
            );
        } else if self.jma.refresh_minutes > 1440 {
            result.add_warning(
                "jma.refresh_minutes",
                "Forecast refresh interval is more than 24 hours",
            );
        }

        // Validate cache database filename
        if self.cache.database_file.trim().is_empty() {
            result.add_error("cache.database_file", "Database filename cannot be empty");
        } else if PathBuf::from(&self.cache.database_file).is_absolute() {
            result.add_warning(
                "cache.database_file",
                "Absolute path overrides the config directory",
            );
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                // Check scheme
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                // Check host
                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                // Validate port if explicitly specified
                if let Some(port) = url.port() {
                    if port == 0 {
                        result.add_error(field_name, "Port cannot be 0");
                    }
                    // Port is u16, so already in valid range 1-65535
                }
            }
            Err(e) => {
                result.add_error(
                    field_name,
                    format!("Invalid URL: {}", e),
                );
            }
        }
    }

    /// Full path of the forecast database file
    pub fn database_path(&self) -> PathBuf {
        self.config_dir.join(&self.cache.database_file)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        // Ensure config directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(&config_path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("tenki");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        // Default config should be valid (only warnings, no errors)
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_invalid_url() {
        let mut config = Config::default();
        config.jma.base_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "jma.base_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.jma.base_url = "ftp://www.jma.go.jp/bosai".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_zero_timeout_is_error() {
        let mut config = Config::default();
        config.jma.timeout_secs = 0;
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "jma.timeout_secs"));
    }

    #[test]
    fn test_zero_refresh_is_warning() {
        let mut config = Config::default();
        config.jma.refresh_minutes = 0;
        let result = config.validate();
        // Disabled refresh is allowed, just noisy
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "jma.refresh_minutes"));
    }

    #[test]
    fn test_empty_database_file_is_error() {
        let mut config = Config::default();
        config.cache.database_file = "  ".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "cache.database_file"));
    }

    #[test]
    fn test_database_path_joins_config_dir() {
        let mut config = Config::default();
        config.config_dir = PathBuf::from("/tmp/tenki");
        config.cache.database_file = "weather.db".to_string();
        assert_eq!(config.database_path(), PathBuf::from("/tmp/tenki/weather.db"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("config_dir = \"/tmp/tenki\"").unwrap();
        assert_eq!(config.jma.base_url, "https://www.jma.go.jp/bosai");
        assert_eq!(config.jma.timeout_secs, 10);
        assert_eq!(config.cache.database_file, "weather.db");
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
