use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::{AppError, ConfigError};

/// Environment variable consulted when `weather.app_id` is empty.
pub const APP_ID_ENV: &str = "OPENWEATHER_APP_ID";

const APP_DIR_NAME: &str = "stormdeck";

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

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding config.toml and the selected-city list
    pub config_dir: PathBuf,

    /// Forecast provider settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Local persistence settings
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Measurement system passed to the provider as `units=`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Imperial,
    Metric,
    Standard,
}

impl Units {
    pub fn as_query_value(self) -> &'static str {
        match self {
            Units::Imperial => "imperial",
            Units::Metric => "metric",
            Units::Standard => "standard",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Provider base URL; `/forecast/daily` is appended
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// OpenWeatherMap app id (sign up at openweathermap.org)
    #[serde(default)]
    pub app_id: String,

    #[serde(default)]
    pub units: Units,

    /// Number of daily records requested (`cnt=`)
    #[serde(default = "default_days")]
    pub days: u8,

    /// Per-request timeout; 0 disables it
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_base_url() -> String {
    "http://api.openweathermap.org/data/2.5".to_string()
}

fn default_days() -> u8 {
    8
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            app_id: String::new(),
            units: Units::default(),
            days: default_days(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl WeatherConfig {
    /// The configured app id, falling back to `OPENWEATHER_APP_ID`.
    pub fn effective_app_id(&self) -> String {
        if !self.app_id.trim().is_empty() {
            return self.app_id.clone();
        }
        std::env::var(APP_ID_ENV).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// File name (relative to config_dir) of the persisted selected cities
    #[serde(default = "default_cities_file")]
    pub cities_file: String,
}

fn default_cities_file() -> String {
    "selected_cities.json".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            cities_file: default_cities_file(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME);

        Self::with_dir(config_dir)
    }
}

impl Config {
    /// Default configuration rooted at the given directory
    pub fn with_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            weather: WeatherConfig::default(),
            storage: StorageConfig::default(),
        }
    }

    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_config_path()?)
    }

    /// Load configuration from `path`, writing defaults there if it doesn't exist.
    ///
    /// A freshly created config keeps its data next to the file.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
            let config = Self::with_dir(dir);
            config.save_to(path)?;
            tracing::info!("Created default config at {}", path.display());
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            AppError::from(ConfigError::ParseError(format!("{}: {}", path.display(), e)))
        })?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Warnings are logged; errors fail the load.
    pub fn load_validated(path: Option<&Path>) -> Result<(Self, ValidationResult)> {
        let config = match path {
            Some(p) => Self::load_from(p)?,
            None => Self::load()?,
        };
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_url(&self.weather.api_base_url, "weather.api_base_url", &mut result);

        if self.weather.days == 0 {
            result.add_error("weather.days", "At least one forecast day must be requested");
        } else if self.weather.days < 8 {
            result.add_warning(
                "weather.days",
                "Fewer than 8 days requested; the weekly strip will be short",
            );
        }

        if self.weather.effective_app_id().is_empty() {
            result.add_warning(
                "weather.app_id",
                format!("No app id configured (or {APP_ID_ENV}); sample data will be shown"),
            );
        }

        if self.weather.request_timeout_secs == 0 {
            result.add_warning(
                "weather.request_timeout_secs",
                "Request timeout disabled; a hung request never completes",
            );
        }

        if self.storage.cities_file.trim().is_empty() {
            result.add_error("storage.cities_file", "File name must not be empty");
        }

        result
    }

    fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Full path of the persisted selected-city list
    pub fn cities_path(&self) -> PathBuf {
        self.config_dir.join(&self.storage.cities_file)
    }

    fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join(APP_DIR_NAME);

        Ok(config_dir.join("config.toml"))
    }
}
