//! Configuration management for the weather icebreaker
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::WidgetError;
use crate::weather::parse_time_zone;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IcebreakerConfig {
    /// Weather API configuration
    pub weather: WeatherConfig,
    /// Device location settings
    pub location: LocationConfig,
    /// Page the share link points at
    pub page: PageConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Forecast endpoint
    pub forecast_url: String,
    /// Archive endpoint
    pub archive_url: String,
    /// Zone in which "now" and "yesterday" are computed
    pub time_zone: String,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
}

/// Device location settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// When false the host reports no geolocation capability
    pub enabled: bool,
    /// IP geolocation endpoint used as the "device" position on desktop hosts
    pub provider_url: String,
    /// Upper bound on a single position request
    pub timeout_ms: u64,
}

/// Share link settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Page URL used when none is given on the command line
    pub url: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

// Default value functions
fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_archive_url() -> String {
    "https://archive-api.open-meteo.com/v1/archive".to_string()
}

fn default_time_zone() -> String {
    "Europe/Stockholm".to_string()
}

fn default_weather_timeout() -> u32 {
    30
}

fn default_provider_url() -> String {
    "https://ipapi.co/json/".to_string()
}

fn default_geolocation_timeout_ms() -> u64 {
    8000
}

fn default_page_url() -> String {
    "https://weather-icebreaker.app/".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            forecast_url: default_forecast_url(),
            archive_url: default_archive_url(),
            time_zone: default_time_zone(),
            timeout_seconds: default_weather_timeout(),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider_url: default_provider_url(),
            timeout_ms: default_geolocation_timeout_ms(),
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            url: default_page_url(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LocationConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl IcebreakerConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
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

        // ICEBREAKER_WEATHER__TIME_ZONE=Europe/Oslo style overrides
        builder = builder.add_source(
            Environment::with_prefix("ICEBREAKER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: IcebreakerConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weather-icebreaker").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.weather.forecast_url.is_empty() {
            self.weather.forecast_url = default_forecast_url();
        }
        if self.weather.archive_url.is_empty() {
            self.weather.archive_url = default_archive_url();
        }
        if self.weather.time_zone.is_empty() {
            self.weather.time_zone = default_time_zone();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.location.provider_url.is_empty() {
            self.location.provider_url = default_provider_url();
        }
        if self.location.timeout_ms == 0 {
            self.location.timeout_ms = default_geolocation_timeout_ms();
        }
        if self.page.url.is_empty() {
            self.page.url = default_page_url();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds > 300 {
            return Err(
                WidgetError::config("Weather API timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.location.timeout_ms > 60_000 {
            return Err(
                WidgetError::config("Geolocation timeout cannot exceed 60000 ms").into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WidgetError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WidgetError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        parse_time_zone(&self.weather.time_zone)?;

        for (name, url) in [
            ("Forecast", &self.weather.forecast_url),
            ("Archive", &self.weather.archive_url),
            ("Geolocation provider", &self.location.provider_url),
            ("Page", &self.page.url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(WidgetError::config(format!(
                    "{name} URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}
