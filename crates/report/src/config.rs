use chrono::{Duration, FixedOffset, Offset, Utc};
use domain::services::{AccessMode, EngineOptions};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub engine: EngineConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub access: AccessConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

/// Output format of the log layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Lookback of the recency snapshot in seconds
    #[serde(default = "default_recency_window_secs")]
    pub recency_window_secs: i64,

    #[serde(default = "default_monthly_lookback_days")]
    pub monthly_lookback_days: u64,

    #[serde(default = "default_weekly_lookback_days")]
    pub weekly_lookback_days: u64,

    #[serde(default)]
    pub render_icons: bool,

    /// Time zone for day keys: "local", "utc" or a fixed offset like "+09:00"
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// JSON dump of usage intervals
    pub intervals_path: String,

    /// JSON map of package id to catalog entry
    pub catalog_path: String,

    /// Simulate a platform without uninstalled-package lookups
    #[serde(default)]
    pub legacy_platform: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccessConfig {
    #[serde(default)]
    pub mode: AccessMode,

    /// Whether a settings screen can be opened from this host
    #[serde(default)]
    pub settings_available: bool,
}

/// Time zone used for calendar bucketing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportTimeZone {
    Local,
    Fixed(FixedOffset),
}

impl ReportTimeZone {
    /// Parse "local", "utc", "z" or a `+HH:MM` / `-HH:MM` offset.
    pub fn parse(value: &str) -> Result<Self, ConfigValidationError> {
        let value = value.trim();
        match value.to_ascii_lowercase().as_str() {
            "local" => return Ok(Self::Local),
            "utc" | "z" => return Ok(Self::Fixed(Utc.fix())),
            _ => {}
        }

        let invalid = || {
            ConfigValidationError::InvalidValue(format!(
                "time_zone must be local, utc or +HH:MM, got {value:?}"
            ))
        };

        let offset: FixedOffset = value.parse().map_err(|_| invalid())?;
        // FixedOffset's parser ignores trailing input and accepts other separators
        if offset.to_string() != value {
            return Err(invalid());
        }
        Ok(Self::Fixed(offset))
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}
fn default_recency_window_secs() -> i64 {
    600
}
fn default_monthly_lookback_days() -> u64 {
    30
}
fn default_weekly_lookback_days() -> u64 {
    6
}
fn default_time_zone() -> String {
    "local".to_string()
}

/// Longest calendar lookback accepted for either aggregation.
const MAX_LOOKBACK_DAYS: u64 = 366;

/// Longest recency window accepted (one day).
const MAX_RECENCY_WINDOW_SECS: i64 = 86_400;

#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not committed)
    /// 3. Environment variables with ST__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("ST").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration from embedded defaults plus `overrides`.
    ///
    /// Used by tests to avoid file system and environment dependencies.
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [logging]
            level = "info"
            format = "pretty"

            [engine]
            recency_window_secs = 600
            monthly_lookback_days = 30
            weekly_lookback_days = 6
            render_icons = false
            time_zone = "utc"

            [source]
            intervals_path = ""
            catalog_path = ""
            legacy_platform = false

            [access]
            mode = "allowed"
            settings_available = true
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        // Skip validation in tests to allow partial configs
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.source.intervals_path.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "ST__SOURCE__INTERVALS_PATH must be set".to_string(),
            ));
        }

        if self.source.catalog_path.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "ST__SOURCE__CATALOG_PATH must be set".to_string(),
            ));
        }

        if !(1..=MAX_RECENCY_WINDOW_SECS).contains(&self.engine.recency_window_secs) {
            return Err(ConfigValidationError::InvalidValue(format!(
                "recency_window_secs must be between 1 and {MAX_RECENCY_WINDOW_SECS}"
            )));
        }

        if self.engine.monthly_lookback_days > MAX_LOOKBACK_DAYS
            || self.engine.weekly_lookback_days > MAX_LOOKBACK_DAYS
        {
            return Err(ConfigValidationError::InvalidValue(format!(
                "lookback days cannot exceed {MAX_LOOKBACK_DAYS}"
            )));
        }

        self.engine.time_zone()?;
        Ok(())
    }
}

impl EngineConfig {
    /// Engine policy derived from this configuration.
    pub fn options(&self) -> Result<EngineOptions, ConfigValidationError> {
        let recency_window = Duration::try_seconds(self.recency_window_secs).ok_or_else(|| {
            ConfigValidationError::InvalidValue(format!(
                "recency_window_secs out of range: {}",
                self.recency_window_secs
            ))
        })?;

        Ok(EngineOptions {
            recency_window,
            monthly_lookback_days: self.monthly_lookback_days,
            weekly_lookback_days: self.weekly_lookback_days,
            render_icons: self.render_icons,
        })
    }

    pub fn time_zone(&self) -> Result<ReportTimeZone, ConfigValidationError> {
        ReportTimeZone::parse(&self.time_zone)
    }
}
