//! Shop configuration from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use tillpoint_catalog::DEFAULT_SIMILARITY_THRESHOLD;
use tillpoint_observability::{LogFormat, UnknownLogFormat};

pub const CATALOG_PATH_VAR: &str = "TILLPOINT_CATALOG_PATH";
pub const SEARCH_THRESHOLD_VAR: &str = "TILLPOINT_SEARCH_THRESHOLD";
pub const SEARCH_DEBOUNCE_VAR: &str = "TILLPOINT_SEARCH_DEBOUNCE_MS";
pub const LOG_FILTER_VAR: &str = "TILLPOINT_LOG";
pub const LOG_FORMAT_VAR: &str = "TILLPOINT_LOG_FORMAT";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{var}: expected a number between 0 and 1, got {value:?}")]
    InvalidThreshold { var: &'static str, value: String },

    #[error("{var}: expected milliseconds, got {value:?}")]
    InvalidDuration { var: &'static str, value: String },

    #[error("TILLPOINT_LOG_FORMAT: {0}")]
    InvalidLogFormat(#[from] UnknownLogFormat),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShopConfig {
    pub catalog_path: PathBuf,
    pub search_threshold: f64,
    pub search_debounce: Duration,
    pub log_filter: String,
    pub log_format: LogFormat,
    /// Variables that were unset and fell back to their defaults.
    defaulted: Vec<&'static str>,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("catalog.json"),
            search_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            search_debounce: Duration::from_millis(250),
            log_filter: "info".to_string(),
            log_format: LogFormat::Text,
            defaulted: Vec::new(),
        }
    }
}

impl ShopConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`; unset variables keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let mut read = |var: &'static str| {
            let value = lookup(var);
            if value.is_none() {
                config.defaulted.push(var);
            }
            value
        };

        let catalog_path = read(CATALOG_PATH_VAR);
        let threshold = read(SEARCH_THRESHOLD_VAR);
        let debounce = read(SEARCH_DEBOUNCE_VAR);
        let log_filter = read(LOG_FILTER_VAR);
        let log_format = read(LOG_FORMAT_VAR);

        if let Some(path) = catalog_path {
            config.catalog_path = PathBuf::from(path);
        }

        if let Some(value) = threshold {
            config.search_threshold = parse_threshold(&value)?;
        }

        if let Some(value) = debounce {
            let millis = value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidDuration {
                    var: SEARCH_DEBOUNCE_VAR,
                    value: value.clone(),
                })?;
            config.search_debounce = Duration::from_millis(millis);
        }

        if let Some(filter) = log_filter {
            config.log_filter = filter;
        }

        if let Some(format) = log_format {
            config.log_format = format.parse()?;
        }

        Ok(config)
    }

    pub fn defaulted(&self) -> &[&'static str] {
        &self.defaulted
    }

    /// Warn about every variable that fell back to its default. Call once
    /// logging is installed.
    pub fn log_defaults(&self) {
        for var in &self.defaulted {
            let value = match *var {
                CATALOG_PATH_VAR => self.catalog_path.display().to_string(),
                SEARCH_THRESHOLD_VAR => self.search_threshold.to_string(),
                SEARCH_DEBOUNCE_VAR => self.search_debounce.as_millis().to_string(),
                LOG_FILTER_VAR => self.log_filter.clone(),
                _ => format!("{:?}", self.log_format),
            };
            tracing::warn!("{var} not set; using {value}");
        }
    }

    /// Override the catalog path, e.g. from a command-line flag.
    pub fn set_catalog_path(&mut self, path: PathBuf) {
        self.catalog_path = path;
        self.defaulted.retain(|var| *var != CATALOG_PATH_VAR);
    }

    /// Override the log format, e.g. from a command-line flag.
    pub fn set_log_format(&mut self, format: LogFormat) {
        self.log_format = format;
        self.defaulted.retain(|var| *var != LOG_FORMAT_VAR);
    }
}

fn parse_threshold(value: &str) -> Result<f64, ConfigError> {
    let invalid = || ConfigError::InvalidThreshold {
        var: SEARCH_THRESHOLD_VAR,
        value: value.to_string(),
    };
    let threshold = value.trim().parse::<f64>().map_err(|_| invalid())?;
    if !(0.0..=1.0).contains(&threshold) {
        return Err(invalid());
    }
    Ok(threshold)
}
