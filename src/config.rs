//! Service configuration.
//!
//! Settings are layered: built-in defaults, then an optional TOML file
//! (`airemax.toml` unless `AIREMAX_CONFIG` names another), then environment
//! variables. A `.env` file in the working directory is loaded first, so
//! secrets such as `AQICN_TOKEN` can live there.

use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use crate::ingest::aqicn::AQICN_DEFAULT_BASE_URL;
use crate::logging::LogLevel;

pub const DEFAULT_CONFIG_PATH: &str = "airemax.toml";

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub project_name: String,
    /// Path prefix for every route, e.g. `/api/v1`. Empty serves at the root.
    pub api_prefix: String,
    pub aqicn_api_url: String,
    pub aqicn_token: String,
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub log_level: String,
    pub log_file: Option<String>,
    pub console_timestamps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project_name: "AireMax API".to_string(),
            api_prefix: "/api/v1".to_string(),
            aqicn_api_url: AQICN_DEFAULT_BASE_URL.to_string(),
            aqicn_token: String::new(),
            host: "0.0.0.0".to_string(),
            port: 8001,
            request_timeout_secs: 10,
            log_level: "info".to_string(),
            log_file: None,
            console_timestamps: true,
        }
    }
}

impl Settings {
    /// Loads settings from `.env`, the config file and the process environment.
    ///
    /// A missing config file is not an error; an unreadable or invalid one is.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let path = path
            .map(str::to_string)
            .or_else(|| std::env::var("AIREMAX_CONFIG").ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

        let toml_text = match std::fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                return Err(ConfigError::Io {
                    path,
                    message: e.to_string(),
                });
            }
        };

        Self::from_sources(toml_text.as_deref(), |key| std::env::var(key).ok())
    }

    /// Builds settings from TOML text and an environment lookup.
    pub fn from_sources<F>(toml_text: Option<&str>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = match toml_text {
            Some(text) => toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?,
            None => Settings::default(),
        };
        settings.apply_env(env)?;
        settings.validate()?;
        Ok(settings)
    }

    fn apply_env<F>(&mut self, env: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = env("PROJECT_NAME") {
            self.project_name = v;
        }
        if let Some(v) = env("API_V1_STR") {
            self.api_prefix = v;
        }
        if let Some(v) = env("AQICN_API_URL") {
            self.aqicn_api_url = v;
        }
        if let Some(v) = env("AQICN_TOKEN") {
            self.aqicn_token = v;
        }
        if let Some(v) = env("HOST") {
            self.host = v;
        }
        if let Some(v) = env("PORT") {
            self.port = parse_env("PORT", &v)?;
        }
        if let Some(v) = env("REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_env("REQUEST_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = env("LOG_LEVEL") {
            self.log_level = v;
        }
        if let Some(v) = env("LOG_FILE") {
            self.log_file = Some(v).filter(|p| !p.is_empty());
        }
        if let Some(v) = env("LOG_CONSOLE_TIMESTAMPS") {
            self.console_timestamps = parse_env("LOG_CONSOLE_TIMESTAMPS", &v)?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.api_prefix.is_empty() && !self.api_prefix.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "api_prefix must start with '/', got '{}'",
                self.api_prefix
            )));
        }
        if self.aqicn_api_url.trim().is_empty() {
            return Err(ConfigError::Invalid("aqicn_api_url must not be empty".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        self.log_level
            .parse::<LogLevel>()
            .map_err(ConfigError::Invalid)?;
        Ok(())
    }

    /// Route prefix without a trailing slash; empty means the root.
    pub fn route_prefix(&self) -> &str {
        self.api_prefix.trim_end_matches('/')
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parsed `log_level`; `validate` guarantees it parses.
    pub fn min_log_level(&self) -> LogLevel {
        self.log_level.parse().unwrap_or(LogLevel::Info)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    Io { path: String, message: String },
    /// The config file is not valid TOML for `Settings`.
    Parse(String),
    /// An environment variable could not be parsed.
    InvalidValue { key: String, value: String },
    /// A setting is out of range.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, message } => {
                write!(f, "Cannot read config file {}: {}", path, message)
            }
            ConfigError::Parse(msg) => write!(f, "Config parse error: {}", msg),
            ConfigError::InvalidValue { key, value } => {
                write!(f, "Invalid value for {}: '{}'", key, value)
            }
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
