//! Structured logging for the air-quality service
//!
//! Provides context-rich logging tagged with the data source and the
//! location being queried. Output goes through `tracing`; `init_logger`
//! installs a console layer and, optionally, an append-only log file layer.

use std::fmt;
use std::fs::OpenOptions;
use std::str::FromStr;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::model::AirQualityError;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// `EnvFilter` directive for this level.
    fn directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" | "trace" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Data Source Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Aqicn,
    Api,
    System,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Aqicn => write!(f, "AQICN"),
            DataSource::Api => write!(f, "API"),
            DataSource::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - no station near the point, or the provider is rate limiting
    Expected,
    /// Unexpected failure - indicates service degradation or configuration issue
    Unexpected,
    /// Unknown - cannot determine if this is expected or not
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Initialize the global subscriber.
///
/// `RUST_LOG`, when set, overrides `min_level`. Fails if the log file cannot
/// be opened or a global subscriber is already installed.
pub fn init_logger(
    min_level: LogLevel,
    log_file: Option<&str>,
    console_timestamps: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = min_level.directive();
        EnvFilter::new(format!("airemax_service={level},tower_http={level},warn"))
    });

    let timed_console = console_timestamps.then(|| tracing_subscriber::fmt::layer());
    let plain_console =
        (!console_timestamps).then(|| tracing_subscriber::fmt::layer().without_time());

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(timed_console)
        .with(plain_console)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Log a general informational message
pub fn info(source: DataSource, location: Option<&str>, message: &str) {
    tracing::info!(source = %source, location = location.unwrap_or("-"), "{}", message);
}

/// Log a warning message
pub fn warn(source: DataSource, location: Option<&str>, message: &str) {
    tracing::warn!(source = %source, location = location.unwrap_or("-"), "{}", message);
}

/// Log an error message
pub fn error(source: DataSource, location: Option<&str>, message: &str) {
    tracing::error!(source = %source, location = location.unwrap_or("-"), "{}", message);
}

/// Log a debug message
pub fn debug(source: DataSource, location: Option<&str>, message: &str) {
    tracing::debug!(source = %source, location = location.unwrap_or("-"), "{}", message);
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify an AQICN failure based on the error type
pub fn classify_aqicn_failure(err: &AirQualityError) -> FailureType {
    match err {
        // Connection failures and timeouts point at the network or the provider
        AirQualityError::UpstreamUnavailable(_) => FailureType::Unexpected,
        AirQualityError::UpstreamHttp(429) => FailureType::Expected,
        AirQualityError::UpstreamHttp(_) => FailureType::Unexpected,
        // Parse errors suggest API changes
        AirQualityError::UpstreamMalformed(_) => FailureType::Unexpected,
        AirQualityError::UpstreamDataRejected(Some(msg)) => {
            let msg = msg.to_ascii_lowercase();
            if msg.contains("invalid key") {
                // Misconfigured token, every request will fail
                FailureType::Unexpected
            } else if msg.contains("unknown station") || msg.contains("over quota") {
                FailureType::Expected
            } else {
                FailureType::Unknown
            }
        }
        AirQualityError::UpstreamDataRejected(None) => FailureType::Unknown,
    }
}

// ---------------------------------------------------------------------------
// Structured Failure Logging
// ---------------------------------------------------------------------------

/// Log an AQICN failure with automatic classification
pub fn log_aqicn_failure(location: &str, operation: &str, err: &AirQualityError) {
    let failure_type = classify_aqicn_failure(err);

    let message = format!("{} failed [{}]: {}", operation, failure_type, err);

    match failure_type {
        FailureType::Expected => debug(DataSource::Aqicn, Some(location), &message),
        FailureType::Unexpected => error(DataSource::Aqicn, Some(location), &message),
        FailureType::Unknown => warn(DataSource::Aqicn, Some(location), &message),
    }
}

// ---------------------------------------------------------------------------
// Report Summary Logging
// ---------------------------------------------------------------------------

/// Log a summary of an assembled report
pub fn log_report_summary(location: &str, aqi: i64, pollutants: usize, indicators: usize) {
    let message = format!(
        "Report assembled: aqi {}, {} pollutants, {} indicators",
        aqi, pollutants, indicators
    );

    if indicators == 0 {
        warn(DataSource::Api, Some(location), &message);
    } else {
        info(DataSource::Api, Some(location), &message);
    }
}
