//! Core data types for the air-quality report service.
//!
//! This module defines the normalized report document returned to callers and
//! the error type shared by the ingest, report and web layers. It contains no
//! logic and no I/O, only types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Classification results
// ---------------------------------------------------------------------------

/// Health guidance for the overall air-quality index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AqiHealthAnalysis {
    pub level: String,
    pub color_code: String,
    pub health_implications: String,
    pub cautionary_statement: String,
}

/// Health band for a single pollutant concentration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollutantLevel {
    pub description: String,
    pub color: String, // hex, e.g. "#4CAF50"
}

// ---------------------------------------------------------------------------
// Report entries
// ---------------------------------------------------------------------------

/// A classified pollutant reading, keyed in the report by its standard label.
///
/// `value` is `None` (serialized as `null`) when the provider listed the
/// pollutant without a numeric reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollutantReading {
    pub value: Option<f64>,
    pub units: String,
    pub level: String,
    pub color: String,
}

/// A raw indicator (pollutant or weather variable) with its display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorReading {
    pub value: Option<f64>,
    pub units: String,
    pub name: String,
}

/// One day of a provider forecast series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub day: String, // "YYYY-MM-DD"
    pub avg: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Forecast series keyed by provider pollutant code (`pm25`, `pm10`, `uvi`, ...).
pub type Forecast = BTreeMap<String, Vec<ForecastPoint>>;

/// Location of the report: the nearest station name and the queried coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// The normalized report document.
///
/// Field order matches the JSON document served by `GET /air-quality`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualityReport {
    pub aqi: i64,
    pub aqi_health_analysis: AqiHealthAnalysis,
    pub risk_prediction: String,
    pub forecast: Forecast,
    pub pollutants: BTreeMap<String, PollutantReading>,
    pub iaqi: BTreeMap<String, IndicatorReading>,
    pub location: Location,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that prevent a report from being produced.
///
/// Missing fields and unknown codes in an otherwise valid payload are not
/// errors; the report assembler absorbs them.
#[derive(Debug, Clone, PartialEq)]
pub enum AirQualityError {
    /// The provider could not be reached (connection, timeout, TLS).
    UpstreamUnavailable(String),
    /// Non-2xx HTTP response from the provider.
    UpstreamHttp(u16),
    /// The response body was not a JSON document.
    UpstreamMalformed(String),
    /// The provider answered but its `status` field was not `"ok"`.
    /// Carries the provider's own message when it sent one.
    UpstreamDataRejected(Option<String>),
}

impl std::fmt::Display for AirQualityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AirQualityError::UpstreamUnavailable(msg) => write!(
                f,
                "Error al conectar con el servicio de calidad del aire: {}",
                msg
            ),
            AirQualityError::UpstreamHttp(code) => write!(
                f,
                "Error al conectar con el servicio de calidad del aire: HTTP {}",
                code
            ),
            AirQualityError::UpstreamMalformed(msg) => write!(
                f,
                "Error al procesar los datos de calidad del aire: {}",
                msg
            ),
            AirQualityError::UpstreamDataRejected(None) => {
                write!(f, "No se pudieron obtener los datos de calidad del aire")
            }
            AirQualityError::UpstreamDataRejected(Some(msg)) => write!(
                f,
                "No se pudieron obtener los datos de calidad del aire: {}",
                msg
            ),
        }
    }
}

impl std::error::Error for AirQualityError {}
