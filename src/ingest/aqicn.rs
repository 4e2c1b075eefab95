//! AQICN (World Air Quality Index) Data API Client
//!
//! Retrieves the nearest-station feed for a coordinate pair and exposes the
//! response as a read-only `RawObservation`. The document is kept as
//! `serde_json::Value` because the provider is loose about types: `aqi` may be
//! `"-"` when a station is offline (reported as malformed), and any `iaqi`
//! entry may be missing.
//!
//! API Documentation: https://aqicn.org/json-api/doc/
//! Geo feed: https://api.waqi.info/feed/geo:{lat};{lon}/?token={token}

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::time::Duration;

use crate::config::Settings;
use crate::ingest::ObservationSource;
use crate::model::AirQualityError;

pub const AQICN_DEFAULT_BASE_URL: &str = "https://api.waqi.info/feed/geo:";

/// Value of the top-level `status` field on success.
pub const STATUS_OK: &str = "ok";

// ============================================================================
// Raw payload view
// ============================================================================

/// A provider feed document, plus the coordinates the caller asked for.
///
/// Accessors return `None` for anything absent or of the wrong type; they
/// never fail.
#[derive(Debug, Clone, PartialEq)]
pub struct RawObservation {
    body: Value,
    request_coordinates: Option<(f64, f64)>,
}

impl RawObservation {
    pub fn from_value(body: Value) -> Self {
        Self {
            body,
            request_coordinates: None,
        }
    }

    /// Parses a response body. Fails only if the text is not JSON.
    pub fn parse(text: &str) -> Result<Self, AirQualityError> {
        serde_json::from_str(text)
            .map(Self::from_value)
            .map_err(|e| AirQualityError::UpstreamMalformed(e.to_string()))
    }

    /// Attaches the coordinates of the originating request.
    pub fn with_request_coordinates(mut self, lat: f64, lon: f64) -> Self {
        self.request_coordinates = Some((lat, lon));
        self
    }

    pub fn request_coordinates(&self) -> Option<(f64, f64)> {
        self.request_coordinates
    }

    /// Top-level `status` marker, `"ok"` on success.
    pub fn status(&self) -> Option<&str> {
        self.body.get("status").and_then(Value::as_str)
    }

    /// On error payloads AQICN puts a message string in `data`
    /// (e.g. `{"status": "error", "data": "Invalid key"}`).
    pub fn provider_message(&self) -> Option<&str> {
        self.body
            .get("data")
            .and_then(Value::as_str)
            .or_else(|| self.body.get("message").and_then(Value::as_str))
    }

    fn data(&self) -> Option<&Value> {
        self.body.get("data")
    }

    /// Overall index (`data.aqi`).
    ///
    /// An absent or null index is `Ok(None)`. A present value that is not a
    /// number, such as the `"-"` an offline station reports, is malformed.
    pub fn aqi(&self) -> Result<Option<f64>, AirQualityError> {
        match self.data().and_then(|d| d.get("aqi")) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => numeric(value).map(Some).ok_or_else(|| {
                AirQualityError::UpstreamMalformed(format!("aqi is not numeric: {}", value))
            }),
        }
    }

    /// Individual indicator readings (`data.iaqi.<code>.v`), in code order.
    ///
    /// An entry without a numeric `v` yields `(code, None)`.
    pub fn iaqi_readings(&self) -> impl Iterator<Item = (&str, Option<f64>)> + '_ {
        self.data()
            .and_then(|d| d.get("iaqi"))
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(|iaqi| iaqi.iter())
            .map(|(code, entry)| (code.as_str(), entry.get("v").and_then(numeric)))
    }

    /// Daily forecast series (`data.forecast.daily`), keyed by pollutant code.
    pub fn forecast_daily(&self) -> Option<&Map<String, Value>> {
        self.data()
            .and_then(|d| d.get("forecast"))
            .and_then(|f| f.get("daily"))
            .and_then(Value::as_object)
    }

    /// Nearest station name (`data.city.name`).
    pub fn city_name(&self) -> Option<&str> {
        self.data()
            .and_then(|d| d.get("city"))
            .and_then(|c| c.get("name"))
            .and_then(Value::as_str)
    }

    /// Station coordinates (`data.city.geo`, a `[lat, lon]` pair).
    pub fn city_geo(&self) -> Option<(f64, f64)> {
        let geo = self
            .data()
            .and_then(|d| d.get("city"))
            .and_then(|c| c.get("geo"))
            .and_then(Value::as_array)?;
        match geo.as_slice() {
            [lat, lon, ..] => Some((numeric(lat)?, numeric(lon)?)),
            _ => None,
        }
    }
}

/// Reads a JSON number, or a string holding one. AQICN sends `"-"` for
/// unavailable values, which maps to `None`.
pub fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

// ============================================================================
// API Client
// ============================================================================

/// Builds the geo feed URL. The base is concatenated as-is, so it normally
/// ends in `geo:`.
pub fn build_feed_url(base_url: &str, lat: f64, lon: f64, token: &str) -> String {
    format!("{}{};{}/?token={}", base_url, lat, lon, token)
}

/// Replaces the token query value so URLs can be logged.
pub fn redact_token(url: &str) -> String {
    match url.find("token=") {
        Some(idx) => format!("{}token=***", &url[..idx]),
        None => url.to_string(),
    }
}

/// Live AQICN client.
#[derive(Debug, Clone)]
pub struct AqicnClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl AqicnClient {
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self, AirQualityError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AirQualityError::UpstreamUnavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            token: token.to_string(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, AirQualityError> {
        Self::new(
            &settings.aqicn_api_url,
            &settings.aqicn_token,
            settings.request_timeout(),
        )
    }

    pub fn feed_url(&self, lat: f64, lon: f64) -> String {
        build_feed_url(&self.base_url, lat, lon, &self.token)
    }
}

#[async_trait]
impl ObservationSource for AqicnClient {
    async fn fetch(&self, lat: f64, lon: f64) -> Result<RawObservation, AirQualityError> {
        let url = self.feed_url(lat, lon);
        tracing::debug!(url = %redact_token(&url), "requesting AQICN feed");

        // without_url() keeps the token out of error messages.
        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| AirQualityError::UpstreamUnavailable(e.without_url().to_string()))?;

        if !response.status().is_success() {
            return Err(AirQualityError::UpstreamHttp(response.status().as_u16()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| AirQualityError::UpstreamUnavailable(e.without_url().to_string()))?;

        RawObservation::parse(&text)
    }
}

// ============================================================================
// Tests
// ============================================================================
