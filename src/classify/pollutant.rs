//! Pollutant concentration classification.
//!
//! Each supported pollutant has its own breakpoint table; the level names and
//! colors are the same six used for the overall index. Breakpoints follow the
//! US EPA AQI concentration tables and must not be tuned.

use super::{AqiLevel, BandTable, aqi_band_table};
use crate::model::PollutantLevel;

/// Description returned for pollutants without a table or without a reading.
pub const UNAVAILABLE_DESCRIPTION: &str = "Datos no disponibles";
/// Neutral gray paired with `UNAVAILABLE_DESCRIPTION`.
pub const UNAVAILABLE_COLOR: &str = "#9E9E9E";

static PM25_BANDS: BandTable<AqiLevel> = aqi_band_table!(12.0, 35.4, 55.4, 150.4, 250.4);
static PM10_BANDS: BandTable<AqiLevel> = aqi_band_table!(54.0, 154.0, 254.0, 354.0, 424.0);
static O3_BANDS: BandTable<AqiLevel> = aqi_band_table!(54.0, 70.0, 85.0, 105.0, 200.0);
static NO2_BANDS: BandTable<AqiLevel> = aqi_band_table!(53.0, 100.0, 360.0, 649.0, 1249.0);
static SO2_BANDS: BandTable<AqiLevel> = aqi_band_table!(35.0, 75.0, 185.0, 304.0, 604.0);
// CO is reported in mg/m³.
static CO_BANDS: BandTable<AqiLevel> = aqi_band_table!(4.4, 9.4, 12.4, 15.4, 30.4);

/// Pollutants with a breakpoint table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pollutant {
    Pm25,
    Pm10,
    O3,
    No2,
    So2,
    Co,
}

impl Pollutant {
    /// Every supported pollutant, in report order.
    pub const ALL: [Pollutant; 6] = [
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::O3,
        Pollutant::No2,
        Pollutant::So2,
        Pollutant::Co,
    ];

    /// AQICN field code.
    pub fn code(self) -> &'static str {
        match self {
            Pollutant::Pm25 => "pm25",
            Pollutant::Pm10 => "pm10",
            Pollutant::O3 => "o3",
            Pollutant::No2 => "no2",
            Pollutant::So2 => "so2",
            Pollutant::Co => "co",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.code() == code)
    }

    pub fn bands(self) -> &'static BandTable<AqiLevel> {
        match self {
            Pollutant::Pm25 => &PM25_BANDS,
            Pollutant::Pm10 => &PM10_BANDS,
            Pollutant::O3 => &O3_BANDS,
            Pollutant::No2 => &NO2_BANDS,
            Pollutant::So2 => &SO2_BANDS,
            Pollutant::Co => &CO_BANDS,
        }
    }

    pub fn classify(self, concentration: f64) -> AqiLevel {
        self.bands().classify(concentration)
    }
}

/// Classifies a concentration for a pollutant code.
///
/// Codes without a breakpoint table return the "Datos no disponibles" result;
/// this is a normal outcome, not an error.
pub fn classify_pollutant(code: &str, concentration: f64) -> PollutantLevel {
    match Pollutant::from_code(code) {
        Some(pollutant) => level_result(pollutant.classify(concentration)),
        None => unavailable(),
    }
}

/// Like `classify_pollutant`, for a reading that may have no numeric value.
pub fn classify_pollutant_reading(code: &str, concentration: Option<f64>) -> PollutantLevel {
    match concentration {
        Some(value) => classify_pollutant(code, value),
        None => unavailable(),
    }
}

fn level_result(level: AqiLevel) -> PollutantLevel {
    PollutantLevel {
        description: level.label().to_string(),
        color: level.color_code().to_string(),
    }
}

fn unavailable() -> PollutantLevel {
    PollutantLevel {
        description: UNAVAILABLE_DESCRIPTION.to_string(),
        color: UNAVAILABLE_COLOR.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
