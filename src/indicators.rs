//! Indicator catalog for AQICN `iaqi` fields.
//!
//! Maps the provider's short field codes to a localized display name, the
//! measurement unit, and the standardized label used as the key in reports.
//! This is the single source of truth for which provider fields are surfaced;
//! codes missing from the catalog are dropped from reports.

/// Metadata for a single provider indicator.
#[derive(Debug, PartialEq)]
pub struct Indicator {
    /// AQICN field code, e.g. `"pm25"` or `"t"`.
    pub code: &'static str,
    /// Localized display name.
    pub name: &'static str,
    pub units: &'static str,
    /// Standardized label used as the report key, e.g. `"PM2.5"`.
    pub standard: &'static str,
}

/// All indicators the service knows how to label, pollutants first, then
/// meteorological fields.
pub static INDICATOR_CATALOG: &[Indicator] = &[
    Indicator { code: "co", name: "Monóxido de Carbono", units: "mg/m³", standard: "CO" },
    Indicator { code: "no2", name: "Dióxido de Nitrógeno", units: "μg/m³", standard: "NO₂" },
    Indicator { code: "o3", name: "Ozono", units: "μg/m³", standard: "O₃" },
    Indicator { code: "pm10", name: "Material Particulado PM10", units: "μg/m³", standard: "PM10" },
    Indicator { code: "pm25", name: "Material Particulado PM2.5", units: "μg/m³", standard: "PM2.5" },
    Indicator { code: "so2", name: "Dióxido de Azufre", units: "μg/m³", standard: "SO₂" },
    Indicator { code: "dew", name: "Punto de Rocío", units: "°C", standard: "Dew Point" },
    Indicator { code: "h", name: "Humedad Relativa", units: "%", standard: "Humedad" },
    Indicator { code: "p", name: "Presión Atmosférica", units: "hPa", standard: "Presión" },
    Indicator { code: "t", name: "Temperatura", units: "°C", standard: "Temperatura" },
    Indicator { code: "w", name: "Velocidad del Viento", units: "m/s", standard: "Viento" },
    Indicator { code: "wd", name: "Dirección del Viento", units: "°", standard: "Dirección Viento" },
    Indicator { code: "wg", name: "Ráfagas de Viento", units: "m/s", standard: "Ráfagas" },
    Indicator { code: "r", name: "Precipitación", units: "mm", standard: "Lluvia" },
];

/// Looks up an indicator by provider code. Returns `None` if not found.
pub fn find_indicator(code: &str) -> Option<&'static Indicator> {
    INDICATOR_CATALOG.iter().find(|i| i.code == code)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
