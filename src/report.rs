//! Report assembly.
//!
//! Turns a raw AQICN document into the normalized `AirQualityReport`:
//! classifies the overall index and each supported pollutant, relabels
//! cataloged indicators, copies the daily forecast and resolves the location.
//!
//! Missing or unknown fields never fail a report. Absent values become `None`
//! (serialized as `null`), unknown indicator codes are dropped, and a missing
//! `aqi` counts as 0. A document fails when its `status` is not `"ok"`, or when
//! `aqi` is present but not a number (an offline station's `"-"`); either way
//! no report is produced.

use chrono::NaiveDate;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::classify::{Pollutant, classify_aqi, classify_pollutant_reading, risk_prediction};
use crate::indicators::find_indicator;
use crate::ingest::aqicn::{RawObservation, STATUS_OK, numeric};
use crate::logging::{self, DataSource};
use crate::model::{
    AirQualityError, AirQualityReport, Forecast, ForecastPoint, IndicatorReading, Location,
    PollutantReading,
};

/// Indicator readings keyed by provider code; `None` where the code was
/// listed without a numeric value.
pub type Readings<'a> = BTreeMap<&'a str, Option<f64>>;

/// Builds a report for a document fetched at `lat`/`lon`.
///
/// The request coordinates take precedence over the station's own
/// coordinates in the report location.
pub fn assemble(
    raw: RawObservation,
    lat: f64,
    lon: f64,
) -> Result<AirQualityReport, AirQualityError> {
    build_report(&raw.with_request_coordinates(lat, lon))
}

/// Builds a report from a document, using its attached request coordinates
/// if any.
pub fn build_report(raw: &RawObservation) -> Result<AirQualityReport, AirQualityError> {
    if raw.status() != Some(STATUS_OK) {
        return Err(AirQualityError::UpstreamDataRejected(
            raw.provider_message().map(str::to_string),
        ));
    }

    let station = raw.city_name();
    // Bands compare the raw reading; only the reported field is rounded.
    let index = match raw.aqi()? {
        Some(value) => value,
        None => {
            logging::debug(DataSource::Aqicn, station, "no aqi in payload, using 0");
            0.0
        }
    };

    let readings: Readings = raw.iaqi_readings().collect();

    Ok(AirQualityReport {
        aqi: index.round() as i64,
        aqi_health_analysis: classify_aqi(index),
        risk_prediction: risk_prediction(index).to_string(),
        forecast: extract_forecast(raw),
        pollutants: classify_pollutants(&readings),
        iaqi: label_indicators(&readings, station),
        location: extract_location(raw),
    })
}

/// Classifies each supported pollutant present in `readings`, keyed by its
/// standard label.
pub fn classify_pollutants(readings: &Readings) -> BTreeMap<String, PollutantReading> {
    Pollutant::ALL
        .iter()
        .filter_map(|pollutant| {
            let code = pollutant.code();
            let value = *readings.get(code)?;
            let indicator = find_indicator(code)?;
            let level = classify_pollutant_reading(code, value);
            Some((
                indicator.standard.to_string(),
                PollutantReading {
                    value,
                    units: indicator.units.to_string(),
                    level: level.description,
                    color: level.color,
                },
            ))
        })
        .collect()
}

/// Relabels every cataloged reading; uncataloged codes are dropped.
pub fn label_indicators(
    readings: &Readings,
    station: Option<&str>,
) -> BTreeMap<String, IndicatorReading> {
    let mut labeled = BTreeMap::new();
    for (&code, &value) in readings {
        match find_indicator(code) {
            Some(indicator) => {
                labeled.insert(
                    indicator.standard.to_string(),
                    IndicatorReading {
                        value,
                        units: indicator.units.to_string(),
                        name: indicator.name.to_string(),
                    },
                );
            }
            None => logging::debug(
                DataSource::Aqicn,
                station,
                &format!("dropping uncataloged indicator '{}'", code),
            ),
        }
    }
    labeled
}

/// Copies `data.forecast.daily`. Series that are not arrays and points without
/// a valid `YYYY-MM-DD` day are skipped.
pub fn extract_forecast(raw: &RawObservation) -> Forecast {
    let Some(daily) = raw.forecast_daily() else {
        return Forecast::new();
    };

    daily
        .iter()
        .filter_map(|(code, series)| {
            let points = series.as_array()?;
            Some((code.clone(), points.iter().filter_map(forecast_point).collect()))
        })
        .collect()
}

fn forecast_point(entry: &Value) -> Option<ForecastPoint> {
    let day = entry.get("day").and_then(Value::as_str)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()?;

    Some(ForecastPoint {
        day: day.to_string(),
        avg: entry.get("avg").and_then(numeric),
        min: entry.get("min").and_then(numeric),
        max: entry.get("max").and_then(numeric),
    })
}

/// Station name plus coordinates: request coordinates first, then the
/// station's `geo`, then `(0, 0)`.
pub fn extract_location(raw: &RawObservation) -> Location {
    let (lat, lon) = raw
        .request_coordinates()
        .or_else(|| raw.city_geo())
        .unwrap_or((0.0, 0.0));

    Location {
        name: raw.city_name().unwrap_or_default().to_string(),
        lat,
        lon,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BOGOTA: &str = include_str!("../tests/fixtures/aqicn_bogota.json");

    fn bogota() -> RawObservation {
        RawObservation::parse(BOGOTA).expect("fixture should be valid JSON")
    }

    fn raw(body: Value) -> RawObservation {
        RawObservation::from_value(body)
    }

    // --- Full payload -------------------------------------------------------

    #[test]
    fn test_sample_payload_overall_index() {
        let report = assemble(bogota(), 4.6, -74.08).expect("ok payload should build");
        assert_eq!(report.aqi, 38);
        assert_eq!(report.aqi_health_analysis.level, "Bueno");
        assert_eq!(report.aqi_health_analysis.color_code, "#4CAF50");
        assert_eq!(
            report.risk_prediction,
            "La calidad del aire se mantendrá buena/moderada durante las próximas horas"
        );
    }

    #[test]
    fn test_sample_payload_pm25_lands_in_55_4_band() {
        let report = assemble(bogota(), 4.6, -74.08).unwrap();
        let pm25 = &report.pollutants["PM2.5"];
        assert_eq!(pm25.value, Some(38.0));
        assert_eq!(pm25.units, "μg/m³");
        // 38 is above 35.4 and at most 55.4.
        assert_eq!(pm25.level, "Poco saludable para grupos sensibles");
        assert_eq!(pm25.color, "#FF9800");
    }

    #[test]
    fn test_sample_payload_pollutants_use_standard_labels() {
        let report = assemble(bogota(), 4.6, -74.08).unwrap();
        let labels: Vec<_> = report.pollutants.keys().map(String::as_str).collect();
        // co is not in the sample iaqi block, so it is absent rather than zero.
        assert_eq!(labels.len(), 5);
        for label in ["PM2.5", "PM10", "O₃", "NO₂", "SO₂"] {
            assert!(labels.contains(&label), "missing pollutant {}", label);
        }
        assert!(!report.pollutants.contains_key("CO"));
        assert_eq!(report.pollutants["PM10"].level, "Bueno");
    }

    #[test]
    fn test_sample_payload_indicators() {
        let report = assemble(bogota(), 4.6, -74.08).unwrap();
        assert_eq!(report.iaqi.len(), 13);

        let temperature = &report.iaqi["Temperatura"];
        assert_eq!(temperature.value, Some(15.0));
        assert_eq!(temperature.units, "°C");
        assert_eq!(temperature.name, "Temperatura");

        let gusts = &report.iaqi["Ráfagas"];
        assert_eq!(gusts.value, Some(9.7));
        assert_eq!(gusts.units, "m/s");
    }

    #[test]
    fn test_sample_payload_forecast_copied_through() {
        let report = assemble(bogota(), 4.6, -74.08).unwrap();
        let series: Vec<_> = report.forecast.keys().map(String::as_str).collect();
        assert_eq!(series, vec!["pm10", "pm25", "uvi"]);

        let first = &report.forecast["pm25"][0];
        assert_eq!(first.day, "2025-09-16");
        assert_eq!(first.avg, Some(35.0));
        assert_eq!(first.min, Some(19.0));
        assert_eq!(first.max, Some(55.0));
        assert_eq!(report.forecast["pm25"].len(), 3);
    }

    #[test]
    fn test_sample_payload_location_prefers_request_coordinates() {
        let report = assemble(bogota(), 4.6, -74.08).unwrap();
        assert_eq!(report.location.name, "Tunal, Bogota, Colombia");
        assert_eq!(report.location.lat, 4.6);
        assert_eq!(report.location.lon, -74.08);
    }

    #[test]
    fn test_serialized_shape() {
        let report = assemble(bogota(), 4.6, -74.08).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["aqi"], 38);
        assert_eq!(json["aqi_health_analysis"]["cautionary_statement"], "Ninguna");
        assert_eq!(json["pollutants"]["PM2.5"]["units"], "μg/m³");
        assert_eq!(json["iaqi"]["Humedad"]["name"], "Humedad Relativa");
        assert_eq!(json["forecast"]["pm10"][0]["day"], "2025-09-16");
        assert_eq!(json["location"]["lon"], -74.08);
        assert!(json["risk_prediction"].is_string());
    }

    // --- Failure path -------------------------------------------------------

    #[test]
    fn test_error_status_yields_error_not_report() {
        let result = build_report(&raw(json!({ "status": "error", "data": "Invalid key" })));
        assert_eq!(
            result,
            Err(AirQualityError::UpstreamDataRejected(Some("Invalid key".to_string())))
        );
    }

    #[test]
    fn test_missing_status_is_rejected() {
        let result = build_report(&raw(json!({ "data": { "aqi": 10 } })));
        assert_eq!(result, Err(AirQualityError::UpstreamDataRejected(None)));
    }

    // --- Missing and unknown fields -----------------------------------------

    #[test]
    fn test_missing_iaqi_gives_empty_maps() {
        let report = build_report(&raw(json!({ "status": "ok", "data": { "aqi": 60 } })))
            .expect("missing iaqi should not fail");
        assert!(report.pollutants.is_empty());
        assert!(report.iaqi.is_empty());
        assert_eq!(report.aqi_health_analysis.level, "Moderado");
    }

    #[test]
    fn test_missing_aqi_defaults_to_zero() {
        let report = build_report(&raw(json!({ "status": "ok", "data": { "idx": 1 } }))).unwrap();
        assert_eq!(report.aqi, 0);
        assert_eq!(report.aqi_health_analysis.level, "Bueno");
    }

    #[test]
    fn test_offline_station_aqi_is_an_error_not_good_air() {
        let result = build_report(&raw(json!({ "status": "ok", "data": { "aqi": "-" } })));
        let err = result.expect_err("a non-numeric aqi must not produce a report");
        assert!(matches!(err, AirQualityError::UpstreamMalformed(_)));
        assert!(
            err.to_string()
                .starts_with("Error al procesar los datos de calidad del aire")
        );
    }

    // --- Fractional index ---------------------------------------------------

    #[test]
    fn test_fractional_index_is_classified_before_rounding() {
        let report = build_report(&raw(json!({ "status": "ok", "data": { "aqi": 50.4 } }))).unwrap();
        assert_eq!(report.aqi, 50);
        assert_eq!(report.aqi_health_analysis.level, "Moderado");

        let report = build_report(&raw(json!({ "status": "ok", "data": { "aqi": 100.4 } }))).unwrap();
        assert_eq!(report.aqi, 100);
        assert_eq!(report.aqi_health_analysis.level, "Poco saludable para grupos sensibles");
        assert_eq!(
            report.risk_prediction,
            "Se espera que la calidad del aire empeore ligeramente en las próximas horas"
        );
    }

    #[test]
    fn test_missing_data_block_still_builds() {
        let report = build_report(&raw(json!({ "status": "ok" }))).unwrap();
        assert_eq!(report.aqi, 0);
        assert!(report.forecast.is_empty());
        assert_eq!(report.location.name, "");
    }

    #[test]
    fn test_unknown_codes_are_dropped() {
        let report = build_report(&raw(json!({
            "status": "ok",
            "data": { "iaqi": { "uvi": { "v": 3 }, "xx": { "v": 1 }, "t": { "v": 20 } } }
        })))
        .unwrap();
        assert_eq!(report.iaqi.len(), 1);
        assert!(report.iaqi.contains_key("Temperatura"));
        assert!(report.pollutants.is_empty());
    }

    #[test]
    fn test_pollutant_without_value_is_null_and_unavailable() {
        let report = build_report(&raw(json!({
            "status": "ok",
            "data": { "iaqi": { "so2": {} } }
        })))
        .unwrap();
        let so2 = &report.pollutants["SO₂"];
        assert_eq!(so2.value, None);
        assert_eq!(so2.level, "Datos no disponibles");
        assert_eq!(so2.color, "#9E9E9E");
        assert_eq!(report.iaqi["SO₂"].value, None);
    }

    #[test]
    fn test_malformed_forecast_entries_are_skipped() {
        let report = build_report(&raw(json!({
            "status": "ok",
            "data": { "forecast": { "daily": {
                "pm25": [
                    { "day": "2025-09-16", "avg": 30 },
                    { "day": "yesterday", "avg": 1, "min": 0, "max": 2 },
                    { "avg": 5, "min": 1, "max": 9 },
                    "garbage"
                ],
                "o3": "not a series"
            } } }
        })))
        .unwrap();
        assert_eq!(report.forecast.len(), 1);
        let pm25 = &report.forecast["pm25"];
        assert_eq!(pm25.len(), 1);
        assert_eq!(pm25[0].avg, Some(30.0));
        assert_eq!(pm25[0].min, None);
    }

    // --- Location fallback --------------------------------------------------

    #[test]
    fn test_location_uses_request_coordinates_without_geo() {
        let payload = raw(json!({ "status": "ok", "data": { "city": { "name": "X" } } }))
            .with_request_coordinates(3.7, -74.0);
        let report = build_report(&payload).unwrap();
        assert_eq!((report.location.lat, report.location.lon), (3.7, -74.0));
    }

    #[test]
    fn test_location_falls_back_to_station_geo() {
        let report = build_report(&bogota()).unwrap();
        assert_eq!((report.location.lat, report.location.lon), (4.57619, -74.13093));
    }

    #[test]
    fn test_location_defaults_to_origin() {
        let report = build_report(&raw(json!({ "status": "ok", "data": {} }))).unwrap();
        assert_eq!((report.location.lat, report.location.lon), (0.0, 0.0));
    }
}
