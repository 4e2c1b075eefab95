//! Overall air-quality index classification.
//!
//! Two independent tables read the same index: the six-band health guidance
//! table and the coarser three-way risk narrative.

use super::{AqiLevel, BandTable, aqi_band_table};
use crate::model::AqiHealthAnalysis;

/// Overall index bands: <=50, <=100, <=150, <=200, <=300, then >300.
pub static AQI_BANDS: BandTable<AqiLevel> = aqi_band_table!(50.0, 100.0, 150.0, 200.0, 300.0);

const RISK_STABLE: &str =
    "La calidad del aire se mantendrá buena/moderada durante las próximas horas";
const RISK_WORSENING: &str =
    "Se espera que la calidad del aire empeore ligeramente en las próximas horas";
const RISK_CAUTION: &str = "Se recomienda precaución debido a la mala calidad del aire";

/// Risk narrative bands: <=100 stable, <=150 worsening, >150 caution.
pub static RISK_BANDS: BandTable<&'static str> = BandTable {
    steps: &[(100.0, RISK_STABLE), (150.0, RISK_WORSENING)],
    terminal: RISK_CAUTION,
};

/// Returns the severity level for an overall index value.
///
/// Zero and negative values are classified as `Good`; the index is not
/// range-checked.
pub fn classify_aqi_level(aqi: f64) -> AqiLevel {
    AQI_BANDS.classify(aqi)
}

/// Returns the health guidance for an overall index value.
pub fn classify_aqi(aqi: f64) -> AqiHealthAnalysis {
    let level = classify_aqi_level(aqi);
    let (health_implications, cautionary_statement) = guidance(level);
    AqiHealthAnalysis {
        level: level.label().to_string(),
        color_code: level.color_code().to_string(),
        health_implications: health_implications.to_string(),
        cautionary_statement: cautionary_statement.to_string(),
    }
}

/// Short narrative of the expected near-term trend for an overall index value.
pub fn risk_prediction(aqi: f64) -> &'static str {
    RISK_BANDS.classify(aqi)
}

/// (health implications, cautionary statement) for each level.
fn guidance(level: AqiLevel) -> (&'static str, &'static str) {
    match level {
        AqiLevel::Good => ("Sin riesgos para la salud", "Ninguna"),
        AqiLevel::Moderate => (
            "Calidad del aire aceptable; sin embargo, para algunos contaminantes puede haber \
             un riesgo moderado para la salud de un número muy pequeño de personas que son \
             inusualmente sensibles a la contaminación del aire.",
            "Las personas que son inusualmente sensibles a la contaminación del aire deberían \
             considerar limitar el tiempo al aire libre.",
        ),
        AqiLevel::UnhealthyForSensitiveGroups => (
            "La calidad del aire es aceptable; sin embargo, puede haber un riesgo moderado \
             para la salud de un número muy pequeño de personas que son inusualmente sensibles \
             a la contaminación del aire.",
            "Las personas que son inusualmente sensibles a la contaminación del aire deberían \
             considerar limitar el tiempo al aire libre.",
        ),
        AqiLevel::Unhealthy => (
            "La calidad del aire puede ser insalubre para las personas sensibles. Los miembros \
             de grupos sensibles pueden experimentar efectos para la salud. El público en \
             general probablemente no se verá afectado.",
            "Los miembros de grupos sensibles deben limitar el tiempo al aire libre.",
        ),
        AqiLevel::VeryUnhealthy => (
            "La calidad del aire es insalubre. Todos pueden comenzar a experimentar efectos \
             para la salud; los miembros de grupos sensibles pueden experimentar efectos más \
             graves para la salud.",
            "Todos deben limitar el tiempo al aire libre; los miembros de grupos sensibles \
             deben evitar el tiempo al aire libre.",
        ),
        AqiLevel::Hazardous => (
            "La calidad del aire es muy insalubre. Advertencias de salud de condiciones de \
             emergencia. Toda la población probablemente se verá afectada.",
            "Todos deben evitar el tiempo al aire libre.",
        ),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_strictly_ascending() {
        assert!(AQI_BANDS.is_strictly_ascending());
        assert!(RISK_BANDS.is_strictly_ascending());
    }

    // --- Band boundaries ----------------------------------------------------

    #[test]
    fn test_each_boundary_is_closed_on_the_lower_band() {
        let cases = [
            (50.0, AqiLevel::Good, 51.0, AqiLevel::Moderate),
            (100.0, AqiLevel::Moderate, 101.0, AqiLevel::UnhealthyForSensitiveGroups),
            (150.0, AqiLevel::UnhealthyForSensitiveGroups, 151.0, AqiLevel::Unhealthy),
            (200.0, AqiLevel::Unhealthy, 201.0, AqiLevel::VeryUnhealthy),
            (300.0, AqiLevel::VeryUnhealthy, 301.0, AqiLevel::Hazardous),
        ];
        for (at, at_level, above, above_level) in cases {
            assert_eq!(classify_aqi_level(at - 1.0), at_level, "just below {}", at);
            assert_eq!(classify_aqi_level(at), at_level, "at {}", at);
            assert_eq!(classify_aqi_level(above), above_level, "just above {}", at);
        }
    }

    #[test]
    fn test_zero_and_negative_index_are_good() {
        assert_eq!(classify_aqi_level(0.0), AqiLevel::Good);
        assert_eq!(classify_aqi_level(-20.0), AqiLevel::Good);
    }

    #[test]
    fn test_extreme_index_is_hazardous() {
        assert_eq!(classify_aqi_level(999.0), AqiLevel::Hazardous);
    }

    // --- Guidance text ------------------------------------------------------

    #[test]
    fn test_good_guidance_is_verbatim() {
        let analysis = classify_aqi(38.0);
        assert_eq!(analysis.level, "Bueno");
        assert_eq!(analysis.color_code, "#4CAF50");
        assert_eq!(analysis.health_implications, "Sin riesgos para la salud");
        assert_eq!(analysis.cautionary_statement, "Ninguna");
    }

    #[test]
    fn test_hazardous_guidance_is_verbatim() {
        let analysis = classify_aqi(350.0);
        assert_eq!(analysis.level, "Peligroso");
        assert_eq!(analysis.color_code, "#880E4F");
        assert_eq!(
            analysis.health_implications,
            "La calidad del aire es muy insalubre. Advertencias de salud de condiciones de \
             emergencia. Toda la población probablemente se verá afectada."
        );
        assert_eq!(analysis.cautionary_statement, "Todos deben evitar el tiempo al aire libre.");
    }

    #[test]
    fn test_line_continuations_do_not_leave_double_spaces() {
        for level in AqiLevel::ALL {
            let (implications, caution) = guidance(level);
            assert!(!implications.contains("  "), "{:?} implications", level);
            assert!(!caution.contains("  "), "{:?} caution", level);
        }
    }

    // --- Risk narrative -----------------------------------------------------

    #[test]
    fn test_risk_prediction_three_way_split() {
        assert_eq!(risk_prediction(0.0), RISK_STABLE);
        assert_eq!(risk_prediction(100.0), RISK_STABLE);
        assert_eq!(risk_prediction(101.0), RISK_WORSENING);
        assert_eq!(risk_prediction(150.0), RISK_WORSENING);
        assert_eq!(risk_prediction(151.0), RISK_CAUTION);
        assert_eq!(risk_prediction(500.0), RISK_CAUTION);
    }

    #[test]
    fn test_risk_narrative_is_independent_of_health_band() {
        // 75 is Moderate guidance but still the stable narrative.
        assert_eq!(classify_aqi_level(75.0), AqiLevel::Moderate);
        assert_eq!(risk_prediction(75.0), RISK_STABLE);
        // 180 is Unhealthy guidance and the caution narrative.
        assert_eq!(classify_aqi_level(180.0), AqiLevel::Unhealthy);
        assert_eq!(risk_prediction(180.0), RISK_CAUTION);
    }
}
