//! Health band classification.
//!
//! Every breakpoint table has the same shape: an ascending slice of
//! `(inclusive upper bound, band)` pairs plus an open-ended terminal band that
//! catches everything above the last bound. `BandTable::classify` is the one
//! scan shared by the overall index, the risk narrative and all pollutants.
//!
//! Submodules:
//! - `overall` — overall AQI guidance and the risk narrative.
//! - `pollutant` — per-pollutant concentration breakpoints.

// Declared ahead of `aqi_band_table!`; submodules import it by path.
pub mod overall;
pub mod pollutant;

/// Builds a six-level `BandTable<AqiLevel>` from the five upper bounds of
/// Good through VeryUnhealthy; Hazardous is the terminal band.
macro_rules! aqi_band_table {
    ($good:expr, $moderate:expr, $sensitive:expr, $unhealthy:expr, $very_unhealthy:expr) => {
        $crate::classify::BandTable {
            steps: &[
                ($good, $crate::classify::AqiLevel::Good),
                ($moderate, $crate::classify::AqiLevel::Moderate),
                ($sensitive, $crate::classify::AqiLevel::UnhealthyForSensitiveGroups),
                ($unhealthy, $crate::classify::AqiLevel::Unhealthy),
                ($very_unhealthy, $crate::classify::AqiLevel::VeryUnhealthy),
            ],
            terminal: $crate::classify::AqiLevel::Hazardous,
        }
    };
}

pub(crate) use aqi_band_table;

pub use overall::{classify_aqi, classify_aqi_level, risk_prediction};
pub use pollutant::{Pollutant, classify_pollutant, classify_pollutant_reading};

// ---------------------------------------------------------------------------
// Severity levels
// ---------------------------------------------------------------------------

/// Air-quality severity levels, in ascending order of severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AqiLevel {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiLevel {
    pub const ALL: [AqiLevel; 6] = [
        AqiLevel::Good,
        AqiLevel::Moderate,
        AqiLevel::UnhealthyForSensitiveGroups,
        AqiLevel::Unhealthy,
        AqiLevel::VeryUnhealthy,
        AqiLevel::Hazardous,
    ];

    /// Localized level name, shared by the overall index and pollutants.
    pub fn label(self) -> &'static str {
        match self {
            AqiLevel::Good => "Bueno",
            AqiLevel::Moderate => "Moderado",
            AqiLevel::UnhealthyForSensitiveGroups => "Poco saludable para grupos sensibles",
            AqiLevel::Unhealthy => "Insalubre",
            AqiLevel::VeryUnhealthy => "Muy insalubre",
            AqiLevel::Hazardous => "Peligroso",
        }
    }

    pub fn color_code(self) -> &'static str {
        match self {
            AqiLevel::Good => "#4CAF50",
            AqiLevel::Moderate => "#FFEB3B",
            AqiLevel::UnhealthyForSensitiveGroups => "#FF9800",
            AqiLevel::Unhealthy => "#F44336",
            AqiLevel::VeryUnhealthy => "#9C27B0",
            AqiLevel::Hazardous => "#880E4F",
        }
    }
}

// ---------------------------------------------------------------------------
// Breakpoint tables
// ---------------------------------------------------------------------------

/// An ordered breakpoint table.
///
/// `steps` must be strictly ascending by upper bound. Bounds are inclusive:
/// a value equal to a bound belongs to that bound's band.
#[derive(Debug)]
pub struct BandTable<T: 'static> {
    pub steps: &'static [(f64, T)],
    pub terminal: T,
}

impl<T: Copy + 'static> BandTable<T> {
    /// Returns the band of the first step whose upper bound is `>= value`,
    /// or the terminal band if the value exceeds every bound.
    ///
    /// NaN compares false against every bound and lands in the terminal band.
    pub fn classify(&self, value: f64) -> T {
        self.steps
            .iter()
            .find(|(upper, _)| value <= *upper)
            .map(|&(_, band)| band)
            .unwrap_or(self.terminal)
    }

    /// True if the upper bounds are strictly increasing.
    pub fn is_strictly_ascending(&self) -> bool {
        self.steps.windows(2).all(|pair| pair[0].0 < pair[1].0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static DIGITS: BandTable<u8> = BandTable {
        steps: &[(1.0, 1), (2.0, 2), (3.0, 3)],
        terminal: 9,
    };

    #[test]
    fn test_scan_bounds_are_inclusive() {
        assert_eq!(DIGITS.classify(1.0), 1);
        assert_eq!(DIGITS.classify(1.0001), 2);
        assert_eq!(DIGITS.classify(3.0), 3);
    }

    #[test]
    fn test_values_below_first_bound_fall_in_first_band() {
        assert_eq!(DIGITS.classify(0.0), 1);
        assert_eq!(DIGITS.classify(-1_000.0), 1);
    }

    #[test]
    fn test_values_above_last_bound_fall_in_terminal_band() {
        assert_eq!(DIGITS.classify(3.01), 9);
        assert_eq!(DIGITS.classify(f64::INFINITY), 9);
        assert_eq!(DIGITS.classify(f64::NAN), 9);
    }

    #[test]
    fn test_levels_are_ordered_by_severity() {
        for pair in AqiLevel::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_every_level_has_distinct_label_and_color() {
        let labels: std::collections::HashSet<_> =
            AqiLevel::ALL.iter().map(|l| l.label()).collect();
        let colors: std::collections::HashSet<_> =
            AqiLevel::ALL.iter().map(|l| l.color_code()).collect();
        assert_eq!(labels.len(), 6);
        assert_eq!(colors.len(), 6);
    }
}
