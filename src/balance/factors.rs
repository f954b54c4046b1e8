//! Langelier factor tables.
//!
//! Each table maps a measured quantity to its LSI contribution using the
//! standard published step values. Lookup is a step function: a value
//! between two thresholds takes the factor of the upper entry, and values
//! past the last threshold saturate at the last factor.

/// One (threshold, factor) step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorStep {
    pub threshold: f64,
    pub factor: f64,
}

const fn step(threshold: f64, factor: f64) -> FactorStep {
    FactorStep { threshold, factor }
}

/// Alkalinity factor, keyed on cyanurate-corrected alkalinity (ppm).
pub static ALKALINITY_FACTORS: &[FactorStep] = &[
    step(5.0, 0.7),
    step(25.0, 1.4),
    step(50.0, 1.7),
    step(75.0, 1.9),
    step(100.0, 2.0),
    step(125.0, 2.1),
    step(150.0, 2.2),
    step(200.0, 2.3),
    step(250.0, 2.4),
    step(300.0, 2.5),
    step(400.0, 2.6),
    step(800.0, 2.9),
    step(1000.0, 3.0),
];

/// Calcium hardness factor (ppm).
pub static CALCIUM_FACTORS: &[FactorStep] = &[
    step(5.0, 0.3),
    step(25.0, 1.0),
    step(50.0, 1.3),
    step(75.0, 1.5),
    step(100.0, 1.6),
    step(125.0, 1.7),
    step(150.0, 1.8),
    step(200.0, 1.9),
    step(250.0, 2.0),
    step(300.0, 2.1),
    step(400.0, 2.2),
    step(800.0, 2.5),
    step(1000.0, 2.6),
];

/// Water temperature factor (°F).
pub static TEMPERATURE_FACTORS: &[FactorStep] = &[
    step(32.0, 0.1),
    step(37.0, 0.1),
    step(46.0, 0.2),
    step(53.0, 0.3),
    step(60.0, 0.4),
    step(66.0, 0.5),
    step(76.0, 0.6),
    step(84.0, 0.7),
    step(94.0, 0.8),
    step(104.0, 0.9),
    step(128.0, 1.0),
];

/// Returns the factor of the first step whose threshold is at or above
/// `value`, or the last step's factor when `value` exceeds every threshold.
///
/// Tables are non-empty and sorted ascending by threshold; an empty table
/// yields 0.0.
pub fn lookup_factor(value: f64, table: &[FactorStep]) -> f64 {
    table
        .iter()
        .find(|s| value <= s.threshold)
        .or_else(|| table.last())
        .map(|s| s.factor)
        .unwrap_or(0.0)
}

/// Total-dissolved-solids constant subtracted from the index.
pub fn tds_factor(tds_ppm: f64) -> f64 {
    if tds_ppm <= 800.0 {
        12.1
    } else if tds_ppm <= 1500.0 {
        12.2
    } else if tds_ppm <= 2900.0 {
        12.3
    } else if tds_ppm <= 5500.0 {
        12.4
    } else {
        12.5
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn all_tables() -> [(&'static str, &'static [FactorStep]); 3] {
        [
            ("alkalinity", ALKALINITY_FACTORS),
            ("calcium", CALCIUM_FACTORS),
            ("temperature", TEMPERATURE_FACTORS),
        ]
    }

    #[test]
    fn test_tables_are_strictly_ascending_by_threshold() {
        for (name, table) in all_tables() {
            for pair in table.windows(2) {
                assert!(
                    pair[0].threshold < pair[1].threshold,
                    "{} table out of order at {}",
                    name,
                    pair[1].threshold
                );
            }
        }
    }

    #[test]
    fn test_alkalinity_saturates_at_both_ends() {
        assert_eq!(lookup_factor(0.0, ALKALINITY_FACTORS), 0.7);
        assert_eq!(lookup_factor(1200.0, ALKALINITY_FACTORS), 3.0);
    }

    #[test]
    fn test_value_on_threshold_takes_that_entry() {
        assert_eq!(lookup_factor(100.0, ALKALINITY_FACTORS), 2.0);
        assert_eq!(lookup_factor(400.0, CALCIUM_FACTORS), 2.2);
        assert_eq!(lookup_factor(84.0, TEMPERATURE_FACTORS), 0.7);
    }

    #[test]
    fn test_value_between_thresholds_takes_upper_entry() {
        // 86.67 sits between 75 (1.9) and 100 (2.0).
        assert_eq!(lookup_factor(86.67, ALKALINITY_FACTORS), 2.0);
        // 350 sits between 300 (2.1) and 400 (2.2).
        assert_eq!(lookup_factor(350.0, CALCIUM_FACTORS), 2.2);
        assert_eq!(lookup_factor(80.0, TEMPERATURE_FACTORS), 0.7);
    }

    #[test]
    fn test_lookup_is_monotonic_non_decreasing() {
        for (name, table) in all_tables() {
            let mut previous = f64::MIN;
            let mut value = -10.0;
            while value <= 1500.0 {
                let factor = lookup_factor(value, table);
                assert!(
                    factor >= previous,
                    "{} factor decreased at {}: {} < {}",
                    name,
                    value,
                    factor,
                    previous
                );
                previous = factor;
                value += 0.5;
            }
        }
    }

    #[test]
    fn test_empty_table_yields_zero() {
        assert_eq!(lookup_factor(50.0, &[]), 0.0);
    }

    #[test]
    fn test_tds_bands_are_inclusive_upper_bounds() {
        assert_eq!(tds_factor(0.0), 12.1);
        assert_eq!(tds_factor(800.0), 12.1);
        assert_eq!(tds_factor(800.1), 12.2);
        assert_eq!(tds_factor(1500.0), 12.2);
        assert_eq!(tds_factor(2900.0), 12.3);
        assert_eq!(tds_factor(5500.0), 12.4);
        assert_eq!(tds_factor(5500.5), 12.5);
    }
}
