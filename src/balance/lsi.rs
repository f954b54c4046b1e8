//! Langelier Saturation Index computation and classification.

use serde::Serialize;
use std::fmt;

use crate::balance::factors::{
    lookup_factor, tds_factor, ALKALINITY_FACTORS, CALCIUM_FACTORS, TEMPERATURE_FACTORS,
};
use crate::model::Reading;

/// Qualitative band of an LSI value, from most corrosive to most scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LsiStatus {
    VeryCorrosive,
    Corrosive,
    SlightlyCorrosive,
    Balanced,
    SlightlyScaleForming,
    ScaleForming,
}

impl LsiStatus {
    /// Classifies an index value. Bands, first match wins:
    ///   < -0.5 | [-0.5, -0.2) | [-0.2, -0.05) | [-0.05, 0.3] | (0.3, 0.5] | > 0.5
    pub fn classify(lsi: f64) -> LsiStatus {
        if lsi < -0.5 {
            LsiStatus::VeryCorrosive
        } else if lsi < -0.2 {
            LsiStatus::Corrosive
        } else if lsi < -0.05 {
            LsiStatus::SlightlyCorrosive
        } else if lsi <= 0.3 {
            LsiStatus::Balanced
        } else if lsi <= 0.5 {
            LsiStatus::SlightlyScaleForming
        } else {
            LsiStatus::ScaleForming
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LsiStatus::VeryCorrosive => "Very Corrosive",
            LsiStatus::Corrosive => "Corrosive",
            LsiStatus::SlightlyCorrosive => "Slightly Corrosive",
            LsiStatus::Balanced => "Balanced",
            LsiStatus::SlightlyScaleForming => "Slightly Scale Forming",
            LsiStatus::ScaleForming => "Scale Forming",
        }
    }
}

impl fmt::Display for LsiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Every input and factor that went into one index value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LsiReport {
    pub ph: f64,
    pub corrected_alkalinity_ppm: f64,
    pub alkalinity_factor: f64,
    pub calcium_factor: f64,
    pub temperature_factor: f64,
    pub tds_factor: f64,
    pub value: f64,
    pub status: LsiStatus,
}

/// Alkalinity with the cyanurate contribution removed, floored at zero.
///
/// Test kits read cyanurate as alkalinity; roughly a third of the CYA level
/// is not carbonate alkalinity.
pub fn corrected_alkalinity(alkalinity_ppm: f64, cya_ppm: f64) -> f64 {
    (alkalinity_ppm - cya_ppm / 3.0).max(0.0)
}

/// Computes the index for a reading.
pub fn compute_lsi(reading: &Reading) -> LsiReport {
    let corrected = corrected_alkalinity(reading.alkalinity_ppm, reading.cya_ppm);

    let alkalinity_factor = lookup_factor(corrected, ALKALINITY_FACTORS);
    let calcium_factor = lookup_factor(reading.calcium_ppm, CALCIUM_FACTORS);
    let temperature_factor = lookup_factor(reading.temperature_f, TEMPERATURE_FACTORS);
    let tds = tds_factor(reading.tds_ppm);

    let value = reading.ph + calcium_factor + alkalinity_factor + temperature_factor - tds;

    LsiReport {
        ph: reading.ph,
        corrected_alkalinity_ppm: corrected,
        alkalinity_factor,
        calcium_factor,
        temperature_factor,
        tds_factor: tds,
        value,
        status: LsiStatus::classify(value),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
