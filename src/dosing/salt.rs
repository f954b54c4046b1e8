//! Salt top-up for salt-chlorine-generator pools.

use serde::Serialize;

use crate::dosing::format::format_target;
use crate::dosing::{Chemical, Dose, DoseUnit, REFERENCE_GALLONS};
use crate::model::Parameter;

/// lbs of sodium chloride that raise 10,000 gal by 1000 ppm.
pub const SALT_LBS_PER_1000PPM: f64 = 183.0;

/// Weight of a standard retail salt bag.
pub const SALT_BAG_LBS: f64 = 40.0;

/// Amounts at or below this are not worth reporting.
const MIN_REPORTED_LBS: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SaltBreakdown {
    pub current_ppm: f64,
    pub desired_ppm: f64,
    pub lbs_needed: f64,
    pub bags: u32,
}

/// Salt needed to move from `current_ppm` to `desired_ppm`.
///
/// Returns `None` unless desired is above current and the amount exceeds
/// 0.01 lb.
pub fn salt_needed(current_ppm: f64, desired_ppm: f64, pool_gallons: f64) -> Option<SaltBreakdown> {
    if desired_ppm <= current_ppm {
        return None;
    }
    let lbs_needed = (desired_ppm - current_ppm) * pool_gallons * SALT_LBS_PER_1000PPM
        / (1000.0 * REFERENCE_GALLONS);
    if lbs_needed <= MIN_REPORTED_LBS {
        return None;
    }
    Some(SaltBreakdown {
        current_ppm,
        desired_ppm,
        lbs_needed,
        bags: (lbs_needed / SALT_BAG_LBS).ceil() as u32,
    })
}

/// The dosing instruction for a salt breakdown.
pub fn salt_dose(breakdown: &SaltBreakdown) -> Dose {
    Dose {
        parameter: Parameter::Salt,
        chemical: Chemical::Salt,
        amount: breakdown.lbs_needed,
        unit: DoseUnit::Pounds,
        target: breakdown.desired_ppm,
        instruction: format!(
            "Add {:.2} lbs of salt ({} x {} lb bags) to raise salt to {} ppm.",
            breakdown.lbs_needed,
            breakdown.bags,
            SALT_BAG_LBS,
            format_target(breakdown.desired_ppm)
        ),
    }
}
