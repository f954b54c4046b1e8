//! Balance-chemical dosing rules: alkalinity, calcium, CYA and pH.
//!
//! All rules are raise-only apart from pH, which is lowered with muriatic
//! acid. Whether a raise fires is decided by the region's
//! `TriggerPolicy`; the amount formulas are the same everywhere and are
//! linear in both the deficit and the pool volume.

use crate::dosing::format::{format_fl_oz_or_gallons, format_oz_or_lbs, format_target};
use crate::dosing::{volume_scale, Chemical, Dose, DoseUnit};
use crate::model::Parameter;
use crate::regions::RegionProfile;

/// Deficits smaller than this (ppm) are within test-kit noise.
pub const PPM_TOLERANCE: f64 = 1.0;

/// pH differences smaller than this are ignored.
pub const PH_TOLERANCE: f64 = 0.01;

/// lbs of sodium bicarbonate per 10 ppm per 10,000 gal.
const BICARB_LBS_PER_10PPM: f64 = 1.5;

/// lbs of calcium chloride per 10 ppm per 10,000 gal.
const CALCIUM_CHLORIDE_LBS_PER_10PPM: f64 = 1.25;

/// oz of cyanuric acid per 10 ppm per 10,000 gal.
const CYA_OZ_PER_10PPM: f64 = 13.0;

/// oz of soda ash per 0.2 pH per 10,000 gal.
const SODA_ASH_OZ_PER_0_2_PH: f64 = 6.0;

/// fl oz of 31.45% muriatic acid per 1.0 pH per 10,000 gal at 100 ppm
/// alkalinity.
const ACID_FL_OZ_PER_PH: f64 = 76.0;

/// Resolves the dose target for a raise rule, or `None` when the policy
/// does not fire or the deficit is inside tolerance.
fn raise_target(
    parameter: Parameter,
    current: f64,
    profile: &RegionProfile,
) -> Option<(f64, f64)> {
    let golden = profile.target_for(parameter)?;
    let target = profile.trigger.raise_target(parameter, current, golden)?;
    let diff = target - current;
    if diff.abs() < PPM_TOLERANCE {
        return None;
    }
    Some((target, diff))
}

/// Sodium bicarbonate to raise (cyanurate-corrected) alkalinity.
pub fn alkalinity_dose(
    corrected_alkalinity_ppm: f64,
    profile: &RegionProfile,
    pool_gallons: f64,
) -> Option<Dose> {
    let (target, diff) = raise_target(Parameter::Alkalinity, corrected_alkalinity_ppm, profile)?;
    let lbs = (diff / 10.0) * BICARB_LBS_PER_10PPM * volume_scale(pool_gallons);
    if lbs <= 0.0 {
        return None;
    }
    Some(Dose {
        parameter: Parameter::Alkalinity,
        chemical: Chemical::SodiumBicarbonate,
        amount: lbs,
        unit: DoseUnit::Pounds,
        target,
        instruction: format!(
            "Add {:.2} lbs of {} to raise alkalinity to {} ppm.",
            lbs,
            Chemical::SodiumBicarbonate,
            format_target(target)
        ),
    })
}

/// Calcium chloride to raise calcium hardness.
pub fn calcium_dose(calcium_ppm: f64, profile: &RegionProfile, pool_gallons: f64) -> Option<Dose> {
    let (target, diff) = raise_target(Parameter::Calcium, calcium_ppm, profile)?;
    let lbs = (diff / 10.0) * CALCIUM_CHLORIDE_LBS_PER_10PPM * volume_scale(pool_gallons);
    if lbs <= 0.0 {
        return None;
    }
    Some(Dose {
        parameter: Parameter::Calcium,
        chemical: Chemical::CalciumChloride,
        amount: lbs,
        unit: DoseUnit::Pounds,
        target,
        instruction: format!(
            "Add {:.2} lbs of {} to raise calcium hardness to {} ppm.",
            lbs,
            Chemical::CalciumChloride,
            format_target(target)
        ),
    })
}

/// Cyanuric acid (stabilizer) to raise CYA.
pub fn cya_dose(cya_ppm: f64, profile: &RegionProfile, pool_gallons: f64) -> Option<Dose> {
    let (target, diff) = raise_target(Parameter::Cya, cya_ppm, profile)?;
    let oz = (diff / 10.0) * CYA_OZ_PER_10PPM * volume_scale(pool_gallons);
    if oz <= 0.0 {
        return None;
    }
    Some(Dose {
        parameter: Parameter::Cya,
        chemical: Chemical::CyanuricAcid,
        amount: oz,
        unit: DoseUnit::Ounces,
        target,
        instruction: format!(
            "Add {} of {} to raise CYA to {} ppm.",
            format_oz_or_lbs(oz),
            Chemical::CyanuricAcid,
            format_target(target)
        ),
    })
}

/// Muriatic acid (fl oz) needed to bring pH down to `target_ph`.
///
/// Scales with the *uncorrected* alkalinity reading, which stands in for
/// the water's buffering capacity. Returns `None` when no lowering is
/// needed.
pub fn acid_dose_fl_oz(
    current_ph: f64,
    target_ph: f64,
    pool_gallons: f64,
    alkalinity_ppm: f64,
) -> Option<f64> {
    if current_ph <= target_ph {
        return None;
    }
    let pool_factor = ACID_FL_OZ_PER_PH * volume_scale(pool_gallons);
    let alkalinity_factor = alkalinity_ppm / 100.0;
    let fl_oz = (current_ph - target_ph) * pool_factor * alkalinity_factor;
    (fl_oz > 0.0).then_some(fl_oz)
}

/// Soda ash to raise pH, or muriatic acid to lower it.
///
/// `alkalinity_ppm` must be the raw test-kit alkalinity; see
/// [`acid_dose_fl_oz`].
pub fn ph_dose(
    ph: f64,
    profile: &RegionProfile,
    pool_gallons: f64,
    alkalinity_ppm: f64,
) -> Option<Dose> {
    let target = profile.target_ph;
    let diff = target - ph;
    if diff.abs() < PH_TOLERANCE {
        return None;
    }

    if diff > 0.0 {
        let oz = (diff / 0.2) * SODA_ASH_OZ_PER_0_2_PH * volume_scale(pool_gallons);
        if oz <= 0.0 {
            return None;
        }
        return Some(Dose {
            parameter: Parameter::Ph,
            chemical: Chemical::SodaAsh,
            amount: oz,
            unit: DoseUnit::Ounces,
            target,
            instruction: format!(
                "Add {} of {} to raise pH to {}.",
                format_oz_or_lbs(oz),
                Chemical::SodaAsh,
                format_target(target)
            ),
        });
    }

    let fl_oz = acid_dose_fl_oz(ph, target, pool_gallons, alkalinity_ppm)?;
    Some(Dose {
        parameter: Parameter::Ph,
        chemical: Chemical::MuriaticAcid,
        amount: fl_oz,
        unit: DoseUnit::FluidOunces,
        target,
        instruction: format!(
            "Add {} of {} to lower pH to {}.",
            format_fl_oz_or_gallons(fl_oz),
            Chemical::MuriaticAcid,
            format_target(target)
        ),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
