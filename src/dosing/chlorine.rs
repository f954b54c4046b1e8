//! Free-chlorine requirement and sanitizer dosing.
//!
//! The weekly chlorine demand is the CYA-dependent minimum free chlorine
//! plus a week of sunlight loss. Sunlight loss follows the calendar month
//! of the evaluation date.
//!
//! # Date injection
//! Functions take the evaluation date as a parameter rather than reading
//! the clock, so results are deterministic for a given date.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::dosing::format::{format_fl_oz_or_gallons, format_lbs_and_oz, FL_OZ_PER_GALLON};
use crate::dosing::{volume_scale, Chemical, Dose, DoseUnit, REFERENCE_GALLONS};
use crate::model::Parameter;
use crate::regions::SanitizerForm;

/// Minimum free chlorine as a fraction of CYA.
pub const MIN_FC_FRACTION_OF_CYA: f64 = 0.05;

/// Days of UV loss accumulated between weekly visits.
pub const UV_LOSS_DAYS: f64 = 6.0;

/// oz of 73% calcium hypochlorite per 1 ppm per 10,000 gal.
const CAL_HYPO_OZ_PER_PPM: f64 = 2.0;

/// Gallons of 12.5% liquid chlorine per 1 ppm, per 10,000 gal, are 1/12.
const LIQUID_PPM_PER_GALLON: f64 = 12.0;

/// Weekly chlorine demand for one reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChlorineBreakdown {
    pub min_fc_ppm: f64,
    /// ppm lost per day to sunlight.
    pub loss_factor: f64,
    pub uv_loss_ppm: f64,
    pub calculated_dose_ppm: f64,
    pub tested_free_chlorine_ppm: f64,
    pub to_be_dosed_ppm: f64,
}

/// Daily UV loss (ppm/day) for a Northern-hemisphere calendar month.
pub fn seasonal_loss_factor(date: NaiveDate) -> f64 {
    match date.month() {
        11 | 12 | 1 => 1.5,
        2 | 3 => 2.0,
        4 | 5 | 9 | 10 => 2.5,
        _ => 3.0,
    }
}

/// Computes the chlorine still needed on `date` after the tested level.
pub fn chlorine_demand(free_chlorine_ppm: f64, cya_ppm: f64, date: NaiveDate) -> ChlorineBreakdown {
    let min_fc = cya_ppm * MIN_FC_FRACTION_OF_CYA;
    let loss_factor = seasonal_loss_factor(date);
    let uv_loss = loss_factor * UV_LOSS_DAYS;
    let calculated_dose = min_fc + uv_loss;
    let to_be_dosed = (calculated_dose - free_chlorine_ppm).max(0.0);

    ChlorineBreakdown {
        min_fc_ppm: min_fc,
        loss_factor,
        uv_loss_ppm: uv_loss,
        calculated_dose_ppm: calculated_dose,
        tested_free_chlorine_ppm: free_chlorine_ppm,
        to_be_dosed_ppm: to_be_dosed,
    }
}

/// Ounces of 73% calcium hypochlorite that raise free chlorine by `ppm`.
pub fn cal_hypo_ounces(ppm: f64, pool_gallons: f64) -> f64 {
    ppm * CAL_HYPO_OZ_PER_PPM * volume_scale(pool_gallons)
}

/// Gallons of 12.5% liquid chlorine that raise free chlorine by `ppm`.
pub fn liquid_chlorine_gallons(ppm: f64, pool_gallons: f64) -> f64 {
    ppm * pool_gallons / (LIQUID_PPM_PER_GALLON * REFERENCE_GALLONS)
}

/// Turns the chlorine shortfall into a dose of the region's sanitizer.
/// Returns `None` when nothing needs to be added.
pub fn sanitizer_dose(
    breakdown: &ChlorineBreakdown,
    form: SanitizerForm,
    pool_gallons: f64,
) -> Option<Dose> {
    let ppm = breakdown.to_be_dosed_ppm;
    if ppm <= 0.0 {
        return None;
    }

    let (chemical, amount, unit, quantity) = match form {
        SanitizerForm::CalciumHypochlorite => {
            let oz = cal_hypo_ounces(ppm, pool_gallons);
            (Chemical::CalciumHypochlorite, oz, DoseUnit::Ounces, format_lbs_and_oz(oz))
        }
        SanitizerForm::LiquidChlorine => {
            let fl_oz = liquid_chlorine_gallons(ppm, pool_gallons) * FL_OZ_PER_GALLON;
            let quantity = format_fl_oz_or_gallons(fl_oz);
            (Chemical::LiquidChlorine, fl_oz, DoseUnit::FluidOunces, quantity)
        }
    };
    if amount <= 0.0 {
        return None;
    }

    Some(Dose {
        parameter: Parameter::Chlorine,
        chemical,
        amount,
        unit,
        target: breakdown.calculated_dose_ppm,
        instruction: format!(
            "Add {} of {} to raise free chlorine by {:.2} ppm.",
            quantity, chemical, ppm
        ),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(month: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, 15).unwrap()
    }

    #[test]
    fn test_loss_factor_for_every_month() {
        let expected = [1.5, 2.0, 2.0, 2.5, 2.5, 3.0, 3.0, 3.0, 2.5, 2.5, 1.5, 1.5];
        for (month, factor) in (1..=12).zip(expected) {
            assert_eq!(
                seasonal_loss_factor(date(month)),
                factor,
                "wrong loss factor for month {}",
                month
            );
        }
    }

    #[test]
    fn test_demand_in_july() {
        let b = chlorine_demand(2.0, 40.0, date(7));
        assert_relative_eq!(b.min_fc_ppm, 2.0);
        assert_eq!(b.loss_factor, 3.0);
        assert_relative_eq!(b.uv_loss_ppm, 18.0);
        assert_relative_eq!(b.calculated_dose_ppm, 20.0);
        assert_relative_eq!(b.to_be_dosed_ppm, 18.0);
        assert_eq!(b.tested_free_chlorine_ppm, 2.0);
    }

    #[test]
    fn test_demand_never_negative() {
        let b = chlorine_demand(25.0, 40.0, date(12));
        assert_eq!(b.to_be_dosed_ppm, 0.0);
        assert!(sanitizer_dose(&b, SanitizerForm::CalciumHypochlorite, 10_000.0).is_none());
    }

    #[test]
    fn test_cal_hypo_dose_uses_lbs_and_oz() {
        let b = chlorine_demand(2.0, 40.0, date(7));
        let dose = sanitizer_dose(&b, SanitizerForm::CalciumHypochlorite, 10_000.0)
            .expect("18 ppm short should dose");
        assert_relative_eq!(dose.amount, 36.0);
        assert_eq!(
            dose.instruction,
            "Add 2 lbs 4.00 oz of 73% calcium hypochlorite to raise free chlorine by 18.00 ppm."
        );
    }

    #[test]
    fn test_liquid_chlorine_dose_for_florida() {
        // January: 1.5 * 6 = 9 ppm loss, min FC 1.5, tested 4.5 -> 6 ppm.
        let b = chlorine_demand(4.5, 30.0, date(1));
        assert_relative_eq!(b.to_be_dosed_ppm, 6.0);
        let dose = sanitizer_dose(&b, SanitizerForm::LiquidChlorine, 10_000.0)
            .expect("6 ppm short should dose");
        // 6 * 10000 / 120000 = 0.5 gal = 64 fl oz
        assert_relative_eq!(dose.amount, 64.0);
        assert_eq!(dose.unit, DoseUnit::FluidOunces);
        assert_eq!(
            dose.instruction,
            "Add 64.0 fl oz of 12.5% liquid chlorine to raise free chlorine by 6.00 ppm."
        );
    }

    #[test]
    fn test_liquid_chlorine_large_dose_in_gallons() {
        let b = chlorine_demand(0.0, 0.0, date(7));
        let dose = sanitizer_dose(&b, SanitizerForm::LiquidChlorine, 20_000.0)
            .expect("should dose");
        // 18 ppm * 20000 / 120000 = 3 gal
        assert_relative_eq!(dose.amount, 384.0);
        assert!(dose.instruction.starts_with("Add 3.00 gallons (384.0 fl oz)"));
    }

    #[test]
    fn test_sanitizer_amount_doubles_with_gallons() {
        let b = chlorine_demand(1.0, 60.0, date(4));
        for form in [SanitizerForm::CalciumHypochlorite, SanitizerForm::LiquidChlorine] {
            let small = sanitizer_dose(&b, form, 8_000.0).expect("should dose");
            let large = sanitizer_dose(&b, form, 16_000.0).expect("should dose");
            assert_relative_eq!(large.amount, 2.0 * small.amount, epsilon = 1e-9);
        }
    }
}
