//! Evaluation entry point: one reading in, one complete report out.
//!
//! # Date injection
//! `Engine::evaluate` takes the evaluation date as a parameter; the only
//! clock read is the `evaluate_today` convenience wrapper. Two calls with
//! the same reading, region and date return identical reports.

use chrono::NaiveDate;
use serde::Serialize;

use crate::balance::{compute_lsi, LsiReport};
use crate::config::EngineConfig;
use crate::dosing::chlorine::{chlorine_demand, sanitizer_dose, ChlorineBreakdown};
use crate::dosing::rules::{alkalinity_dose, calcium_dose, cya_dose, ph_dose};
use crate::dosing::salt::{salt_dose, salt_needed, SaltBreakdown};
use crate::dosing::{Dose, DosingAdvice};
use crate::logging::{self, Component};
use crate::model::{Reading, Region};
use crate::plan::{build_plan, WeeklyPlan};
use crate::regions::{profile_for, RegionProfile};

/// Everything computed for one reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineReport {
    pub region: Region,
    pub evaluated_on: NaiveDate,
    pub reading: Reading,
    /// The region's golden numbers and policies used for this evaluation.
    pub targets: RegionProfile,
    pub lsi: LsiReport,
    pub advice: DosingAdvice,
    pub plan: WeeklyPlan,
    pub chlorine: ChlorineBreakdown,
    pub salt: Option<SaltBreakdown>,
}

impl EngineReport {
    /// Doses to apply on this visit.
    pub fn adjust_now(&self) -> Vec<&Dose> {
        self.plan.adjust_now(&self.advice)
    }
}

/// Region profiles resolved once from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Engine {
    profiles: [RegionProfile; 3],
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            profiles: Region::ALL.map(|r| *profile_for(r)),
        }
    }
}

impl Engine {
    /// Built-in profiles with configured florida floors applied.
    pub fn from_config(config: &EngineConfig) -> Self {
        let floors = config.florida_floors();
        let mut engine = Self::default();
        for profile in engine.profiles.iter_mut() {
            *profile = profile.with_floors(floors);
        }
        engine
    }

    pub fn profile(&self, region: Region) -> &RegionProfile {
        match region {
            Region::Arizona => &self.profiles[0],
            Region::Texas => &self.profiles[1],
            Region::Florida => &self.profiles[2],
        }
    }

    /// Evaluates a reading for `region` as of `on`.
    pub fn evaluate(&self, reading: &Reading, region: Region, on: NaiveDate) -> EngineReport {
        let profile = self.profile(region);
        let ctx = Some(region.key());
        let gallons = reading.pool_gallons;

        let lsi = compute_lsi(reading);
        logging::debug(
            Component::Lsi,
            ctx,
            &format!(
                "corrected alkalinity {:.2} ppm, factors alk {} ca {} temp {} tds {}, LSI {:.2}",
                lsi.corrected_alkalinity_ppm,
                lsi.alkalinity_factor,
                lsi.calcium_factor,
                lsi.temperature_factor,
                lsi.tds_factor,
                lsi.value
            ),
        );

        let chlorine = chlorine_demand(reading.free_chlorine_ppm, reading.cya_ppm, on);
        logging::debug(
            Component::Sanitizer,
            ctx,
            &format!(
                "min FC {:.2}, loss {} ppm/day, to dose {:.2} ppm",
                chlorine.min_fc_ppm, chlorine.loss_factor, chlorine.to_be_dosed_ppm
            ),
        );

        let salt = salt_needed(reading.salt_ppm, desired_salt(reading), gallons);
        if let Some(s) = &salt {
            logging::debug(
                Component::Salt,
                ctx,
                &format!("{:.2} lbs needed ({} bags)", s.lbs_needed, s.bags),
            );
        }

        let advice = DosingAdvice {
            // Acid scales with the raw test-kit alkalinity, not the corrected value.
            ph: ph_dose(reading.ph, profile, gallons, reading.alkalinity_ppm),
            alkalinity: alkalinity_dose(lsi.corrected_alkalinity_ppm, profile, gallons),
            calcium: calcium_dose(reading.calcium_ppm, profile, gallons),
            cya: cya_dose(reading.cya_ppm, profile, gallons),
            chlorine: sanitizer_dose(&chlorine, profile.sanitizer, gallons),
            salt: salt.as_ref().map(salt_dose),
        };
        for dose in advice.doses() {
            logging::debug(Component::Dosing, ctx, &dose.instruction);
        }

        let plan = build_plan(reading, lsi.corrected_alkalinity_ppm, profile, &advice);
        logging::debug(
            Component::Plan,
            ctx,
            &format!("{:?} plan: {:?}", plan.branch, plan.visits),
        );

        let report = EngineReport {
            region,
            evaluated_on: on,
            reading: *reading,
            targets: *profile,
            lsi,
            advice,
            plan,
            chlorine,
            salt,
        };
        logging::log_evaluation_summary(
            region,
            report.lsi.status,
            report.lsi.value,
            report.adjust_now().len(),
            report.plan.deferred().len(),
        );
        report
    }

    /// Convenience wrapper that evaluates as of the local calendar date.
    /// Use `evaluate` in tests to keep them deterministic.
    pub fn evaluate_today(&self, reading: &Reading, region: Region) -> EngineReport {
        self.evaluate(reading, region, chrono::Local::now().date_naive())
    }
}

/// Evaluates with the built-in region profiles.
pub fn evaluate(reading: &Reading, region: Region, on: NaiveDate) -> EngineReport {
    Engine::default().evaluate(reading, region, on)
}

/// Salt level to dose toward. An absent desired level counts as 0, so
/// salt is only added when the owner asks for a level above the reading.
fn desired_salt(reading: &Reading) -> f64 {
    reading.salt_desired_ppm.unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regions::FloorThresholds;

    fn july() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 10).unwrap()
    }

    fn reading() -> Reading {
        Reading {
            ph: 7.5,
            alkalinity_ppm: 120.0,
            calcium_ppm: 400.0,
            temperature_f: 84.0,
            tds_ppm: 500.0,
            cya_ppm: 0.0,
            free_chlorine_ppm: 3.0,
            salt_ppm: 0.0,
            salt_desired_ppm: None,
            pool_gallons: 10_000.0,
        }
    }

    #[test]
    fn test_desired_salt_defaults_to_zero() {
        let mut r = reading();
        assert_eq!(desired_salt(&r), 0.0);
        r.salt_ppm = 2800.0;
        assert_eq!(desired_salt(&r), 0.0);
        r.salt_desired_ppm = Some(3400.0);
        assert_eq!(desired_salt(&r), 3400.0);
    }

    #[test]
    fn test_salt_reading_alone_gets_no_salt_advice() {
        let mut r = reading();
        r.salt_ppm = 2700.0;
        let report = evaluate(&r, Region::Texas, july());
        assert!(report.salt.is_none());
        assert!(report.advice.salt.is_none());
    }

    #[test]
    fn test_non_salt_pool_gets_no_salt_advice() {
        let report = evaluate(&reading(), Region::Arizona, july());
        assert!(report.salt.is_none());
        assert!(report.advice.salt.is_none());
    }

    #[test]
    fn test_salt_pool_below_desired_level_gets_salt_advice() {
        let mut r = reading();
        r.salt_ppm = 2700.0;
        r.salt_desired_ppm = Some(3200.0);
        let report = evaluate(&r, Region::Texas, july());
        let salt = report.salt.expect("salt pool below desired level should get salt");
        assert_eq!(salt.bags, 3);
        assert!(report.advice.salt.is_some());
    }

    #[test]
    fn test_configured_floors_reach_florida_only() {
        let config = EngineConfig {
            florida_floors: crate::config::FloorConfig {
                alkalinity: 90.0,
                calcium: 200.0,
                cya: 30.0,
            },
            ..Default::default()
        };
        let engine = Engine::from_config(&config);
        assert_eq!(
            engine.profile(Region::Florida).trigger,
            crate::regions::TriggerPolicy::AbsoluteFloor(FloorThresholds {
                alkalinity_ppm: 90.0,
                calcium_ppm: 200.0,
                cya_ppm: 30.0,
            })
        );
        assert_eq!(engine.profile(Region::Arizona), profile_for(Region::Arizona));

        let mut r = reading();
        r.alkalinity_ppm = 80.0;
        assert!(engine.evaluate(&r, Region::Florida, july()).advice.alkalinity.is_some());
        assert!(evaluate(&r, Region::Florida, july()).advice.alkalinity.is_none());
    }

    #[test]
    fn test_florida_recommends_liquid_chlorine() {
        let report = evaluate(&reading(), Region::Florida, july());
        let dose = report.advice.chlorine.expect("July demand should need chlorine");
        assert_eq!(dose.chemical, crate::dosing::Chemical::LiquidChlorine);
    }
}
