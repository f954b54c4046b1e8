//! Weekly adjustment planning.
//!
//! Correcting everything at once fights itself (acid lowers alkalinity,
//! bicarbonate raises pH), so corrections are spread over three visits.
//! Only the first visit is acted on; later visits are notices that need a
//! retest before any chemical goes in.

use serde::Serialize;

use crate::dosing::{Dose, DosingAdvice};
use crate::model::{Parameter, Reading};
use crate::regions::RegionProfile;

/// Number of visits a plan covers.
pub const VISIT_COUNT: usize = 3;

/// pH below which a low-alkalinity pool gets alkalinity first.
pub const LOW_PH_FOR_ALKALINITY_FIRST: f64 = 7.5;
/// Corrected alkalinity at or below which alkalinity goes first.
pub const LOW_ALKALINITY_FOR_ALKALINITY_FIRST: f64 = 80.0;

/// pH outside this range is corrected on the first visit.
pub const PH_BAND: (f64, f64) = (7.2, 7.8);
/// Corrected alkalinity band (ppm).
pub const ALKALINITY_BAND: (f64, f64) = (80.0, 140.0);
/// Calcium hardness band (ppm).
pub const CALCIUM_BAND: (f64, f64) = (200.0, 500.0);
/// CYA band relative to the region target (ppm below, ppm above).
pub const CYA_BAND_OFFSETS: (f64, f64) = (10.0, 20.0);

/// Which scheduling rule produced a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanBranch {
    /// Low pH with low alkalinity: raise alkalinity alone first, since it
    /// also lifts pH.
    AlkalinityFirst,
    /// pH first when outside its band, then the remaining items one per
    /// visit.
    Standard,
}

/// Three ordered visits, each holding the parameters to address.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyPlan {
    pub branch: PlanBranch,
    pub visits: [Vec<Parameter>; VISIT_COUNT],
}

/// A visit rendered into display lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitSummary {
    /// 1-based week number.
    pub week: usize,
    pub deferred: bool,
    pub lines: Vec<String>,
}

impl WeeklyPlan {
    /// Doses to apply on this visit, in plan order. Parameters without a
    /// dose are skipped.
    pub fn adjust_now<'a>(&self, advice: &'a DosingAdvice) -> Vec<&'a Dose> {
        self.visits[0]
            .iter()
            .filter_map(|p| advice.get(*p))
            .collect()
    }

    /// Parameters held back to later visits.
    pub fn deferred(&self) -> Vec<Parameter> {
        self.visits[1..].iter().flatten().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.visits.iter().all(Vec::is_empty)
    }

    /// Display lines for every visit.
    pub fn describe(&self, advice: &DosingAdvice) -> Vec<VisitSummary> {
        self.visits
            .iter()
            .enumerate()
            .map(|(idx, params)| {
                let deferred = idx > 0;
                let lines = if params.is_empty() {
                    vec!["No adjustments needed.".to_string()]
                } else {
                    params
                        .iter()
                        .map(|p| describe_item(*p, advice.get(*p), deferred))
                        .collect()
                };
                VisitSummary { week: idx + 1, deferred, lines }
            })
            .collect()
    }
}

fn describe_item(parameter: Parameter, dose: Option<&Dose>, deferred: bool) -> String {
    match (dose, deferred) {
        (Some(d), false) => d.instruction.clone(),
        (Some(d), true) => format!("Retest before dosing. Expected: {}", d.instruction),
        (None, _) => format!("Monitor {}: out of range, no dose applies.", parameter),
    }
}

// ---------------------------------------------------------------------------
// Band tests
// ---------------------------------------------------------------------------

pub fn ph_out_of_band(ph: f64) -> bool {
    ph < PH_BAND.0 || ph > PH_BAND.1
}

/// Floor-triggered regions use their floor as the lower bound.
pub fn alkalinity_out_of_band(corrected_alkalinity_ppm: f64, profile: &RegionProfile) -> bool {
    let low = profile
        .trigger
        .floor_for(Parameter::Alkalinity)
        .unwrap_or(ALKALINITY_BAND.0);
    corrected_alkalinity_ppm < low || corrected_alkalinity_ppm > ALKALINITY_BAND.1
}

pub fn calcium_out_of_band(calcium_ppm: f64, profile: &RegionProfile) -> bool {
    let low = profile
        .trigger
        .floor_for(Parameter::Calcium)
        .unwrap_or(CALCIUM_BAND.0);
    calcium_ppm < low || calcium_ppm > CALCIUM_BAND.1
}

/// CYA band is relative to the region target; a floor is inclusive.
pub fn cya_out_of_band(cya_ppm: f64, profile: &RegionProfile) -> bool {
    let high = profile.target_cya_ppm + CYA_BAND_OFFSETS.1;
    let low = match profile.trigger.floor_for(Parameter::Cya) {
        Some(floor) => cya_ppm <= floor,
        None => cya_ppm < profile.target_cya_ppm - CYA_BAND_OFFSETS.0,
    };
    low || cya_ppm > high
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

/// Assigns out-of-range parameters to visits.
pub fn build_plan(
    reading: &Reading,
    corrected_alkalinity_ppm: f64,
    profile: &RegionProfile,
    advice: &DosingAdvice,
) -> WeeklyPlan {
    let mut visits: [Vec<Parameter>; VISIT_COUNT] = Default::default();

    let alkalinity_first = reading.ph < LOW_PH_FOR_ALKALINITY_FIRST
        && corrected_alkalinity_ppm <= LOW_ALKALINITY_FOR_ALKALINITY_FIRST
        && advice.alkalinity.is_some();

    if alkalinity_first {
        visits[0].push(Parameter::Alkalinity);
        let queued = [
            (Parameter::Cya, cya_out_of_band(reading.cya_ppm, profile)),
            (Parameter::Calcium, calcium_out_of_band(reading.calcium_ppm, profile)),
        ];
        let pending = queued.iter().filter(|(_, out)| *out).map(|(p, _)| *p);
        for (visit, parameter) in visits[1..].iter_mut().zip(pending) {
            visit.push(parameter);
        }
        return WeeklyPlan { branch: PlanBranch::AlkalinityFirst, visits };
    }

    if ph_out_of_band(reading.ph) {
        visits[0].push(Parameter::Ph);
    }
    let queued = [
        (Parameter::Alkalinity, alkalinity_out_of_band(corrected_alkalinity_ppm, profile)),
        (Parameter::Cya, cya_out_of_band(reading.cya_ppm, profile)),
        (Parameter::Calcium, calcium_out_of_band(reading.calcium_ppm, profile)),
    ];
    let pending = queued.iter().filter(|(_, out)| *out).map(|(p, _)| *p);
    for (visit, parameter) in visits.iter_mut().zip(pending) {
        visit.push(parameter);
    }
    WeeklyPlan { branch: PlanBranch::Standard, visits }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dosing::{Chemical, DoseUnit};
    use crate::regions::{ARIZONA, FLORIDA};

    fn reading(ph: f64, alkalinity: f64, calcium: f64, cya: f64) -> Reading {
        Reading {
            ph,
            alkalinity_ppm: alkalinity,
            calcium_ppm: calcium,
            temperature_f: 80.0,
            tds_ppm: 500.0,
            cya_ppm: cya,
            free_chlorine_ppm: 2.0,
            salt_ppm: 0.0,
            salt_desired_ppm: None,
            pool_gallons: 10_000.0,
        }
    }

    fn dose(parameter: Parameter, instruction: &str) -> Dose {
        Dose {
            parameter,
            chemical: Chemical::SodiumBicarbonate,
            amount: 1.0,
            unit: DoseUnit::Pounds,
            target: 0.0,
            instruction: instruction.to_string(),
        }
    }

    fn advice_with_alkalinity() -> DosingAdvice {
        DosingAdvice {
            alkalinity: Some(dose(Parameter::Alkalinity, "raise alk")),
            cya: Some(dose(Parameter::Cya, "raise cya")),
            calcium: Some(dose(Parameter::Calcium, "raise calcium")),
            ..Default::default()
        }
    }

    // --- Band tests ----------------------------------------------------------

    #[test]
    fn test_ph_band_edges_are_in_band() {
        assert!(!ph_out_of_band(7.2));
        assert!(!ph_out_of_band(7.8));
        assert!(ph_out_of_band(7.19));
        assert!(ph_out_of_band(7.81));
    }

    #[test]
    fn test_cya_band_follows_target() {
        // Arizona target 80: band [70, 100].
        assert!(!cya_out_of_band(70.0, &ARIZONA));
        assert!(cya_out_of_band(69.0, &ARIZONA));
        assert!(cya_out_of_band(101.0, &ARIZONA));
        // Florida: floor 30 inclusive, upper 70.
        assert!(cya_out_of_band(30.0, &FLORIDA));
        assert!(!cya_out_of_band(35.0, &FLORIDA));
        assert!(cya_out_of_band(71.0, &FLORIDA));
    }

    #[test]
    fn test_alkalinity_band_uses_floor_in_florida() {
        assert!(alkalinity_out_of_band(70.0, &ARIZONA));
        assert!(!alkalinity_out_of_band(70.0, &FLORIDA));
        assert!(alkalinity_out_of_band(150.0, &FLORIDA));
    }

    // --- Branch A ------------------------------------------------------------

    #[test]
    fn test_low_ph_low_alkalinity_puts_alkalinity_alone_first() {
        let r = reading(7.3, 70.0, 150.0, 40.0);
        let plan = build_plan(&r, 70.0, &ARIZONA, &advice_with_alkalinity());
        assert_eq!(plan.branch, PlanBranch::AlkalinityFirst);
        assert_eq!(plan.visits[0], vec![Parameter::Alkalinity]);
        assert_eq!(plan.visits[1], vec![Parameter::Cya]);
        assert_eq!(plan.visits[2], vec![Parameter::Calcium]);
    }

    #[test]
    fn test_branch_a_shifts_calcium_up_when_cya_is_fine() {
        let r = reading(7.3, 70.0, 150.0, 80.0);
        let plan = build_plan(&r, 70.0, &ARIZONA, &advice_with_alkalinity());
        assert_eq!(plan.visits[1], vec![Parameter::Calcium]);
        assert!(plan.visits[2].is_empty());
    }

    #[test]
    fn test_branch_a_needs_an_alkalinity_dose() {
        let r = reading(7.3, 70.0, 300.0, 80.0);
        let plan = build_plan(&r, 70.0, &ARIZONA, &DosingAdvice::default());
        assert_eq!(plan.branch, PlanBranch::Standard);
        assert_eq!(plan.visits[0], vec![Parameter::Alkalinity]);
    }

    #[test]
    fn test_branch_a_boundaries() {
        let advice = advice_with_alkalinity();
        // Corrected alkalinity exactly 80 still qualifies.
        let plan = build_plan(&reading(7.3, 80.0, 300.0, 80.0), 80.0, &ARIZONA, &advice);
        assert_eq!(plan.branch, PlanBranch::AlkalinityFirst);
        // pH exactly 7.5 does not.
        let plan = build_plan(&reading(7.5, 80.0, 300.0, 80.0), 80.0, &ARIZONA, &advice);
        assert_eq!(plan.branch, PlanBranch::Standard);
    }

    // --- Branch B ------------------------------------------------------------

    #[test]
    fn test_ph_shares_first_visit_with_first_out_of_band_item() {
        let r = reading(7.0, 160.0, 150.0, 40.0);
        let plan = build_plan(&r, 160.0, &ARIZONA, &DosingAdvice::default());
        assert_eq!(plan.branch, PlanBranch::Standard);
        assert_eq!(plan.visits[0], vec![Parameter::Ph, Parameter::Alkalinity]);
        assert_eq!(plan.visits[1], vec![Parameter::Cya]);
        assert_eq!(plan.visits[2], vec![Parameter::Calcium]);
    }

    #[test]
    fn test_items_fill_visits_in_order_without_ph() {
        let r = reading(7.4, 100.0, 150.0, 40.0);
        let plan = build_plan(&r, 100.0, &ARIZONA, &DosingAdvice::default());
        assert_eq!(plan.visits[0], vec![Parameter::Cya]);
        assert_eq!(plan.visits[1], vec![Parameter::Calcium]);
        assert!(plan.visits[2].is_empty());
    }

    #[test]
    fn test_balanced_pool_has_empty_plan() {
        let r = reading(7.5, 120.0, 400.0, 80.0);
        let plan = build_plan(&r, 120.0, &ARIZONA, &DosingAdvice::default());
        assert!(plan.is_empty());
        let summary = plan.describe(&DosingAdvice::default());
        assert_eq!(summary.len(), VISIT_COUNT);
        assert!(summary.iter().all(|v| v.lines == vec!["No adjustments needed.".to_string()]));
    }

    // --- Output ----------------------------------------------------------------

    #[test]
    fn test_only_first_visit_is_actionable() {
        let r = reading(7.3, 70.0, 150.0, 40.0);
        let advice = advice_with_alkalinity();
        let plan = build_plan(&r, 70.0, &ARIZONA, &advice);
        let now: Vec<_> = plan.adjust_now(&advice).iter().map(|d| d.parameter).collect();
        assert_eq!(now, vec![Parameter::Alkalinity]);
        assert_eq!(plan.deferred(), vec![Parameter::Cya, Parameter::Calcium]);

        let summary = plan.describe(&advice);
        assert!(!summary[0].deferred);
        assert_eq!(summary[0].lines, vec!["raise alk".to_string()]);
        assert!(summary[1].deferred);
        assert_eq!(
            summary[1].lines,
            vec!["Retest before dosing. Expected: raise cya".to_string()]
        );
    }

    #[test]
    fn test_item_without_dose_is_reported_for_monitoring() {
        let r = reading(7.4, 100.0, 600.0, 80.0);
        let plan = build_plan(&r, 100.0, &ARIZONA, &DosingAdvice::default());
        assert_eq!(plan.visits[0], vec![Parameter::Calcium]);
        assert!(plan.adjust_now(&DosingAdvice::default()).is_empty());
        let summary = plan.describe(&DosingAdvice::default());
        assert_eq!(
            summary[0].lines,
            vec!["Monitor calcium hardness: out of range, no dose applies.".to_string()]
        );
    }
}
