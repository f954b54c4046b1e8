/// Region registry: golden numbers and dosing policy per region.
///
/// Defines the canonical target values ("golden numbers") for every
/// supported region, together with the policy that decides when a dose is
/// triggered and which sanitizer form is recommended. This is the single
/// source of truth for targets; other modules should take a
/// `RegionProfile` rather than hardcoding values.

use serde::Serialize;

use crate::model::{Parameter, Region};

// ---------------------------------------------------------------------------
// Policy types
// ---------------------------------------------------------------------------

/// Absolute trigger floors, in ppm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FloorThresholds {
    pub alkalinity_ppm: f64,
    pub calcium_ppm: f64,
    pub cya_ppm: f64,
}

/// Floors used for florida unless configuration overrides them.
pub const DEFAULT_FLORIDA_FLOORS: FloorThresholds = FloorThresholds {
    alkalinity_ppm: 60.0,
    calcium_ppm: 200.0,
    cya_ppm: 30.0,
};

/// When a raise-dose fires for alkalinity, calcium and CYA.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TriggerPolicy {
    /// Dose whenever the reading sits below the golden number.
    DeviationFromTarget,
    /// Dose only once the reading drops below an absolute floor
    /// (at or below, for CYA), regardless of the golden number.
    AbsoluteFloor(FloorThresholds),
}

impl TriggerPolicy {
    /// The floor configured for `parameter`, if this policy uses floors.
    pub fn floor_for(&self, parameter: Parameter) -> Option<f64> {
        match self {
            TriggerPolicy::DeviationFromTarget => None,
            TriggerPolicy::AbsoluteFloor(floors) => match parameter {
                Parameter::Alkalinity => Some(floors.alkalinity_ppm),
                Parameter::Calcium => Some(floors.calcium_ppm),
                Parameter::Cya => Some(floors.cya_ppm),
                _ => None,
            },
        }
    }

    /// Decides whether a raise-dose fires and returns the level to dose to.
    ///
    /// Only alkalinity, calcium and CYA are governed by the policy; other
    /// parameters return `None`. Under floors the dose aims for the higher
    /// of target and floor, so it stays positive if a configured floor sits
    /// above the golden number.
    pub fn raise_target(&self, parameter: Parameter, current: f64, target: f64) -> Option<f64> {
        match self {
            TriggerPolicy::DeviationFromTarget => {
                let diff = target - current;
                let fires = match parameter {
                    Parameter::Alkalinity | Parameter::Calcium => diff > 0.0,
                    Parameter::Cya => diff >= 1.0,
                    _ => false,
                };
                fires.then_some(target)
            }
            TriggerPolicy::AbsoluteFloor(_) => {
                let floor = self.floor_for(parameter)?;
                let fires = match parameter {
                    Parameter::Cya => current <= floor,
                    _ => current < floor,
                };
                fires.then_some(target.max(floor))
            }
        }
    }
}

/// Chemical form used for sanitizer dosing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SanitizerForm {
    /// 73% available chlorine, dosed by weight.
    CalciumHypochlorite,
    /// 12.5% sodium hypochlorite, dosed by volume.
    LiquidChlorine,
}

// ---------------------------------------------------------------------------
// Region profiles
// ---------------------------------------------------------------------------

/// Golden numbers and policies for one region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegionProfile {
    pub region: Region,
    pub target_ph: f64,
    pub target_alkalinity_ppm: f64,
    pub target_calcium_ppm: f64,
    pub target_cya_ppm: f64,
    pub target_salt_ppm: f64,
    pub trigger: TriggerPolicy,
    pub sanitizer: SanitizerForm,
}

impl RegionProfile {
    /// Golden number for a parameter. Chlorine has no fixed target.
    pub fn target_for(&self, parameter: Parameter) -> Option<f64> {
        match parameter {
            Parameter::Ph => Some(self.target_ph),
            Parameter::Alkalinity => Some(self.target_alkalinity_ppm),
            Parameter::Calcium => Some(self.target_calcium_ppm),
            Parameter::Cya => Some(self.target_cya_ppm),
            Parameter::Salt => Some(self.target_salt_ppm),
            Parameter::Chlorine => None,
        }
    }

    /// Replaces the floors of a floor-triggered profile. Profiles that
    /// trigger on deviation are returned unchanged.
    pub fn with_floors(mut self, floors: FloorThresholds) -> RegionProfile {
        if let TriggerPolicy::AbsoluteFloor(_) = self.trigger {
            self.trigger = TriggerPolicy::AbsoluteFloor(floors);
        }
        self
    }
}

const DESERT_SOUTHWEST: RegionProfile = RegionProfile {
    region: Region::Arizona,
    target_ph: 7.5,
    target_alkalinity_ppm: 120.0,
    target_calcium_ppm: 400.0,
    target_cya_ppm: 80.0,
    target_salt_ppm: 3200.0,
    trigger: TriggerPolicy::DeviationFromTarget,
    sanitizer: SanitizerForm::CalciumHypochlorite,
};

pub static ARIZONA: RegionProfile = DESERT_SOUTHWEST;

pub static TEXAS: RegionProfile = RegionProfile {
    region: Region::Texas,
    ..DESERT_SOUTHWEST
};

pub static FLORIDA: RegionProfile = RegionProfile {
    region: Region::Florida,
    target_ph: 7.5,
    target_alkalinity_ppm: 120.0,
    target_calcium_ppm: 300.0,
    target_cya_ppm: 50.0,
    target_salt_ppm: 3200.0,
    trigger: TriggerPolicy::AbsoluteFloor(DEFAULT_FLORIDA_FLOORS),
    sanitizer: SanitizerForm::LiquidChlorine,
};

/// All region profiles, in `Region::ALL` order.
pub static REGION_PROFILES: &[&RegionProfile] = &[&ARIZONA, &TEXAS, &FLORIDA];

/// Looks up the built-in profile for a region.
pub fn profile_for(region: Region) -> &'static RegionProfile {
    match region {
        Region::Arizona => &ARIZONA,
        Region::Texas => &TEXAS,
        Region::Florida => &FLORIDA,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
