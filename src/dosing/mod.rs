/// Dosing: how much of which chemical moves a reading to its target.
///
/// Submodules:
/// - `format`: oz/lb/fl-oz/gallon display conventions.
/// - `rules`: alkalinity, calcium, CYA and pH rules.
/// - `chlorine`: free-chlorine requirement and sanitizer dose.
/// - `salt`: salt-chlorine-generator top-up.
///
/// Every rule returns `Option<Dose>`: `None` means no action is needed,
/// which is never an error.

pub mod chlorine;
pub mod format;
pub mod rules;
pub mod salt;

use serde::Serialize;
use std::fmt;

use crate::model::Parameter;

/// Pool volume the published dose rates are quoted for.
pub const REFERENCE_GALLONS: f64 = 10_000.0;

/// Treatment chemicals the engine recommends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Chemical {
    SodiumBicarbonate,
    CalciumChloride,
    CyanuricAcid,
    SodaAsh,
    MuriaticAcid,
    CalciumHypochlorite,
    LiquidChlorine,
    Salt,
}

impl fmt::Display for Chemical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chemical::SodiumBicarbonate => write!(f, "sodium bicarbonate"),
            Chemical::CalciumChloride => write!(f, "calcium chloride"),
            Chemical::CyanuricAcid => write!(f, "cyanuric acid (stabilizer)"),
            Chemical::SodaAsh => write!(f, "soda ash"),
            Chemical::MuriaticAcid => write!(f, "31.45% muriatic acid"),
            Chemical::CalciumHypochlorite => write!(f, "73% calcium hypochlorite"),
            Chemical::LiquidChlorine => write!(f, "12.5% liquid chlorine"),
            Chemical::Salt => write!(f, "salt"),
        }
    }
}

/// Base unit a dose amount is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DoseUnit {
    Pounds,
    Ounces,
    FluidOunces,
}

/// A single dosing instruction.
///
/// `amount` is in `unit`; `instruction` is the human-readable form with
/// the display conversions (oz to lbs, fl oz to gallons) already applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dose {
    pub parameter: Parameter,
    pub chemical: Chemical,
    pub amount: f64,
    pub unit: DoseUnit,
    pub target: f64,
    pub instruction: String,
}

/// The six per-parameter dosing results for one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct DosingAdvice {
    pub ph: Option<Dose>,
    pub alkalinity: Option<Dose>,
    pub calcium: Option<Dose>,
    pub cya: Option<Dose>,
    pub chlorine: Option<Dose>,
    pub salt: Option<Dose>,
}

impl DosingAdvice {
    pub fn get(&self, parameter: Parameter) -> Option<&Dose> {
        match parameter {
            Parameter::Ph => self.ph.as_ref(),
            Parameter::Alkalinity => self.alkalinity.as_ref(),
            Parameter::Calcium => self.calcium.as_ref(),
            Parameter::Cya => self.cya.as_ref(),
            Parameter::Chlorine => self.chlorine.as_ref(),
            Parameter::Salt => self.salt.as_ref(),
        }
    }

    /// Doses that are present, in parameter order.
    pub fn doses(&self) -> impl Iterator<Item = &Dose> {
        [
            &self.ph,
            &self.alkalinity,
            &self.calcium,
            &self.cya,
            &self.chlorine,
            &self.salt,
        ]
        .into_iter()
        .filter_map(Option::as_ref)
    }
}

/// Pool volume as a multiple of the reference volume.
pub(crate) fn volume_scale(pool_gallons: f64) -> f64 {
    pool_gallons / REFERENCE_GALLONS
}
