//! Pool water balance and dosing engine.
//!
//! Computes the Langelier Saturation Index for a water test, works out
//! region-specific dosing for pH, alkalinity, calcium, CYA, chlorine and
//! salt, and spreads the corrections over a three-visit plan.
//!
//! Modules, leaf-first:
//! - `model`: readings, regions, parameters, input errors.
//! - `regions`: golden numbers and dosing policy per region.
//! - `balance`: factor tables and the index.
//! - `dosing`: per-chemical rules, sanitizer and salt.
//! - `plan`: weekly scheduling.
//! - `engine`: one evaluation end to end.
//! - `report`: plain-text rendering.
//! - `config`, `logging`: service plumbing.

pub mod balance;
pub mod config;
pub mod dosing;
pub mod engine;
pub mod logging;
pub mod model;
pub mod plan;
pub mod regions;
pub mod report;

pub use engine::{evaluate, Engine, EngineReport};
pub use model::{ModelError, Parameter, RawReading, Reading, Region};
