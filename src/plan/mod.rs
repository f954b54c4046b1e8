/// Adjustment planning across upcoming service visits.
///
/// Submodules:
/// - `weekly`: three-visit plan with priority and deferral rules.

pub mod weekly;

pub use weekly::{build_plan, PlanBranch, VisitSummary, WeeklyPlan};
