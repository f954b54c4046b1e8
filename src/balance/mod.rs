/// Water balance: factor tables and the Langelier Saturation Index.
///
/// Submodules:
/// - `factors`: static step tables and the TDS rule.
/// - `lsi`: corrected alkalinity, index computation, status bands.

pub mod factors;
pub mod lsi;

pub use lsi::{compute_lsi, corrected_alkalinity, LsiReport, LsiStatus};
