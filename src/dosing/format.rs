//! Quantity formatting for dosing instructions.
//!
//! Formatting is part of the engine's output contract: downstream
//! consumers show these strings verbatim.

/// Fluid ounces per US gallon.
pub const FL_OZ_PER_GALLON: f64 = 128.0;

/// Ounces per pound.
pub const OZ_PER_LB: f64 = 16.0;

/// Weight given in ounces: above 16 oz as pounds, otherwise as ounces,
/// both with two decimals.
pub fn format_oz_or_lbs(amount_oz: f64) -> String {
    if amount_oz > OZ_PER_LB {
        format!("{:.2} lbs", amount_oz / OZ_PER_LB)
    } else {
        format!("{:.2} oz", amount_oz)
    }
}

/// Weight given in ounces as whole pounds plus residual ounces.
///
/// The ounce part is left out when it is zero and there is at least one
/// pound; with no whole pounds it is always shown.
pub fn format_lbs_and_oz(amount_oz: f64) -> String {
    // Round to the displayed precision first so 15.999 oz reads "1 lb".
    let total = (amount_oz * 100.0).round() / 100.0;
    let lbs = (total / OZ_PER_LB).floor();
    let oz = total - lbs * OZ_PER_LB;
    let oz_hundredths = (oz * 100.0).round() as i64;

    if lbs < 1.0 {
        format!("{:.2} oz", total)
    } else if oz_hundredths == 0 {
        format!("{} {}", lbs as u64, pound_word(lbs))
    } else {
        format!("{} {} {:.2} oz", lbs as u64, pound_word(lbs), oz)
    }
}

fn pound_word(lbs: f64) -> &'static str {
    if lbs == 1.0 { "lb" } else { "lbs" }
}

/// Liquid volume given in fluid ounces: below one gallon as fluid ounces
/// (one decimal), otherwise gallons (two decimals) with the fluid-ounce
/// figure in parentheses.
pub fn format_fl_oz_or_gallons(amount_fl_oz: f64) -> String {
    if amount_fl_oz < FL_OZ_PER_GALLON {
        format!("{:.1} fl oz", amount_fl_oz)
    } else {
        format!(
            "{:.2} gallons ({:.1} fl oz)",
            amount_fl_oz / FL_OZ_PER_GALLON,
            amount_fl_oz
        )
    }
}

/// Target values print without a trailing ".0": 120 ppm, pH 7.5.
pub fn format_target(value: f64) -> String {
    format!("{}", value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
