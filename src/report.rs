//! Plain-text rendering of an `EngineReport` for terminal output.

use crate::dosing::format::format_target;
use crate::engine::EngineReport;

/// Renders the sanitizer section, index, weekly plan and golden numbers.
pub fn render_text(report: &EngineReport) -> String {
    let mut lines: Vec<String> = Vec::new();
    let cl = &report.chlorine;

    lines.push("Sanitizer Dosing Recommendation".to_string());
    lines.push(format!("  Minimum Free Chlorine Required: {:.2} ppm", cl.min_fc_ppm));
    lines.push(format!("  UV Loss Factor: {} ppm/day", cl.loss_factor));
    lines.push(format!("  UV Loss for Week: {:.2} ppm", cl.uv_loss_ppm));
    lines.push(format!("  Calculated Chlorine Dose: {:.2} ppm", cl.calculated_dose_ppm));
    lines.push(format!("  Tested Free Chlorine: {:.2} ppm", cl.tested_free_chlorine_ppm));
    lines.push(format!("  Chlorine to Be Dosed: {:.2} ppm", cl.to_be_dosed_ppm));
    match &report.advice.chlorine {
        Some(dose) => lines.push(format!("  {}", dose.instruction)),
        None => lines.push("  No chlorine needs to be added.".to_string()),
    }
    lines.push(String::new());

    let name = report.region.display_name();
    lines.push(format!("Results for {} ({})", name, report.evaluated_on));
    lines.push(format!("  LSI Value: {:.2}", report.lsi.value));
    lines.push(format!("  Pool Water Assessment: {}", report.lsi.status));
    lines.push(String::new());

    lines.push("Weekly Adjustment Plan:".to_string());
    for visit in report.plan.describe(&report.advice) {
        let label = if visit.deferred { " (retest first)" } else { "" };
        if visit.lines.len() == 1 && report.plan.visits[visit.week - 1].is_empty() {
            lines.push(format!("  Week {}: {}", visit.week, visit.lines[0]));
            continue;
        }
        lines.push(format!("  Week {}{}:", visit.week, label));
        for line in visit.lines {
            lines.push(format!("    - {}", line));
        }
    }
    if let Some(salt) = &report.advice.salt {
        lines.push(format!("  Salt: {}", salt.instruction));
    }
    lines.push(String::new());

    let t = &report.targets;
    lines.push(format!("Golden Numbers for {}:", name));
    lines.push(format!("  pH: {}", format_target(t.target_ph)));
    lines.push(format!("  Alkalinity: {} ppm", format_target(t.target_alkalinity_ppm)));
    lines.push(format!("  Calcium Hardness: {} ppm", format_target(t.target_calcium_ppm)));
    lines.push(format!("  Cyanuric Acid: {} ppm", format_target(t.target_cya_ppm)));
    if report.salt.is_some() || report.reading.salt_ppm > 0.0 {
        lines.push(format!("  Salt: {} ppm", format_target(t.target_salt_ppm)));
    }

    lines.join("\n")
}
