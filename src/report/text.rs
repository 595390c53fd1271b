use super::HealthReport;
use crate::error::Result;
use std::io::Write;

/// Write a report as plain text sections
pub fn write_text<W: Write>(report: &HealthReport, out: &mut W) -> Result<()> {
    let profile = &report.profile;
    let metrics = &report.metrics;
    let rec = &report.recommendation;

    writeln!(out, "==================================")?;
    writeln!(out, "HEALTH REPORT: {}", report.profile_id)?;
    writeln!(out, "==================================")?;
    writeln!(out, "Generated: {}", report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
    writeln!(out)?;

    writeln!(out, "PROFILE")?;
    writeln!(out, "----------------------------------")?;
    writeln!(out, "Weight: {:.1} kg (goal {:.1} kg)", profile.weight, profile.goal_weight)?;
    writeln!(out, "Height: {:.0} cm", profile.height)?;
    writeln!(out, "Age: {}", profile.age)?;
    writeln!(out, "Gender: {}", profile.gender)?;
    writeln!(out, "Activity: {}", profile.activity_level)?;
    writeln!(out, "Body type: {}", profile.body_type)?;
    writeln!(out)?;

    writeln!(out, "BODY METRICS")?;
    writeln!(out, "----------------------------------")?;
    writeln!(out, "BMI: {:.1} ({})", metrics.bmi, metrics.bmi_category.label())?;
    writeln!(
        out,
        "Healthy weight: {:.1}-{:.1} kg (optimal {:.1} kg)",
        metrics.ideal_weight.min, metrics.ideal_weight.max, metrics.ideal_weight.optimal
    )?;
    writeln!(out, "Body fat (est.): {:.1}%", metrics.body_fat)?;
    writeln!(out, "BMR: {} kcal", metrics.bmr)?;
    writeln!(out, "TDEE: {} kcal", metrics.tdee)?;
    writeln!(out, "Water: {} ml", metrics.water_intake)?;
    writeln!(out)?;

    writeln!(out, "DAILY TARGETS")?;
    writeln!(out, "----------------------------------")?;
    writeln!(out, "Calories: {} kcal ({})", rec.calories, describe_balance(rec.deficit))?;
    writeln!(out, "Protein: {} g ({}%)", rec.protein, rec.macro_ratio.protein)?;
    writeln!(out, "Carbs: {} g ({}%)", rec.carbs, rec.macro_ratio.carbs)?;
    writeln!(out, "Fat: {} g ({}%)", rec.fat, rec.macro_ratio.fat)?;
    writeln!(out, "Fiber: {} g", rec.fiber)?;

    if rec.weeks_to_goal > 0 {
        writeln!(out, "Estimated time to goal: {} weeks", rec.weeks_to_goal)?;
    }
    writeln!(out)?;

    if !report.warnings.is_empty() {
        writeln!(out, "NOTES")?;
        writeln!(out, "----------------------------------")?;
        for warning in &report.warnings {
            writeln!(out, "• {}", warning)?;
        }
        writeln!(out)?;
    }

    Ok(())
}

/// Describe a signed calorie adjustment
pub fn describe_balance(deficit: i32) -> String {
    match deficit {
        0 => "maintenance".to_string(),
        d if d > 0 => format!("{} kcal deficit", d),
        d => format!("{} kcal surplus", -d),
    }
}
