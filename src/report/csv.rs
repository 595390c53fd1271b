use super::HealthReport;
use crate::models::BmiCategory;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

/// One flattened CSV line per report
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    profile_id: &'a str,
    weight_kg: f64,
    height_cm: f64,
    age: u32,
    gender: String,
    activity_level: String,
    body_type: String,
    goal_weight_kg: f64,
    bmi: f64,
    bmi_category: BmiCategory,
    ideal_min_kg: f64,
    ideal_max_kg: f64,
    bmr: i32,
    tdee: i32,
    calories: i32,
    deficit: i32,
    protein_g: i32,
    carbs_g: i32,
    fat_g: i32,
    fiber_g: i32,
    body_fat_pct: f64,
    water_ml: i32,
    weeks_to_goal: u32,
}

impl<'a> From<&'a HealthReport> for CsvRow<'a> {
    fn from(report: &'a HealthReport) -> Self {
        let profile = &report.profile;
        let rec = &report.recommendation;

        Self {
            profile_id: &report.profile_id,
            weight_kg: profile.weight,
            height_cm: profile.height,
            age: profile.age,
            gender: profile.gender.to_string(),
            activity_level: profile.activity_level.to_string(),
            body_type: profile.body_type.to_string(),
            goal_weight_kg: profile.goal_weight,
            bmi: report.metrics.bmi,
            bmi_category: report.metrics.bmi_category,
            ideal_min_kg: report.metrics.ideal_weight.min,
            ideal_max_kg: report.metrics.ideal_weight.max,
            bmr: rec.bmr,
            tdee: rec.tdee,
            calories: rec.calories,
            deficit: rec.deficit,
            protein_g: rec.protein,
            carbs_g: rec.carbs,
            fat_g: rec.fat,
            fiber_g: rec.fiber,
            body_fat_pct: rec.body_fat,
            water_ml: rec.water_intake,
            weeks_to_goal: rec.weeks_to_goal,
        }
    }
}

/// Write reports as CSV with a header row
pub fn write_csv<W: Write>(reports: &[HealthReport], writer: &mut W) -> Result<()> {
    let mut csv_writer = ::csv::Writer::from_writer(writer);

    for report in reports {
        csv_writer.serialize(CsvRow::from(report))?;
    }

    csv_writer.flush()?;
    Ok(())
}
