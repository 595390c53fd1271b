use super::text::describe_balance;
use super::HealthReport;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct SummaryRow<'a> {
    #[tabled(rename = "Profile")]
    profile_id: &'a str,
    #[tabled(rename = "BMI")]
    bmi: String,
    #[tabled(rename = "Category")]
    category: &'static str,
    #[tabled(rename = "kcal")]
    calories: i32,
    #[tabled(rename = "P/C/F (g)")]
    macros: String,
    #[tabled(rename = "Water (ml)")]
    water: i32,
    #[tabled(rename = "Weeks")]
    weeks: u32,
}

/// Two-column metric/value table for one report
pub fn render_report_table(report: &HealthReport) -> String {
    let metrics = &report.metrics;
    let rec = &report.recommendation;

    let rows = vec![
        MetricRow { metric: "BMI", value: format!("{:.1}", metrics.bmi) },
        MetricRow { metric: "Category", value: metrics.bmi_category.label().to_string() },
        MetricRow {
            metric: "Healthy weight",
            value: format!(
                "{:.1}-{:.1} kg (optimal {:.1})",
                metrics.ideal_weight.min, metrics.ideal_weight.max, metrics.ideal_weight.optimal
            ),
        },
        MetricRow { metric: "Body fat", value: format!("{:.1}%", metrics.body_fat) },
        MetricRow { metric: "BMR", value: format!("{} kcal", metrics.bmr) },
        MetricRow { metric: "TDEE", value: format!("{} kcal", metrics.tdee) },
        MetricRow {
            metric: "Calories",
            value: format!("{} kcal ({})", rec.calories, describe_balance(rec.deficit)),
        },
        MetricRow {
            metric: "Protein",
            value: format!("{} g ({}%)", rec.protein, rec.macro_ratio.protein),
        },
        MetricRow {
            metric: "Carbs",
            value: format!("{} g ({}%)", rec.carbs, rec.macro_ratio.carbs),
        },
        MetricRow { metric: "Fat", value: format!("{} g ({}%)", rec.fat, rec.macro_ratio.fat) },
        MetricRow { metric: "Fiber", value: format!("{} g", rec.fiber) },
        MetricRow { metric: "Water", value: format!("{} ml", rec.water_intake) },
        MetricRow {
            metric: "Weeks to goal",
            value: if rec.weeks_to_goal > 0 {
                rec.weeks_to_goal.to_string()
            } else {
                "-".to_string()
            },
        },
    ];

    Table::new(rows).with(Style::rounded()).to_string()
}

/// One row per report, for batch output
pub fn render_summary_table(reports: &[HealthReport]) -> String {
    let rows: Vec<SummaryRow> = reports
        .iter()
        .map(|report| {
            let rec = &report.recommendation;
            SummaryRow {
                profile_id: &report.profile_id,
                bmi: format!("{:.1}", report.metrics.bmi),
                category: report.metrics.bmi_category.label(),
                calories: rec.calories,
                macros: format!("{}/{}/{}", rec.protein, rec.carbs, rec.fat),
                water: rec.water_intake,
                weeks: rec.weeks_to_goal,
            }
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}
