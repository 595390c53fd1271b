//! Health reports for display and export
//!
//! A [`HealthReport`] bundles a profile with everything derived from it.
//! Submodules render reports as text, tables, JSON or CSV.

use crate::diet::DietRecommendationEngine;
use crate::error::{DietRsError, ImportExportError, Result};
use crate::metrics::MetricsCalculator;
use crate::models::{DietRecommendation, HealthMetrics, Profile};
use crate::validation::ProfileValidator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub mod csv;
pub mod json;
pub mod table;
pub mod text;

/// Output formats for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Table,
    Json,
    Csv,
    Text,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(ReportFormat::Table),
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            "text" | "txt" => Ok(ReportFormat::Text),
            _ => Err(format!("Invalid report format: {}", s)),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ReportFormat::Table => "table",
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
            ReportFormat::Text => "text",
        };
        write!(f, "{}", name)
    }
}

impl ReportFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();

        match extension.as_str() {
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            "txt" => Ok(ReportFormat::Text),
            other => Err(ImportExportError::UnsupportedFormat {
                format: other.to_string(),
            }
            .into()),
        }
    }
}

/// Profile plus derived metrics and diet targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub profile_id: String,
    pub generated_at: DateTime<Utc>,
    pub profile: Profile,
    pub metrics: HealthMetrics,
    pub recommendation: DietRecommendation,
    /// Non-fatal observations about the profile
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl HealthReport {
    pub fn build(profile_id: impl Into<String>, profile: &Profile) -> Self {
        Self {
            profile_id: profile_id.into(),
            generated_at: Utc::now(),
            profile: profile.clone(),
            metrics: MetricsCalculator::calculate_all(profile),
            recommendation: DietRecommendationEngine::recommend(profile),
            warnings: ProfileValidator::warnings(profile),
        }
    }
}

/// Render reports in `format` to `writer`
pub fn write_reports<W: Write>(
    reports: &[HealthReport],
    format: ReportFormat,
    writer: &mut W,
) -> Result<()> {
    match format {
        ReportFormat::Json => json::write_json(reports, writer),
        ReportFormat::Csv => csv::write_csv(reports, writer),
        ReportFormat::Table => {
            writeln!(writer, "{}", table::render_summary_table(reports))?;
            Ok(())
        }
        ReportFormat::Text => {
            for report in reports {
                text::write_text(report, writer)?;
            }
            Ok(())
        }
    }
}

/// Write reports to a file, picking the format from the extension
pub fn export_reports<P: AsRef<Path>>(reports: &[HealthReport], output_path: P) -> Result<()> {
    let path = output_path.as_ref();
    let format = ReportFormat::from_path(path)?;

    let file = File::create(path).map_err(|e| {
        DietRsError::from(ImportExportError::ExportFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    })?;
    let mut writer = BufWriter::new(file);

    write_reports(reports, format, &mut writer)?;
    writer.flush()?;

    tracing::info!(path = %path.display(), count = reports.len(), %format, "Exported reports");
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_support::create_test_report;
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_report_format_parsing() {
        assert_eq!("TXT".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert_eq!("table".parse::<ReportFormat>().unwrap(), ReportFormat::Table);
        assert!("pdf".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ReportFormat::from_path(Path::new("out.JSON")).unwrap(), ReportFormat::Json);
        assert!(ReportFormat::from_path(Path::new("out.pdf")).is_err());
    }

    #[test]
    fn test_report_contains_metrics_and_recommendation() {
        let report = create_test_report();
        assert_eq!(report.profile_id, "sam");
        assert_eq!(report.metrics.tdee, report.recommendation.tdee);
        assert_eq!(report.recommendation.calories, 2508);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_export_reports_by_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reports.csv");

        export_reports(&[create_test_report()], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("profile_id,"));
        assert_eq!(content.lines().count(), 2);
    }
}
