use super::HealthReport;
use crate::error::Result;
use std::io::Write;

/// Write reports as a pretty-printed JSON array
pub fn write_json<W: Write>(reports: &[HealthReport], writer: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, reports)?;
    writeln!(writer)?;
    Ok(())
}

/// Serialize a single report to a JSON string
pub fn to_json_string(report: &HealthReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
