use crate::error::{ImportExportError, Result};
use crate::models::Profile;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

pub mod batch;
pub mod csv;
pub mod json;

/// A profile read from an external file, with its identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedProfile {
    pub id: String,
    pub profile: Profile,
}

/// Trait for importing profiles from different file formats
pub trait ImportFormat {
    /// Check if this importer can handle the given file
    fn can_import(&self, file_path: &Path) -> bool;

    /// Import profiles from the file
    fn import_file(&self, file_path: &Path) -> Result<Vec<ImportedProfile>>;

    /// Get the format name for this importer
    fn get_format_name(&self) -> &'static str;
}

/// Picks an importer by file extension
pub struct ProfileImporter {
    importers: Vec<Box<dyn ImportFormat + Send + Sync>>,
}

impl ProfileImporter {
    pub fn new() -> Self {
        let importers: Vec<Box<dyn ImportFormat + Send + Sync>> = vec![
            Box::new(csv::CsvImporter::new()),
            Box::new(json::JsonImporter),
        ];

        Self { importers }
    }

    /// Import a single file, auto-detecting the format
    pub fn import_file(&self, file_path: &Path) -> Result<Vec<ImportedProfile>> {
        let importer = self
            .importers
            .iter()
            .find(|importer| importer.can_import(file_path))
            .ok_or_else(|| ImportExportError::UnsupportedFormat {
                format: file_path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("unknown")
                    .to_string(),
            })?;

        let profiles = importer.import_file(file_path)?;
        info!(
            path = %file_path.display(),
            format = importer.get_format_name(),
            count = profiles.len(),
            "Imported profiles"
        );
        Ok(profiles)
    }
}

impl Default for ProfileImporter {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn has_extension(file_path: &Path, expected: &str) -> bool {
    file_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(expected))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DietRsError;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_detects_format_by_extension() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "id,weight,height,age,gender,activity_level,body_type,goal_weight").unwrap();
        writeln!(file, "sam,70,170,30,male,moderate,mesomorph,65").unwrap();

        let profiles = ProfileImporter::new().import_file(file.path()).unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].id, "sam");
    }

    #[test]
    fn test_unsupported_extension() {
        let file = Builder::new().suffix(".xml").tempfile().unwrap();
        let result = ProfileImporter::new().import_file(file.path());
        assert!(matches!(
            result,
            Err(DietRsError::ImportExport(ImportExportError::UnsupportedFormat { .. }))
        ));
    }
}
