use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use crate::error::{DietRsError, ImportExportError, Result};
use crate::import::{has_extension, ImportFormat, ImportedProfile};
use crate::models::Profile;

/// Accepts either bare profiles or `{ "id": .., "profile": .. }` entries
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonEntry {
    Identified(ImportedProfile),
    Bare(Profile),
}

/// JSON importer for profile arrays
pub struct JsonImporter;

impl JsonImporter {
    pub fn import_from_reader<R: Read>(&self, reader: R) -> Result<Vec<ImportedProfile>> {
        // Syntax errors come before any entry is known
        let entries: Vec<serde_json::Value> =
            serde_json::from_reader(reader).map_err(|e| parse_error(0, e))?;

        entries
            .into_iter()
            .enumerate()
            .map(|(index, value)| -> Result<ImportedProfile> {
                let record = index + 1;
                let entry: JsonEntry =
                    serde_json::from_value(value).map_err(|e| parse_error(record, e))?;

                Ok(match entry {
                    JsonEntry::Identified(imported) => imported,
                    JsonEntry::Bare(profile) => ImportedProfile {
                        id: format!("row-{}", record),
                        profile,
                    },
                })
            })
            .collect()
    }
}

fn parse_error(record: usize, error: serde_json::Error) -> DietRsError {
    ImportExportError::ParseError {
        format: "JSON".to_string(),
        record,
        reason: error.to_string(),
    }
    .into()
}

impl ImportFormat for JsonImporter {
    fn can_import(&self, file_path: &Path) -> bool {
        has_extension(file_path, "json")
    }

    fn import_file(&self, file_path: &Path) -> Result<Vec<ImportedProfile>> {
        let file = std::fs::File::open(file_path)?;
        self.import_from_reader(std::io::BufReader::new(file))
    }

    fn get_format_name(&self) -> &'static str {
        "JSON"
    }
}
