use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use crate::error::{ImportExportError, Result};
use crate::import::{has_extension, ImportFormat, ImportedProfile};
use crate::models::Profile;

const REQUIRED_COLUMNS: [&str; 7] = [
    "weight",
    "height",
    "age",
    "gender",
    "activity_level",
    "body_type",
    "goal_weight",
];

/// CSV importer with flexible column mapping
pub struct CsvImporter {
    column_mapping: HashMap<String, String>,
}

impl CsvImporter {
    pub fn new() -> Self {
        let mut column_mapping = HashMap::new();

        // Common column name variations
        Self::add_mapping(&mut column_mapping, "id", &["id", "profile_id", "user_id", "name"]);
        Self::add_mapping(&mut column_mapping, "weight", &["weight", "weight_kg", "kg", "mass"]);
        Self::add_mapping(&mut column_mapping, "height", &["height", "height_cm", "cm"]);
        Self::add_mapping(&mut column_mapping, "age", &["age", "age_years", "years"]);
        Self::add_mapping(&mut column_mapping, "gender", &["gender", "sex"]);
        Self::add_mapping(
            &mut column_mapping,
            "activity_level",
            &["activity_level", "activitylevel", "activity"],
        );
        Self::add_mapping(
            &mut column_mapping,
            "body_type",
            &["body_type", "bodytype", "somatotype"],
        );
        Self::add_mapping(
            &mut column_mapping,
            "goal_weight",
            &["goal_weight", "goalweight", "goal", "target_weight", "goal_weight_kg"],
        );

        Self { column_mapping }
    }

    fn add_mapping(mapping: &mut HashMap<String, String>, standard: &str, variations: &[&str]) {
        for variation in variations {
            mapping.insert(variation.to_lowercase(), standard.to_string());
        }
    }

    /// Map header positions to canonical column names
    fn map_headers(&self, headers: &StringRecord) -> Result<HashMap<String, usize>> {
        let mut positions = HashMap::new();
        for (index, header) in headers.iter().enumerate() {
            let key = header.trim().to_lowercase().replace([' ', '-'], "_");
            if let Some(standard) = self.column_mapping.get(&key) {
                positions.entry(standard.clone()).or_insert(index);
            }
        }

        if let Some(missing) = REQUIRED_COLUMNS.iter().find(|c| !positions.contains_key(**c)) {
            return Err(ImportExportError::ParseError {
                format: "CSV".to_string(),
                record: 0,
                reason: format!("missing required column '{}'", missing),
            }
            .into());
        }

        Ok(positions)
    }

    /// Read profiles from any CSV source
    pub fn import_from_reader<R: Read>(&self, reader: R) -> Result<Vec<ImportedProfile>> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let positions = self.map_headers(csv_reader.headers()?)?;
        let mut profiles = Vec::new();

        for (index, record) in csv_reader.records().enumerate() {
            let record = record?;
            let row = index + 1;

            let id = positions
                .get("id")
                .and_then(|&i| record.get(i))
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("row-{}", row));

            let profile = Profile {
                weight: Self::parse_field(&record, &positions, "weight", row)?,
                height: Self::parse_field(&record, &positions, "height", row)?,
                age: Self::parse_field(&record, &positions, "age", row)?,
                gender: Self::parse_field(&record, &positions, "gender", row)?,
                activity_level: Self::parse_field(&record, &positions, "activity_level", row)?,
                body_type: Self::parse_field(&record, &positions, "body_type", row)?,
                goal_weight: Self::parse_field(&record, &positions, "goal_weight", row)?,
            };

            profiles.push(ImportedProfile { id, profile });
        }

        Ok(profiles)
    }

    fn parse_field<T>(
        record: &StringRecord,
        positions: &HashMap<String, usize>,
        column: &str,
        row: usize,
    ) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let parse_error = |reason: String| ImportExportError::ParseError {
            format: "CSV".to_string(),
            record: row,
            reason,
        };

        let raw = positions
            .get(column)
            .and_then(|&i| record.get(i))
            .filter(|s| !s.is_empty())
            .ok_or_else(|| parse_error(format!("missing value for '{}'", column)))?;

        raw.parse::<T>()
            .map_err(|e| parse_error(format!("invalid {} '{}': {}", column, raw, e)).into())
    }
}

impl Default for CsvImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportFormat for CsvImporter {
    fn can_import(&self, file_path: &Path) -> bool {
        has_extension(file_path, "csv")
    }

    fn import_file(&self, file_path: &Path) -> Result<Vec<ImportedProfile>> {
        let file = std::fs::File::open(file_path)?;
        self.import_from_reader(file)
    }

    fn get_format_name(&self) -> &'static str {
        "CSV"
    }
}
