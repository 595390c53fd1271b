//! Unified error hierarchy for dietrs
//!
//! Structured error types with severity levels and user-facing messages,
//! integrated with the tracing system.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for all dietrs operations
#[derive(Debug, Error)]
pub enum DietRsError {
    /// Profile validation errors
    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    /// Profile store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Import/export errors
    #[error("Import/Export error: {0}")]
    ImportExport(#[from] ImportExportError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Profile validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    /// A field is outside the range the formulas are valid for
    #[error("Invalid profile: {field}={value} ({reason})")]
    InvalidProfile {
        field: String,
        value: String,
        reason: String,
    },

    /// No profile selected or stored under the given id
    #[error("Missing profile: {id}")]
    MissingProfile { id: String },
}

/// Profile store errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("Profile not found: {id}")]
    NotFound { id: String },

    #[error("Duplicate profile: {id}")]
    Duplicate { id: String },

    /// A writer panicked while holding the store lock
    #[error("Profile store lock poisoned")]
    Poisoned,
}

/// Import and export errors
#[derive(Debug, Error)]
pub enum ImportExportError {
    #[error("Unsupported format: {format}")]
    UnsupportedFormat { format: String },

    /// Format-specific parsing error
    #[error("Parse error in {format} at record {record}: {reason}")]
    ParseError {
        format: String,
        record: usize,
        reason: String,
    },

    #[error("Export failed to {path}: {reason}")]
    ExportFailed { path: PathBuf, reason: String },
}

/// Result type alias for dietrs operations
pub type Result<T> = std::result::Result<T, DietRsError>;

impl ProfileError {
    pub fn invalid(field: &str, value: impl ToString, reason: &str) -> Self {
        ProfileError::InvalidProfile {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<serde_json::Error> for DietRsError {
    fn from(err: serde_json::Error) -> Self {
        DietRsError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for DietRsError {
    fn from(err: csv::Error) -> Self {
        DietRsError::Serialization(err.to_string())
    }
}

impl DietRsError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            DietRsError::Profile(_) => ErrorSeverity::Warning,
            DietRsError::Store(StoreError::NotFound { .. }) => ErrorSeverity::Warning,
            DietRsError::Store(StoreError::Poisoned) => ErrorSeverity::Critical,
            DietRsError::ImportExport(ImportExportError::ParseError { .. }) => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            DietRsError::Profile(ProfileError::InvalidProfile { field, reason, .. }) => {
                format!("Please check your {}: {}", field, reason)
            }
            DietRsError::Profile(ProfileError::MissingProfile { id }) => {
                format!("No profile named '{}'. Run `dietrs profile list` to see saved profiles.", id)
            }
            DietRsError::Store(StoreError::NotFound { id }) => {
                format!("No profile stored for '{}'", id)
            }
            DietRsError::ImportExport(ImportExportError::UnsupportedFormat { format }) => {
                format!("Files of type '{}' are not supported. Use .csv or .json.", format)
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Critical system error requiring immediate attention
    Critical,
    /// Error that prevents operation but system can continue
    Error,
    /// Warning that doesn't prevent operation
    Warning,
    /// Informational message
    Info,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
            ErrorSeverity::Info => tracing::Level::INFO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity() {
        let err = DietRsError::Profile(ProfileError::invalid("height", 0, "must be positive"));
        assert_eq!(err.severity(), ErrorSeverity::Warning);

        let err = DietRsError::Store(StoreError::Poisoned);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.severity().to_tracing_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_user_messages() {
        let err = DietRsError::Profile(ProfileError::invalid("weight", -3, "must be positive"));
        assert_eq!(err.user_message(), "Please check your weight: must be positive");

        let err = DietRsError::ImportExport(ImportExportError::UnsupportedFormat {
            format: "xml".to_string(),
        });
        assert!(err.user_message().contains("not supported"));
    }

    #[test]
    fn test_invalid_profile_display() {
        let err = ProfileError::invalid("age", 130, "must be between 1 and 120");
        assert_eq!(
            err.to_string(),
            "Invalid profile: age=130 (must be between 1 and 120)"
        );
    }
}
