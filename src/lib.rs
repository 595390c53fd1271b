// Library interface for dietrs modules
// This allows integration tests and benchmarks to access the core functionality

pub mod config;
pub mod diet;
pub mod error;
pub mod import;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod report;
pub mod store;
pub mod validation;

// Re-export commonly used types for convenience
pub use models::*;
pub use metrics::MetricsCalculator;
pub use diet::{DietAdjustment, DietRecommendationEngine};
pub use validation::{ProfileValidator, ValidationPolicy};
pub use store::{ProfileChange, ProfileStore, RecommendationFeed};
pub use report::{HealthReport, ReportFormat};
pub use error::{DietRsError, Result};
pub use logging::{LogConfig, LogLevel, LogFormat};
