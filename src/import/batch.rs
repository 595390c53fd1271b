//! Parallel evaluation of many profiles using rayon
//!
//! Each profile is validated and turned into a [`HealthReport`]
//! independently, so the work splits cleanly across threads.

use crate::error::{DietRsError, ProfileError, Result};
use crate::import::ImportedProfile;
use crate::report::HealthReport;
use crate::validation::{ProfileValidator, ValidationPolicy};
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Configuration for batch evaluation
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub policy: ValidationPolicy,
    /// Keep going after a profile fails validation
    pub continue_on_error: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            policy: ValidationPolicy::Strict,
            continue_on_error: true,
        }
    }
}

/// A profile that could not be evaluated
#[derive(Debug, Clone, PartialEq)]
pub struct BatchFailure {
    pub id: String,
    pub error: ProfileError,
}

/// Outcome of a batch run, in input order
#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub reports: Vec<HealthReport>,
    pub failures: Vec<BatchFailure>,
    pub duration_ms: u128,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.reports.len() + self.failures.len()
    }

    /// Fraction of profiles evaluated successfully, 0.0-1.0
    pub fn success_rate(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        self.reports.len() as f64 / self.total() as f64
    }
}

/// Evaluate every profile in parallel
pub fn evaluate_batch(profiles: &[ImportedProfile], config: &BatchConfig) -> Result<BatchSummary> {
    let start_time = Instant::now();

    let outcomes: Vec<std::result::Result<HealthReport, BatchFailure>> = profiles
        .par_iter()
        .map(|imported| {
            ProfileValidator::check(&imported.profile, config.policy)
                .map(|_| HealthReport::build(imported.id.clone(), &imported.profile))
                .map_err(|error| BatchFailure {
                    id: imported.id.clone(),
                    error,
                })
        })
        .collect();

    let mut reports = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();

    for outcome in outcomes {
        match outcome {
            Ok(report) => reports.push(report),
            Err(failure) => {
                if !config.continue_on_error {
                    return Err(DietRsError::Profile(failure.error));
                }
                warn!(profile_id = %failure.id, error = %failure.error, "Skipping profile");
                failures.push(failure);
            }
        }
    }

    let duration_ms = start_time.elapsed().as_millis();
    debug!(duration_ms = duration_ms as u64, "Batch evaluation finished");
    info!(
        evaluated = reports.len(),
        failed = failures.len(),
        "Batch evaluation complete"
    );

    Ok(BatchSummary {
        reports,
        failures,
        duration_ms,
    })
}
