//! Profile validation
//!
//! The calculators accept any profile and propagate zeros for missing
//! values. Validation is opt-in at the edges (CLI, import, store) through
//! [`ValidationPolicy`].

use crate::error::ProfileError;
use crate::metrics::MetricsCalculator;
use crate::models::Profile;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::str::FromStr;
use tracing::warn;

const AGE_RANGE: RangeInclusive<u32> = 1..=120;
const HEIGHT_RANGE_CM: RangeInclusive<f64> = 50.0..=272.0;
const WEIGHT_RANGE_KG: RangeInclusive<f64> = 20.0..=650.0;

/// How strictly profiles are checked before computing recommendations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationPolicy {
    /// Accept anything; degenerate values propagate as zeros
    Permissive,
    /// Reject profiles outside physiological ranges
    #[default]
    Strict,
}

impl FromStr for ValidationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "permissive" | "lenient" => Ok(ValidationPolicy::Permissive),
            "strict" => Ok(ValidationPolicy::Strict),
            _ => Err(format!("Invalid validation policy: {}", s)),
        }
    }
}

impl std::fmt::Display for ValidationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationPolicy::Permissive => write!(f, "permissive"),
            ValidationPolicy::Strict => write!(f, "strict"),
        }
    }
}

/// Profile range checks
pub struct ProfileValidator;

impl ProfileValidator {
    /// Check a profile, returning the first violation found
    pub fn validate(profile: &Profile) -> Result<(), ProfileError> {
        Self::validate_measure("weight", profile.weight, &WEIGHT_RANGE_KG)?;
        Self::validate_measure("height", profile.height, &HEIGHT_RANGE_CM)?;
        Self::validate_measure("goalWeight", profile.goal_weight, &WEIGHT_RANGE_KG)?;

        if !AGE_RANGE.contains(&profile.age) {
            return Err(ProfileError::invalid(
                "age",
                profile.age,
                &format!("must be between {} and {}", AGE_RANGE.start(), AGE_RANGE.end()),
            ));
        }

        Ok(())
    }

    /// Validate according to `policy`, logging rejections
    pub fn check(profile: &Profile, policy: ValidationPolicy) -> Result<(), ProfileError> {
        match policy {
            ValidationPolicy::Permissive => Ok(()),
            ValidationPolicy::Strict => Self::validate(profile).map_err(|err| {
                warn!(error = %err, "Rejected profile");
                err
            }),
        }
    }

    /// Non-fatal observations about a profile that passed validation
    pub fn warnings(profile: &Profile) -> Vec<String> {
        let mut warnings = Vec::new();
        let ideal = MetricsCalculator::ideal_weight_range(profile);

        if profile.goal_weight < ideal.min {
            warnings.push(format!(
                "Goal weight {:.1} kg is below the healthy range ({:.1}-{:.1} kg)",
                profile.goal_weight, ideal.min, ideal.max
            ));
        } else if profile.goal_weight > ideal.max {
            warnings.push(format!(
                "Goal weight {:.1} kg is above the healthy range ({:.1}-{:.1} kg)",
                profile.goal_weight, ideal.min, ideal.max
            ));
        }

        if (profile.weight - profile.goal_weight).abs() < f64::EPSILON {
            warnings.push("Goal weight equals current weight".to_string());
        }

        warnings
    }

    fn validate_measure(
        field: &str,
        value: f64,
        range: &RangeInclusive<f64>,
    ) -> Result<(), ProfileError> {
        if !value.is_finite() {
            return Err(ProfileError::invalid(field, value, "must be a finite number"));
        }

        if value <= 0.0 {
            return Err(ProfileError::invalid(field, value, "must be positive"));
        }

        if !range.contains(&value) {
            return Err(ProfileError::invalid(
                field,
                value,
                &format!("must be between {} and {}", range.start(), range.end()),
            ));
        }

        Ok(())
    }
}
