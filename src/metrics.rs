//! Body metrics derived from a profile
//!
//! BMI, ideal weight, BMR, TDEE, body fat and hydration targets. Every
//! function here is total: degenerate input (zero weight, height or age)
//! yields `0` for the affected quantity instead of an error.

use crate::models::{BmiCategory, Gender, HealthMetrics, IdealWeightRange, Profile};

/// Round half toward positive infinity, `floor(x + 0.5)`.
///
/// Differs from [`f64::round`] only on negative half values (-2.5 -> -2).
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Round to one decimal place using [`round_half_up`]
pub fn round_to_tenth(value: f64) -> f64 {
    round_half_up(value * 10.0) / 10.0
}

// Zero and NaN count as "not provided".
fn is_unset(value: f64) -> bool {
    value == 0.0 || value.is_nan()
}

/// Health metrics calculation utilities
pub struct MetricsCalculator;

impl MetricsCalculator {
    /// Body Mass Index: weight (kg) / height (m)²
    ///
    /// Returns `0.0` when weight or height is missing.
    pub fn calculate_bmi(profile: &Profile) -> f64 {
        if is_unset(profile.weight) || is_unset(profile.height) {
            return 0.0;
        }

        let height_m = profile.height / 100.0;
        profile.weight / (height_m * height_m)
    }

    /// Classify a BMI value.
    ///
    /// Left-closed, right-open bands:
    /// - < 16.0: severe thinness
    /// - < 17.0: moderate thinness
    /// - < 18.5: underweight
    /// - < 25.0: normal
    /// - < 30.0: overweight
    /// - < 35.0: obese class I
    /// - < 40.0: obese class II
    /// - otherwise obese class III
    pub fn classify_bmi(bmi: f64) -> BmiCategory {
        if bmi < 16.0 {
            BmiCategory::SevereThinness
        } else if bmi < 17.0 {
            BmiCategory::ModerateThinness
        } else if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else if bmi < 35.0 {
            BmiCategory::Obese1
        } else if bmi < 40.0 {
            BmiCategory::Obese2
        } else {
            BmiCategory::Obese3
        }
    }

    /// Healthy weight band for the profile's height.
    ///
    /// Older adults get a higher target BMI band:
    /// - 65+: BMI 22-27, optimal 24
    /// - 50+: BMI 20-25, optimal 23
    /// - otherwise: BMI 18.5-24.9, optimal 22
    pub fn ideal_weight_range(profile: &Profile) -> IdealWeightRange {
        let height_m = profile.height / 100.0;
        let height_sq = height_m * height_m;

        let (min_bmi, max_bmi, optimal_bmi) = if profile.age >= 65 {
            (22.0, 27.0, 24.0)
        } else if profile.age >= 50 {
            (20.0, 25.0, 23.0)
        } else {
            (18.5, 24.9, 22.0)
        };

        IdealWeightRange {
            min: round_to_tenth(min_bmi * height_sq),
            max: round_to_tenth(max_bmi * height_sq),
            optimal: round_to_tenth(optimal_bmi * height_sq),
        }
    }

    /// Basal Metabolic Rate using Mifflin-St Jeor (1990)
    ///
    /// BMR = 10 × weight + 6.25 × height - 5 × age + s, where s is +5 for
    /// men and -161 for women. Returns 0 if weight, height or age is missing.
    pub fn calculate_bmr(profile: &Profile) -> i32 {
        if is_unset(profile.weight) || is_unset(profile.height) || profile.age == 0 {
            return 0;
        }

        let base = 10.0 * profile.weight + 6.25 * profile.height - 5.0 * f64::from(profile.age);
        let bmr = match profile.gender {
            Gender::Male => base + 5.0,
            Gender::Female => base - 161.0,
        };

        round_half_up(bmr) as i32
    }

    /// Total Daily Energy Expenditure: BMR × activity multiplier
    pub fn calculate_tdee(profile: &Profile) -> i32 {
        let bmr = Self::calculate_bmr(profile);
        Self::tdee_from_bmr(bmr, profile)
    }

    fn tdee_from_bmr(bmr: i32, profile: &Profile) -> i32 {
        if bmr == 0 {
            return 0;
        }

        round_half_up(f64::from(bmr) * profile.activity_level.multiplier()) as i32
    }

    /// Body fat percentage estimate (Deurenberg, 1991)
    ///
    /// BF% = 1.2 × BMI + 0.23 × age - 10.8 × sex - 5.4, with sex = 1 for men
    /// and 0 for women. Clamped at 0 and rounded to one decimal.
    pub fn estimate_body_fat(profile: &Profile) -> f64 {
        let bmi = Self::calculate_bmi(profile);
        Self::body_fat_from_bmi(bmi, profile)
    }

    fn body_fat_from_bmi(bmi: f64, profile: &Profile) -> f64 {
        if is_unset(bmi) || profile.age == 0 {
            return 0.0;
        }

        let gender_factor = match profile.gender {
            Gender::Male => 1.0,
            Gender::Female => 0.0,
        };

        let body_fat = 1.2 * bmi + 0.23 * f64::from(profile.age) - 10.8 * gender_factor - 5.4;
        round_to_tenth(body_fat.max(0.0))
    }

    /// Daily water target in ml: 35 ml/kg plus an activity bonus, rounded to
    /// the nearest 100 ml.
    pub fn calculate_water_intake(profile: &Profile) -> i32 {
        let base = profile.weight * 35.0;
        let total = base + profile.activity_level.water_bonus_ml();
        (round_half_up(total / 100.0) * 100.0) as i32
    }

    /// Compute every metric in one pass
    pub fn calculate_all(profile: &Profile) -> HealthMetrics {
        let bmi = Self::calculate_bmi(profile);
        let bmr = Self::calculate_bmr(profile);

        HealthMetrics {
            bmi,
            bmi_category: Self::classify_bmi(bmi),
            ideal_weight: Self::ideal_weight_range(profile),
            bmr,
            tdee: Self::tdee_from_bmr(bmr, profile),
            body_fat: Self::body_fat_from_bmi(bmi, profile),
            water_intake: Self::calculate_water_intake(profile),
        }
    }
}
