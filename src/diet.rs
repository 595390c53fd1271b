//! Diet recommendation engine
//!
//! Turns a [`Profile`] into daily calorie and macronutrient targets. The
//! calorie adjustment and macro split start from the BMI category and are
//! then shifted by body type and age.

use crate::error::{DietRsError, Result};
use crate::metrics::{round_half_up, MetricsCalculator};
use crate::models::{BmiCategory, BodyType, DietRecommendation, Gender, MacroRatio, Profile};
use crate::validation::{ProfileValidator, ValidationPolicy};
use tracing::debug;

/// Approximate energy content of 1 kg of body mass, kcal
pub const KCAL_PER_KG: f64 = 7700.0;

pub const PROTEIN_KCAL_PER_GRAM: f64 = 4.0;
pub const CARB_KCAL_PER_GRAM: f64 = 4.0;
pub const FAT_KCAL_PER_GRAM: f64 = 9.0;

/// Fiber target per 1000 kcal eaten, grams
pub const FIBER_GRAMS_PER_1000_KCAL: f64 = 14.0;

/// Minimum daily intake regardless of the computed deficit, kcal
pub fn calorie_floor(gender: Gender) -> i32 {
    match gender {
        Gender::Male => 1500,
        Gender::Female => 1200,
    }
}

/// Calorie and macro-split knobs before they are resolved into grams.
///
/// `calorie_adjustment` is subtracted from TDEE, so positive values are a
/// deficit and negative values a surplus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DietAdjustment {
    pub calorie_adjustment: i32,
    /// Grams of protein per kg of body weight
    pub protein_multiplier: f64,
    /// Share of non-protein calories from carbohydrates
    pub carb_share: f64,
    /// Share of non-protein calories from fat
    pub fat_share: f64,
}

impl DietAdjustment {
    /// Base adjustment for a BMI category
    pub fn for_category(category: BmiCategory) -> Self {
        let (calorie_adjustment, protein_multiplier, carb_share, fat_share) = match category {
            BmiCategory::SevereThinness | BmiCategory::ModerateThinness => (-500, 2.0, 0.55, 0.45),
            BmiCategory::Underweight => (-300, 1.8, 0.55, 0.45),
            BmiCategory::Normal => (0, 1.6, 0.50, 0.50),
            BmiCategory::Overweight => (500, 2.0, 0.40, 0.60),
            BmiCategory::Obese1 => (600, 2.2, 0.35, 0.65),
            BmiCategory::Obese2 | BmiCategory::Obese3 => (750, 2.4, 0.30, 0.70),
        };

        Self {
            calorie_adjustment,
            protein_multiplier,
            carb_share,
            fat_share,
        }
    }

    /// Shift the split for the body type.
    ///
    /// Ectomorphs get more carbs and a smaller deficit, endomorphs less
    /// carbs, more protein and a slightly larger deficit.
    pub fn apply_body_type(mut self, body_type: BodyType, category: BmiCategory) -> Self {
        match body_type {
            BodyType::Ectomorph => {
                self.carb_share += 0.10;
                self.fat_share -= 0.10;
                if self.calorie_adjustment > 0 {
                    self.calorie_adjustment -= 100;
                }
            }
            BodyType::Endomorph => {
                self.carb_share -= 0.10;
                self.fat_share += 0.05;
                self.protein_multiplier += 0.2;
                if self.calorie_adjustment < 500 && category != BmiCategory::Underweight {
                    self.calorie_adjustment += 100;
                }
            }
            BodyType::Mesomorph => {}
        }
        self
    }

    /// More protein from 50, and from 65 also cap the deficit at 500 kcal
    pub fn apply_age(mut self, age: u32) -> Self {
        if age >= 50 {
            self.protein_multiplier += 0.2;
        }
        if age >= 65 {
            self.protein_multiplier += 0.2;
            self.calorie_adjustment = self.calorie_adjustment.min(500);
        }
        self
    }

    /// Full adjustment pipeline for a profile
    pub fn for_profile(profile: &Profile, category: BmiCategory) -> Self {
        Self::for_category(category)
            .apply_body_type(profile.body_type, category)
            .apply_age(profile.age)
    }
}

/// Diet recommendation utilities
pub struct DietRecommendationEngine;

impl DietRecommendationEngine {
    /// Compute daily targets for a profile.
    ///
    /// Never fails: missing weight, height or age propagate as zeros.
    pub fn recommend(profile: &Profile) -> DietRecommendation {
        let metrics = MetricsCalculator::calculate_all(profile);
        let adjustment = DietAdjustment::for_profile(profile, metrics.bmi_category);

        debug!(
            category = ?metrics.bmi_category,
            body_type = %profile.body_type,
            calorie_adjustment = adjustment.calorie_adjustment,
            protein_multiplier = adjustment.protein_multiplier,
            "Selected diet adjustment"
        );

        let target_calories = calorie_floor(profile.gender)
            .max(metrics.tdee.saturating_sub(adjustment.calorie_adjustment));
        let target = f64::from(target_calories);

        let protein = round_half_up(profile.weight * adjustment.protein_multiplier) as i32;
        let protein_calories = f64::from(protein) * PROTEIN_KCAL_PER_GRAM;

        // Can go negative for extreme protein multipliers; left unguarded so
        // results stay comparable with the reference tables.
        let remaining_calories = target - protein_calories;
        let carb_calories = remaining_calories * adjustment.carb_share;
        let fat_calories = remaining_calories * adjustment.fat_share;

        let carbs = round_half_up(carb_calories / CARB_KCAL_PER_GRAM) as i32;
        let fat = round_half_up(fat_calories / FAT_KCAL_PER_GRAM) as i32;
        let fiber = round_half_up(target / 1000.0 * FIBER_GRAMS_PER_1000_KCAL) as i32;

        DietRecommendation {
            calories: target_calories,
            protein,
            carbs,
            fat,
            fiber,
            tdee: metrics.tdee,
            bmr: metrics.bmr,
            deficit: adjustment.calorie_adjustment,
            body_fat: metrics.body_fat,
            water_intake: metrics.water_intake,
            weeks_to_goal: Self::weeks_to_goal(profile, adjustment.calorie_adjustment),
            macro_ratio: MacroRatio {
                protein: Self::percent_of(protein_calories, target),
                carbs: Self::percent_of(carb_calories, target),
                fat: Self::percent_of(fat_calories, target),
            },
        }
    }

    /// Validate per `policy`, then [`recommend`](Self::recommend)
    pub fn recommend_with_policy(
        profile: &Profile,
        policy: ValidationPolicy,
    ) -> Result<DietRecommendation> {
        ProfileValidator::check(profile, policy).map_err(DietRsError::from)?;
        Ok(Self::recommend(profile))
    }

    /// Weeks needed to reach the goal weight at the given daily adjustment.
    ///
    /// Only meaningful when the adjustment points toward the goal (a deficit
    /// to lose, a surplus to gain); otherwise 0.
    pub fn weeks_to_goal(profile: &Profile, calorie_adjustment: i32) -> u32 {
        let weight_diff = profile.weight - profile.goal_weight;

        let heading_to_goal = (weight_diff > 0.0 && calorie_adjustment > 0)
            || (weight_diff < 0.0 && calorie_adjustment < 0);
        if !heading_to_goal {
            return 0;
        }

        let weekly_change_kg = f64::from(calorie_adjustment.abs()) * 7.0 / KCAL_PER_KG;
        (weight_diff.abs() / weekly_change_kg).ceil() as u32
    }

    fn percent_of(part: f64, total: f64) -> i32 {
        round_half_up(part / total * 100.0) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivityLevel;

    fn create_test_profile() -> Profile {
        Profile {
            weight: 70.0,
            height: 170.0,
            age: 30,
            gender: Gender::Male,
            activity_level: ActivityLevel::Moderate,
            body_type: BodyType::Mesomorph,
            goal_weight: 65.0,
        }
    }

    #[test]
    fn test_normal_weight_maintenance() {
        let rec = DietRecommendationEngine::recommend(&create_test_profile());

        assert_eq!(rec.bmr, 1618);
        assert_eq!(rec.tdee, 2508);
        assert_eq!(rec.deficit, 0);
        assert_eq!(rec.calories, 2508);
        assert_eq!(rec.protein, 112);
        assert_eq!(rec.carbs, 258);
        assert_eq!(rec.fat, 114);
        assert_eq!(rec.fiber, 35);
        assert_eq!(rec.water_intake, 3000);
        assert_eq!(rec.body_fat, 19.8);
        // Losing weight without a deficit has no estimate
        assert_eq!(rec.weeks_to_goal, 0);
        assert_eq!(rec.macro_ratio, MacroRatio { protein: 18, carbs: 41, fat: 41 });
    }

    #[test]
    fn test_obese_deficit_and_weeks_to_goal() {
        let profile = Profile {
            weight: 100.0,
            height: 175.0,
            age: 40,
            activity_level: ActivityLevel::Sedentary,
            goal_weight: 80.0,
            ..create_test_profile()
        };

        let rec = DietRecommendationEngine::recommend(&profile);
        assert_eq!(rec.bmr, 1899);
        assert_eq!(rec.tdee, 2279);
        assert_eq!(rec.deficit, 600);
        assert_eq!(rec.calories, 1679);
        assert_eq!(rec.protein, 220);
        assert_eq!(rec.carbs, 70);
        assert_eq!(rec.fat, 58);
        assert_eq!(rec.weeks_to_goal, 37);
    }

    #[test]
    fn test_thin_surplus_and_weeks_to_goal() {
        let profile = Profile {
            weight: 45.0,
            height: 165.0,
            age: 25,
            gender: Gender::Female,
            activity_level: ActivityLevel::Light,
            goal_weight: 52.0,
            ..create_test_profile()
        };

        let rec = DietRecommendationEngine::recommend(&profile);
        assert_eq!(rec.bmr, 1195);
        assert_eq!(rec.tdee, 1643);
        assert_eq!(rec.deficit, -500);
        assert_eq!(rec.calories, 2143);
        assert_eq!(rec.protein, 90);
        assert_eq!(rec.carbs, 245);
        assert_eq!(rec.fat, 89);
        assert_eq!(rec.weeks_to_goal, 16);
    }

    #[test]
    fn test_female_calorie_floor() {
        let profile = Profile {
            weight: 100.0,
            height: 150.0,
            age: 40,
            gender: Gender::Female,
            activity_level: ActivityLevel::Sedentary,
            goal_weight: 70.0,
            ..create_test_profile()
        };

        let rec = DietRecommendationEngine::recommend(&profile);
        assert_eq!(rec.tdee, 1892);
        assert_eq!(rec.deficit, 750);
        assert_eq!(rec.calories, 1200);
    }

    #[test]
    fn test_ectomorph_modifiers() {
        let base = DietAdjustment::for_category(BmiCategory::Overweight);
        let adj = base.apply_body_type(BodyType::Ectomorph, BmiCategory::Overweight);

        assert_eq!(adj.calorie_adjustment, 400);
        assert!((adj.carb_share - 0.50).abs() < 1e-9);
        assert!((adj.fat_share - 0.50).abs() < 1e-9);

        // Surplus is left untouched
        let thin = DietAdjustment::for_category(BmiCategory::Underweight)
            .apply_body_type(BodyType::Ectomorph, BmiCategory::Underweight);
        assert_eq!(thin.calorie_adjustment, -300);
    }

    #[test]
    fn test_endomorph_modifiers() {
        let normal = DietAdjustment::for_category(BmiCategory::Normal)
            .apply_body_type(BodyType::Endomorph, BmiCategory::Normal);
        assert_eq!(normal.calorie_adjustment, 100);
        assert!((normal.protein_multiplier - 1.8).abs() < 1e-9);
        assert!((normal.carb_share - 0.40).abs() < 1e-9);
        assert!((normal.fat_share - 0.55).abs() < 1e-9);

        let underweight = DietAdjustment::for_category(BmiCategory::Underweight)
            .apply_body_type(BodyType::Endomorph, BmiCategory::Underweight);
        assert_eq!(underweight.calorie_adjustment, -300);

        let severe = DietAdjustment::for_category(BmiCategory::SevereThinness)
            .apply_body_type(BodyType::Endomorph, BmiCategory::SevereThinness);
        assert_eq!(severe.calorie_adjustment, -400);

        let overweight = DietAdjustment::for_category(BmiCategory::Overweight)
            .apply_body_type(BodyType::Endomorph, BmiCategory::Overweight);
        assert_eq!(overweight.calorie_adjustment, 500);
    }

    #[test]
    fn test_age_modifiers() {
        let base = DietAdjustment::for_category(BmiCategory::Obese2);

        let fifty = base.apply_age(50);
        assert!((fifty.protein_multiplier - 2.6).abs() < 1e-9);
        assert_eq!(fifty.calorie_adjustment, 750);

        let senior = base.apply_age(65);
        assert!((senior.protein_multiplier - 2.8).abs() < 1e-9);
        assert_eq!(senior.calorie_adjustment, 500);

        // Surplus is not affected by the cap
        let thin_senior = DietAdjustment::for_category(BmiCategory::SevereThinness).apply_age(70);
        assert_eq!(thin_senior.calorie_adjustment, -500);
    }

    #[test]
    fn test_endomorph_over_fifty_protein() {
        let profile = Profile {
            weight: 90.0,
            height: 180.0,
            age: 55,
            body_type: BodyType::Endomorph,
            goal_weight: 80.0,
            ..create_test_profile()
        };

        let rec = DietRecommendationEngine::recommend(&profile);
        assert_eq!(rec.deficit, 500);
        assert_eq!(rec.protein, 216);
    }

    #[test]
    fn test_weeks_to_goal_direction_mismatch() {
        let gaining = Profile {
            weight: 90.0,
            height: 170.0,
            goal_weight: 100.0,
            ..create_test_profile()
        };
        assert_eq!(DietRecommendationEngine::weeks_to_goal(&gaining, 600), 0);

        let at_goal = Profile {
            goal_weight: 70.0,
            ..create_test_profile()
        };
        assert_eq!(DietRecommendationEngine::weeks_to_goal(&at_goal, 500), 0);
    }

    #[test]
    fn test_zero_profile_propagates_zeros() {
        let profile = Profile {
            weight: 0.0,
            height: 0.0,
            age: 0,
            goal_weight: 0.0,
            ..create_test_profile()
        };

        let rec = DietRecommendationEngine::recommend(&profile);
        assert_eq!(rec.bmr, 0);
        assert_eq!(rec.tdee, 0);
        assert_eq!(rec.body_fat, 0.0);
        assert_eq!(rec.protein, 0);
        assert_eq!(rec.water_intake, 500);
        // BMI 0 lands in severe thinness, so a surplus is planned on the floor
        assert_eq!(rec.deficit, -500);
        assert_eq!(rec.calories, 1500);
    }

    #[test]
    fn test_extreme_measurements_saturate() {
        let profile = Profile {
            weight: 1e9,
            height: 1e6,
            goal_weight: 2e9,
            ..create_test_profile()
        };

        let rec = DietRecommendationEngine::recommend(&profile);
        assert_eq!(rec.tdee, i32::MAX);
        assert_eq!(rec.deficit, -500);
        assert_eq!(rec.calories, i32::MAX);

        let result =
            DietRecommendationEngine::recommend_with_policy(&profile, ValidationPolicy::Permissive);
        assert!(result.is_ok());
    }

    #[test]
    fn test_recommend_with_policy() {
        let bad = Profile {
            height: 0.0,
            ..create_test_profile()
        };

        let strict = DietRecommendationEngine::recommend_with_policy(&bad, ValidationPolicy::Strict);
        assert!(matches!(strict, Err(DietRsError::Profile(_))));

        let permissive =
            DietRecommendationEngine::recommend_with_policy(&bad, ValidationPolicy::Permissive);
        assert!(permissive.is_ok());
    }
}
