use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Biological sex used by the Mifflin-St Jeor and Deurenberg equations.
///
/// Both published equations are binary, so only two branches exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Self-reported activity level, drives the TDEE multiplier and water bonus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    Light,
    /// Moderate exercise 3-5 days/week
    Moderate,
    /// Hard exercise 6-7 days/week
    Active,
    /// Physical job or twice-daily training
    VeryActive,
}

/// Somatotype used to nudge the macro split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyType {
    Ectomorph,
    Mesomorph,
    Endomorph,
}

/// WHO-style BMI classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BmiCategory {
    SevereThinness,
    ModerateThinness,
    Underweight,
    Normal,
    Overweight,
    Obese1,
    Obese2,
    Obese3,
}

/// Physical attributes and goals of one person.
///
/// Owned by the caller; the calculators only ever borrow it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Body weight in kilograms
    pub weight: f64,

    /// Height in centimeters
    pub height: f64,

    /// Age in whole years
    pub age: u32,

    pub gender: Gender,

    pub activity_level: ActivityLevel,

    pub body_type: BodyType,

    /// Target body weight in kilograms
    pub goal_weight: f64,
}

/// Healthy weight band for a given height, in kilograms (one decimal)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdealWeightRange {
    pub min: f64,
    pub max: f64,
    pub optimal: f64,
}

/// Share of total calories per macronutrient, whole percent.
///
/// Each value is rounded independently, so the sum may drift from 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroRatio {
    pub protein: i32,
    pub carbs: i32,
    pub fat: i32,
}

/// Daily intake targets derived from a [`Profile`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietRecommendation {
    /// Target energy intake in kcal/day
    pub calories: i32,

    /// Protein in grams/day
    pub protein: i32,

    /// Carbohydrates in grams/day
    pub carbs: i32,

    /// Fat in grams/day
    pub fat: i32,

    /// Fiber in grams/day
    pub fiber: i32,

    pub tdee: i32,

    pub bmr: i32,

    /// kcal/day below TDEE; negative means a surplus
    pub deficit: i32,

    /// Estimated body fat percentage
    pub body_fat: f64,

    /// Recommended water intake in ml/day
    pub water_intake: i32,

    /// Estimated weeks until goal weight, 0 when not applicable
    pub weeks_to_goal: u32,

    pub macro_ratio: MacroRatio,
}

/// Every scalar the metrics calculator derives from a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthMetrics {
    pub bmi: f64,
    pub bmi_category: BmiCategory,
    pub ideal_weight: IdealWeightRange,
    pub bmr: i32,
    pub tdee: i32,
    pub body_fat: f64,
    pub water_intake: i32,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ];

    /// Harris-Benedict style activity multiplier applied to BMR
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }

    /// Extra water on top of the weight-based baseline, in ml
    pub fn water_bonus_ml(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 0.0,
            ActivityLevel::Light => 250.0,
            ActivityLevel::Moderate => 500.0,
            ActivityLevel::Active => 750.0,
            ActivityLevel::VeryActive => 1000.0,
        }
    }
}

impl BmiCategory {
    pub const ALL: [BmiCategory; 8] = [
        BmiCategory::SevereThinness,
        BmiCategory::ModerateThinness,
        BmiCategory::Underweight,
        BmiCategory::Normal,
        BmiCategory::Overweight,
        BmiCategory::Obese1,
        BmiCategory::Obese2,
        BmiCategory::Obese3,
    ];

    /// Human-readable label for reports
    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::SevereThinness => "Severe thinness",
            BmiCategory::ModerateThinness => "Moderate thinness",
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese1 => "Obesity class I",
            BmiCategory::Obese2 => "Obesity class II",
            BmiCategory::Obese3 => "Obesity class III",
        }
    }
}

// Lowercase and strip separators so "very_active", "Very-Active" and
// "veryActive" all parse the same way.
fn normalize_token(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            _ => Err(format!("Invalid gender: {}", s)),
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" | "lightlyactive" => Ok(ActivityLevel::Light),
            "moderate" | "moderatelyactive" => Ok(ActivityLevel::Moderate),
            "active" => Ok(ActivityLevel::Active),
            "veryactive" => Ok(ActivityLevel::VeryActive),
            _ => Err(format!("Invalid activity level: {}", s)),
        }
    }
}

impl FromStr for BodyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "ectomorph" => Ok(BodyType::Ectomorph),
            "mesomorph" => Ok(BodyType::Mesomorph),
            "endomorph" => Ok(BodyType::Endomorph),
            _ => Err(format!("Invalid body type: {}", s)),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "veryActive",
        };
        write!(f, "{}", name)
    }
}

impl fmt::Display for BodyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyType::Ectomorph => write!(f, "ectomorph"),
            BodyType::Mesomorph => write!(f, "mesomorph"),
            BodyType::Endomorph => write!(f, "endomorph"),
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_parsing_is_lenient() {
        assert_eq!("veryActive".parse::<ActivityLevel>().unwrap(), ActivityLevel::VeryActive);
        assert_eq!("very_active".parse::<ActivityLevel>().unwrap(), ActivityLevel::VeryActive);
        assert_eq!("Very-Active".parse::<ActivityLevel>().unwrap(), ActivityLevel::VeryActive);
        assert_eq!("F".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!("ENDOMORPH".parse::<BodyType>().unwrap(), BodyType::Endomorph);
        assert!("other".parse::<Gender>().is_err());
    }

    #[test]
    fn test_profile_json_uses_camel_case() {
        let json = r#"{
            "weight": 70.0,
            "height": 170.0,
            "age": 30,
            "gender": "male",
            "activityLevel": "veryActive",
            "bodyType": "mesomorph",
            "goalWeight": 65.0
        }"#;

        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.activity_level, ActivityLevel::VeryActive);
        assert_eq!(profile.goal_weight, 65.0);

        let out = serde_json::to_string(&profile).unwrap();
        assert!(out.contains("\"activityLevel\":\"veryActive\""));
        assert!(out.contains("\"goalWeight\":65.0"));
    }

    #[test]
    fn test_bmi_category_serialization() {
        assert_eq!(serde_json::to_string(&BmiCategory::Obese1).unwrap(), "\"obese1\"");
        assert_eq!(
            serde_json::to_string(&BmiCategory::SevereThinness).unwrap(),
            "\"severeThinness\""
        );
    }

    #[test]
    fn test_activity_display_round_trips_through_from_str() {
        for level in ActivityLevel::ALL {
            assert_eq!(level.to_string().parse::<ActivityLevel>().unwrap(), level);
        }
    }
}
