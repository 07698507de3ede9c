use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};
use validator::Validate;

use crate::mealplan::MealType;

#[derive(
    EnumString,
    VariantArray,
    Display,
    AsRefStr,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum VarietyLevel {
    Low,
    #[default]
    Medium,
    High,
}

fn default_servings() -> u16 {
    2
}

fn default_meal_types() -> Vec<MealType> {
    vec![MealType::Breakfast, MealType::Lunch, MealType::Dinner]
}

/// Per-user planning preferences, owned by the profile on the server.
#[derive(Serialize, Deserialize, Validate, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanPreferences {
    #[serde(default = "default_meal_types")]
    pub preferred_meal_types: Vec<MealType>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    #[validate(range(min = 5, max = 600))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_prep_time_minutes: Option<u16>,
    #[validate(range(min = 5, max = 600))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cook_time_minutes: Option<u16>,
    #[serde(default)]
    pub variety_level: VarietyLevel,
    #[validate(range(min = 1))]
    #[serde(default = "default_servings")]
    pub servings_default: u16,
}

impl Default for MealPlanPreferences {
    fn default() -> Self {
        Self {
            preferred_meal_types: default_meal_types(),
            dietary_restrictions: vec![],
            max_prep_time_minutes: None,
            max_cook_time_minutes: None,
            variety_level: VarietyLevel::default(),
            servings_default: default_servings(),
        }
    }
}
