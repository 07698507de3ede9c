use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};
use time::{Date, OffsetDateTime};
use validator::Validate;

use crate::{DateRange, iso_date};

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
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

fn default_servings() -> u16 {
    1
}

/// A recipe planned for a given day and meal slot.
///
/// Nothing prevents two entries sharing the same non-snack slot: the server
/// accepts them and so does this type.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanEntry {
    pub id: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_plan_id: Option<String>,
    #[serde(with = "iso_date", alias = "plannedDate")]
    pub date: Date,
    pub meal_type: MealType,
    pub recipe_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_name: Option<String>,
    #[serde(default = "default_servings")]
    pub servings: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, alias = "isCompleted")]
    pub completed: bool,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<OffsetDateTime>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<OffsetDateTime>,
}

impl MealPlanEntry {
    pub fn is_on(&self, date: Date) -> bool {
        self.date == date
    }

    pub fn display_name(&self) -> &str {
        self.recipe_name.as_deref().unwrap_or(&self.recipe_id)
    }
}

#[derive(Serialize, Deserialize, Validate, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewMealPlanEntry {
    #[validate(length(min = 1))]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_plan_id: Option<String>,
    #[validate(length(min = 1))]
    pub recipe_id: String,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub meal_type: MealType,
    #[validate(range(min = 1))]
    pub servings: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, Validate, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanEntryPatch {
    #[serde(
        default,
        with = "iso_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<MealType>,
    #[validate(range(min = 1))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl MealPlanEntryPatch {
    pub fn moved(date: Date, meal_type: MealType) -> Self {
        Self {
            date: Some(date),
            meal_type: Some(meal_type),
            ..Default::default()
        }
    }

    pub fn servings(servings: u16) -> Self {
        Self {
            servings: Some(servings),
            ..Default::default()
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Default::default()
        }
    }
}

/// The plan new entries are attached to.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActiveMealPlan {
    pub id: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(with = "iso_date")]
    pub start_date: Date,
    #[serde(with = "iso_date")]
    pub end_date: Date,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPlanSummary {
    #[serde(with = "iso_date")]
    pub week_start: Date,
    #[serde(with = "iso_date")]
    pub week_end: Date,
    #[serde(default)]
    pub total_recipes: u32,
    #[serde(default)]
    pub completed_meals: u32,
}

impl WeeklyPlanSummary {
    pub fn empty(range: DateRange) -> Self {
        Self {
            week_start: range.start,
            week_end: range.end,
            total_recipes: 0,
            completed_meals: 0,
        }
    }
}

#[derive(Serialize, Deserialize, Validate, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[validate(length(min = 1))]
    pub user_id: String,
    #[serde(with = "iso_date")]
    pub start_date: Date,
    #[serde(with = "iso_date")]
    pub end_date: Date,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meal_types: Vec<MealType>,
    #[validate(range(min = 1))]
    pub servings: u16,
}

#[derive(Serialize, Deserialize, Validate, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CopyWeekRequest {
    #[validate(length(min = 1))]
    pub user_id: String,
    #[serde(with = "iso_date")]
    pub source_week_start: Date,
    #[serde(with = "iso_date")]
    pub target_week_start: Date,
}
