use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use time::Date;

use crate::{iso_date, mealplan::MealType};

pub const HIGH_CONFIDENCE_SCORE: f32 = 0.8;
pub const MEDIUM_CONFIDENCE_SCORE: f32 = 0.6;

#[derive(
    EnumString, Display, AsRefStr, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn from_score(score: f32) -> Self {
        if score >= HIGH_CONFIDENCE_SCORE {
            Confidence::High
        } else if score >= MEDIUM_CONFIDENCE_SCORE {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    /// Short qualitative label shown next to a suggestion.
    pub fn label(&self) -> &'static str {
        match self {
            Confidence::High => "great",
            Confidence::Medium => "good",
            Confidence::Low => "regular",
        }
    }
}

/// A candidate recipe ranked by the server for a date and meal slot.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MealSuggestion {
    pub recipe_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_name: Option<String>,
    pub score: f32,
    #[serde(default)]
    pub reasons: Vec<String>,
    pub meal_type: MealType,
    #[serde(with = "iso_date")]
    pub date: Date,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
}

impl MealSuggestion {
    /// Bucket derived from the score; a server-provided bucket is ignored so
    /// labels stay consistent with the fixed thresholds.
    pub fn bucket(&self) -> Confidence {
        Confidence::from_score(self.score)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    pub user_id: String,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub meal_type: MealType,
    pub limit: u16,
}
