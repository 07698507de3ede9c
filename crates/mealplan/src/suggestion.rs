use cardapio_shared::{
    mealplan::MealType,
    suggestion::{Confidence, MealSuggestion},
};
use serde::Serialize;

/// Keeps the suggestions of the active meal-type tab, server order untouched.
pub fn filter_by_meal_type(suggestions: &[MealSuggestion], tab: MealType) -> Vec<MealSuggestion> {
    suggestions
        .iter()
        .filter(|suggestion| suggestion.meal_type == tab)
        .cloned()
        .collect()
}

pub fn confidence_label(score: f32, locale: &str) -> String {
    let key = format!("confidence.{}", Confidence::from_score(score).label());

    rust_i18n::t!(key, locale = locale).to_string()
}

/// A suggestion ready to be displayed.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RankedSuggestion {
    pub rank: usize,
    pub confidence: Confidence,
    pub label: String,
    #[serde(flatten)]
    pub suggestion: MealSuggestion,
}

pub fn rank(suggestions: Vec<MealSuggestion>, locale: &str) -> Vec<RankedSuggestion> {
    suggestions
        .into_iter()
        .enumerate()
        .map(|(i, suggestion)| RankedSuggestion {
            rank: i + 1,
            confidence: suggestion.bucket(),
            label: confidence_label(suggestion.score, locale),
            suggestion,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    fn suggestion(id: &str, meal_type: MealType, score: f32) -> MealSuggestion {
        MealSuggestion {
            recipe_id: id.to_owned(),
            recipe_name: None,
            score,
            reasons: vec![],
            meal_type,
            date: date!(2024 - 01 - 03),
            confidence: None,
        }
    }

    #[test]
    fn filter_keeps_tab_in_server_order() {
        let list = vec![
            suggestion("a", MealType::Dinner, 0.5),
            suggestion("b", MealType::Lunch, 0.9),
            suggestion("c", MealType::Dinner, 0.95),
        ];

        let ids = filter_by_meal_type(&list, MealType::Dinner)
            .into_iter()
            .map(|s| s.recipe_id)
            .collect::<Vec<_>>();

        assert_eq!(ids, ["a", "c"]);
        assert!(filter_by_meal_type(&[], MealType::Snack).is_empty());
    }

    #[test]
    fn labels_follow_thresholds() {
        assert_eq!(confidence_label(0.85, "pt-BR"), "Ótima");
        assert_eq!(confidence_label(0.6, "pt-BR"), "Boa");
        assert_eq!(confidence_label(0.2, "pt-BR"), "Regular");
        assert_eq!(confidence_label(0.8, "en"), "Great");
    }

    #[test]
    fn rank_numbers_from_one() {
        let ranked = rank(
            vec![
                suggestion("a", MealType::Lunch, 0.9),
                suggestion("b", MealType::Lunch, 0.1),
            ],
            "en",
        );

        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].confidence, Confidence::High);
        assert_eq!(ranked[1].label, "Regular");
    }
}
