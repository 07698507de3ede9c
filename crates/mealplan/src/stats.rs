use cardapio_shared::mealplan::WeeklyPlanSummary;
use serde::Serialize;

use crate::calendar::{CalendarDay, MonthView, WeekView};

/// Completion progress of a period.
#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeekProgress {
    pub total: u32,
    pub completed: u32,
    pub percentage: f64,
}

impl WeekProgress {
    /// `percentage` is 0 when nothing is planned and never leaves `0..=100`,
    /// even when the server reports more completed meals than planned ones.
    pub fn new(completed: u32, total: u32) -> Self {
        let percentage = if total == 0 {
            0.0
        } else {
            (completed as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
        };

        Self {
            total,
            completed,
            percentage,
        }
    }

    pub fn rounded(&self) -> u8 {
        self.percentage.round() as u8
    }

    pub fn remaining(&self) -> u32 {
        self.total.saturating_sub(self.completed)
    }
}

impl From<&WeeklyPlanSummary> for WeekProgress {
    fn from(summary: &WeeklyPlanSummary) -> Self {
        Self::new(summary.completed_meals, summary.total_recipes)
    }
}

impl From<&WeekView> for WeekProgress {
    fn from(view: &WeekView) -> Self {
        Self::new(view.completed_meals, view.total_recipes)
    }
}

impl From<&MonthView> for WeekProgress {
    fn from(view: &MonthView) -> Self {
        Self::new(view.completed_meals, view.total_recipes)
    }
}

pub fn progress_from_days(days: &[CalendarDay]) -> WeekProgress {
    let (completed, total) = days.iter().fold((0, 0), |(completed, total), day| {
        (completed + day.meals.completed(), total + day.total_meals)
    });

    WeekProgress::new(completed, total)
}
