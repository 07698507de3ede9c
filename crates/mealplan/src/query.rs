use cardapio_api::MealPlanApi;
use cardapio_shared::{
    DateRange,
    mealplan::{ActiveMealPlan, MealPlanEntry, WeeklyPlanSummary},
    suggestion::{MealSuggestion, SuggestionRequest},
    user::MealPlanPreferences,
};
use time::Date;

use crate::{
    WeekStart,
    calendar::{MonthView, WeekView},
    stats::WeekProgress,
    week_range,
};

/// Read side of the meal plan.
///
/// A failed read is logged and degrades to an empty result, so views are
/// still produced, just without meals.
#[derive(Clone)]
pub struct Query<A> {
    api: A,
    week_start: WeekStart,
    timezone: String,
    today: Option<Date>,
}

impl<A: MealPlanApi> Query<A> {
    pub fn new(api: A, week_start: WeekStart, timezone: impl Into<String>) -> Self {
        Self {
            api,
            week_start,
            timezone: timezone.into(),
            today: None,
        }
    }

    /// Pins "today" instead of reading the clock.
    pub fn at(mut self, today: Date) -> Self {
        self.today = Some(today);
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    pub fn today(&self) -> Date {
        self.today
            .unwrap_or_else(|| crate::today(&self.timezone))
    }

    pub async fn entries(&self, user_id: &str, range: DateRange) -> Vec<MealPlanEntry> {
        match self.api.list_entries(user_id, range).await {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(user_id, ?range, err = %err, "failed to list meal plan entries");
                vec![]
            }
        }
    }

    pub async fn find_entry(&self, user_id: &str, id: &str, date: Date) -> Option<MealPlanEntry> {
        self.entries(user_id, week_range(date, self.week_start))
            .await
            .into_iter()
            .find(|entry| entry.id == id)
    }

    pub async fn week_view(&self, user_id: &str, date: Date) -> WeekView {
        let range = week_range(date, self.week_start);
        let entries = self.entries(user_id, range).await;

        WeekView::new(range, &entries, self.today())
    }

    pub async fn month_view(&self, user_id: &str, date: Date) -> MonthView {
        let range = MonthView::padded_range(date, self.week_start);
        let entries = self.entries(user_id, range).await;

        MonthView::new(date, self.week_start, &entries, self.today())
    }

    pub async fn weekly_summary(&self, user_id: &str, date: Date) -> WeeklyPlanSummary {
        let range = week_range(date, self.week_start);

        match self.api.weekly_summary(user_id, range.start).await {
            Ok(summary) => summary,
            Err(err) => {
                tracing::warn!(user_id, err = %err, "failed to fetch weekly summary");
                WeeklyPlanSummary::empty(range)
            }
        }
    }

    pub async fn week_progress(&self, user_id: &str, date: Date) -> WeekProgress {
        WeekProgress::from(&self.weekly_summary(user_id, date).await)
    }

    /// Ranked candidates in server order.
    pub async fn suggestions(&self, input: &SuggestionRequest) -> Vec<MealSuggestion> {
        match self.api.suggestions(input).await {
            Ok(suggestions) => suggestions,
            Err(err) => {
                tracing::warn!(user_id = %input.user_id, err = %err, "failed to fetch suggestions");
                vec![]
            }
        }
    }

    pub async fn active_plan(&self, user_id: &str) -> Option<ActiveMealPlan> {
        match self.api.active_plan(user_id).await {
            Ok(plan) => plan,
            Err(err) => {
                tracing::warn!(user_id, err = %err, "failed to fetch active meal plan");
                None
            }
        }
    }

    pub async fn preferences(&self, user_id: &str) -> MealPlanPreferences {
        match self.api.preferences(user_id).await {
            Ok(preferences) => preferences,
            Err(err) => {
                tracing::warn!(user_id, err = %err, "failed to fetch preferences");
                MealPlanPreferences::default()
            }
        }
    }
}
