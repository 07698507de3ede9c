use cardapio_shared::{
    DateRange,
    mealplan::{
        ActiveMealPlan, CopyWeekRequest, GenerateRequest, MealPlanEntry, MealPlanEntryPatch,
        NewMealPlanEntry, WeeklyPlanSummary,
    },
    suggestion::{MealSuggestion, SuggestionRequest},
    user::MealPlanPreferences,
};
use time::Date;

use crate::Result;

/// Remote resource API the meal-plan core consumes.
///
/// Implementations are cheap to clone and share their underlying connection
/// pool or cache between clones.
#[async_trait::async_trait]
pub trait MealPlanApi: Send + Sync {
    async fn list_entries(&self, user_id: &str, range: DateRange) -> Result<Vec<MealPlanEntry>>;

    async fn active_plan(&self, user_id: &str) -> Result<Option<ActiveMealPlan>>;

    async fn create_entry(&self, input: &NewMealPlanEntry) -> Result<MealPlanEntry>;

    async fn update_entry(&self, id: &str, patch: &MealPlanEntryPatch) -> Result<MealPlanEntry>;

    async fn delete_entry(&self, id: &str) -> Result<()>;

    async fn generate(&self, input: &GenerateRequest) -> Result<Vec<MealPlanEntry>>;

    async fn copy_week(&self, input: &CopyWeekRequest) -> Result<Vec<MealPlanEntry>>;

    async fn weekly_summary(&self, user_id: &str, week_start: Date) -> Result<WeeklyPlanSummary>;

    async fn suggestions(&self, input: &SuggestionRequest) -> Result<Vec<MealSuggestion>>;

    async fn preferences(&self, user_id: &str) -> Result<MealPlanPreferences>;

    async fn save_preferences(
        &self,
        user_id: &str,
        preferences: &MealPlanPreferences,
    ) -> Result<MealPlanPreferences>;
}
