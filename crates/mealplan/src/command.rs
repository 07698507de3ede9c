use std::sync::Arc;

use cardapio_api::{ApiError, MealPlanApi};
use cardapio_shared::{
    mealplan::{
        ActiveMealPlan, CopyWeekRequest, GenerateRequest, MealPlanEntry, MealPlanEntryPatch,
        MealType, NewMealPlanEntry,
    },
    user::MealPlanPreferences,
};
use strum::AsRefStr;
use time::Date;
use validator::Validate;

use crate::{Alert, DEFAULT_LOCALE, Generations};

/// How a mutation ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The server accepted the mutation.
    Applied(T),
    /// A newer mutation for the same target was issued before this one
    /// settled; its response was discarded.
    Superseded,
    /// Rejected or aborted, the message was shown once through the alert sink.
    Failed(String),
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Outcome::Applied(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Applied(value) => Outcome::Applied(f(value)),
            Outcome::Superseded => Outcome::Superseded,
            Outcome::Failed(message) => Outcome::Failed(message),
        }
    }
}

#[derive(AsRefStr, Clone, Copy, Debug, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
enum Action {
    Add,
    Move,
    Servings,
    Complete,
    Delete,
    Generate,
    Copy,
    Preferences,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddRecipe {
    pub user_id: String,
    pub recipe_id: String,
    pub date: Date,
    pub meal_type: MealType,
    pub servings: u16,
    pub notes: Option<String>,
}

/// Meal-plan mutations.
///
/// Every failure is reported exactly once through the [`Alert`] sink and
/// returned as [`Outcome::Failed`]; nothing is retried. Cache refresh after a
/// successful mutation is left to the API layer.
#[derive(Clone)]
pub struct Command<A> {
    api: A,
    alert: Arc<dyn Alert>,
    locale: String,
    generations: Generations,
}

impl<A: MealPlanApi> Command<A> {
    pub fn new(api: A, alert: impl Alert + 'static) -> Self {
        Self {
            api,
            alert: Arc::new(alert),
            locale: DEFAULT_LOCALE.to_owned(),
            generations: Generations::default(),
        }
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn generations(&self) -> &Generations {
        &self.generations
    }

    /// Adds a recipe to the active plan. Without a plan nothing is sent.
    pub async fn add(
        &self,
        plan: Option<&ActiveMealPlan>,
        input: AddRecipe,
    ) -> Outcome<MealPlanEntry> {
        let Some(plan) = plan else {
            return self.fail(Action::Add, self.text("alert.missing_plan"));
        };

        let input = NewMealPlanEntry {
            user_id: input.user_id,
            meal_plan_id: Some(plan.id.to_owned()),
            recipe_id: input.recipe_id,
            date: input.date,
            meal_type: input.meal_type,
            servings: input.servings,
            notes: input.notes,
        };

        if input.servings < 1 {
            return self.fail(Action::Add, self.text("alert.invalid_servings"));
        }

        if let Err(err) = input.validate() {
            tracing::debug!(err = %err, "invalid new entry");
            return self.fail(Action::Add, self.text("alert.invalid_request"));
        }

        self.run(Action::Add, None, self.api.create_entry(&input))
            .await
    }

    pub async fn move_entry(
        &self,
        id: &str,
        date: Date,
        meal_type: MealType,
    ) -> Outcome<MealPlanEntry> {
        let patch = MealPlanEntryPatch::moved(date, meal_type);

        self.run(Action::Move, Some(id), self.api.update_entry(id, &patch))
            .await
    }

    pub async fn update_servings(&self, id: &str, servings: u16) -> Outcome<MealPlanEntry> {
        let patch = MealPlanEntryPatch::servings(servings);
        if patch.validate().is_err() {
            return self.fail(Action::Servings, self.text("alert.invalid_servings"));
        }

        self.run(Action::Servings, Some(id), self.api.update_entry(id, &patch))
            .await
    }

    pub async fn increment_servings(&self, entry: &MealPlanEntry) -> Outcome<MealPlanEntry> {
        self.update_servings(&entry.id, entry.servings.saturating_add(1))
            .await
    }

    /// Never goes below one serving; at one the entry is returned unchanged.
    pub async fn decrement_servings(&self, entry: &MealPlanEntry) -> Outcome<MealPlanEntry> {
        if entry.servings <= 1 {
            return Outcome::Applied(entry.clone());
        }

        self.update_servings(&entry.id, entry.servings - 1).await
    }

    pub async fn mark_completed(&self, id: &str, completed: bool) -> Outcome<MealPlanEntry> {
        let patch = MealPlanEntryPatch::completed(completed);

        self.run(Action::Complete, Some(id), self.api.update_entry(id, &patch))
            .await
    }

    pub async fn toggle_completed(&self, entry: &MealPlanEntry) -> Outcome<MealPlanEntry> {
        self.mark_completed(&entry.id, !entry.completed).await
    }

    pub async fn delete(&self, id: &str) -> Outcome<()> {
        self.run(Action::Delete, Some(id), self.api.delete_entry(id))
            .await
    }

    pub async fn generate(&self, input: &GenerateRequest) -> Outcome<Vec<MealPlanEntry>> {
        if input.start_date > input.end_date || input.validate().is_err() {
            return self.fail(Action::Generate, self.text("alert.invalid_request"));
        }

        self.run(
            Action::Generate,
            Some(&input.user_id),
            self.api.generate(input),
        )
            .await
    }

    pub async fn copy_week(&self, input: &CopyWeekRequest) -> Outcome<Vec<MealPlanEntry>> {
        if input.validate().is_err() {
            return self.fail(Action::Copy, self.text("alert.invalid_request"));
        }

        let target = format!("{}:{}", input.user_id, input.target_week_start);

        self.run(Action::Copy, Some(&target), self.api.copy_week(input))
            .await
    }

    pub async fn save_preferences(
        &self,
        user_id: &str,
        preferences: &MealPlanPreferences,
    ) -> Outcome<MealPlanPreferences> {
        if let Err(err) = preferences.validate() {
            tracing::debug!(err = %err, "invalid preferences");
            return self.fail(Action::Preferences, self.text("alert.invalid_preferences"));
        }

        self.run(
            Action::Preferences,
            Some(user_id),
            self.api.save_preferences(user_id, preferences),
        )
        .await
    }

    /// Sends `request` and reports its outcome.
    ///
    /// With a `target`, the ticket is keyed by action and target: only a
    /// newer mutation of the same kind on the same target supersedes this
    /// one. A completion never discards a servings change, and nothing but
    /// another delete discards a delete.
    async fn run<T>(
        &self,
        action: Action,
        target: Option<&str>,
        request: impl Future<Output = cardapio_api::Result<T>>,
    ) -> Outcome<T> {
        let ticket = target.map(|target| {
            self.generations
                .issue(format!("{}:{target}", action.as_ref()))
        });
        let res = request.await;

        if let Some(ticket) = ticket {
            if !self.generations.settle(&ticket) {
                tracing::debug!(
                    action = action.as_ref(),
                    key = ticket.key(),
                    ok = res.is_ok(),
                    "discarding superseded response"
                );

                return Outcome::Superseded;
            }
        }

        match res {
            Ok(value) => {
                tracing::info!(action = action.as_ref(), "meal plan updated");
                Outcome::Applied(value)
            }
            Err(err) => self.rejected(action, err),
        }
    }

    fn rejected<T>(&self, action: Action, err: ApiError) -> Outcome<T> {
        tracing::warn!(action = action.as_ref(), err = %err, "meal plan mutation failed");

        let message = err
            .server_message()
            .map(str::to_owned)
            .unwrap_or_else(|| self.text("alert.generic"));

        self.fail(action, message)
    }

    fn fail<T>(&self, action: Action, message: String) -> Outcome<T> {
        let title = self.text(&format!("alert.{}", action.as_ref()));
        self.alert.show(&title, &message);

        Outcome::Failed(message)
    }

    fn text(&self, key: &str) -> String {
        rust_i18n::t!(key, locale = self.locale.as_str()).to_string()
    }
}
