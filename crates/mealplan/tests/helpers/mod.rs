#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use cardapio_api::{ApiError, MealPlanApi, Result};
use cardapio_mealplan::Alert;
use cardapio_shared::{
    DateRange,
    mealplan::{
        ActiveMealPlan, CopyWeekRequest, GenerateRequest, MealPlanEntry, MealPlanEntryPatch,
        MealType, NewMealPlanEntry, WeeklyPlanSummary,
    },
    suggestion::{MealSuggestion, SuggestionRequest},
    user::MealPlanPreferences,
};
use time::Date;

pub const USER_ID: &str = "john";

pub fn entry(id: &str, date: Date, meal_type: MealType) -> MealPlanEntry {
    MealPlanEntry {
        id: id.to_owned(),
        user_id: USER_ID.to_owned(),
        meal_plan_id: Some("plan-1".to_owned()),
        date,
        meal_type,
        recipe_id: format!("recipe-{id}"),
        recipe_name: None,
        servings: 2,
        notes: None,
        completed: false,
        created_at: None,
        updated_at: None,
    }
}

pub fn plan(start: Date, end: Date) -> ActiveMealPlan {
    ActiveMealPlan {
        id: "plan-1".to_owned(),
        user_id: USER_ID.to_owned(),
        name: None,
        start_date: start,
        end_date: end,
    }
}

#[derive(Default)]
struct State {
    entries: Vec<MealPlanEntry>,
    suggestions: Vec<MealSuggestion>,
    active: Option<ActiveMealPlan>,
    calls: HashMap<&'static str, usize>,
    reject: Option<(u16, Option<String>)>,
    reject_completion: Option<(u16, Option<String>)>,
    delete_delay: Option<Duration>,
    fail_reads: bool,
    update_delays: VecDeque<Duration>,
    next_id: usize,
}

/// In-memory stand-in for the remote API.
#[derive(Clone, Default)]
pub struct FakeApi {
    state: Arc<Mutex<State>>,
}

impl FakeApi {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn with_entries(self, entries: Vec<MealPlanEntry>) -> Self {
        self.state().entries = entries;
        self
    }

    pub fn with_suggestions(self, suggestions: Vec<MealSuggestion>) -> Self {
        self.state().suggestions = suggestions;
        self
    }

    pub fn with_active_plan(self, plan: ActiveMealPlan) -> Self {
        self.state().active = Some(plan);
        self
    }

    /// Every mutation answers with `status` and the given body message.
    pub fn rejecting(self, status: u16, message: Option<&str>) -> Self {
        self.state().reject = Some((status, message.map(str::to_owned)));
        self
    }

    /// Only patches touching `completed` answer with `status`.
    pub fn rejecting_completion(self, status: u16, message: &str) -> Self {
        self.state().reject_completion = Some((status, Some(message.to_owned())));
        self
    }

    pub fn delay_deletes(self, ms: u64) -> Self {
        self.state().delete_delay = Some(Duration::from_millis(ms));
        self
    }

    pub fn failing_reads(self) -> Self {
        self.state().fail_reads = true;
        self
    }

    /// Delays applied to the next `update_entry` calls, in call order.
    pub fn delay_updates(self, delays: &[u64]) -> Self {
        self.state().update_delays = delays.iter().map(|ms| Duration::from_millis(*ms)).collect();
        self
    }

    pub fn calls(&self, name: &str) -> usize {
        self.state().calls.get(name).copied().unwrap_or_default()
    }

    pub fn total_calls(&self) -> usize {
        self.state().calls.values().sum()
    }

    pub fn entries(&self) -> Vec<MealPlanEntry> {
        self.state().entries.clone()
    }

    fn read(&self, name: &'static str) -> Result<()> {
        let mut state = self.state();
        *state.calls.entry(name).or_default() += 1;

        if state.fail_reads {
            return Err(ApiError::Status {
                status: 503,
                message: None,
            });
        }

        Ok(())
    }

    fn write(&self, name: &'static str) -> Result<()> {
        let mut state = self.state();
        *state.calls.entry(name).or_default() += 1;

        match &state.reject {
            Some((status, message)) => Err(ApiError::Status {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl MealPlanApi for FakeApi {
    async fn list_entries(&self, _user_id: &str, range: DateRange) -> Result<Vec<MealPlanEntry>> {
        self.read("list_entries")?;

        Ok(self
            .state()
            .entries
            .iter()
            .filter(|entry| range.contains(entry.date))
            .cloned()
            .collect())
    }

    async fn active_plan(&self, _user_id: &str) -> Result<Option<ActiveMealPlan>> {
        self.read("active_plan")?;

        Ok(self.state().active.clone())
    }

    async fn create_entry(&self, input: &NewMealPlanEntry) -> Result<MealPlanEntry> {
        self.write("create_entry")?;

        let mut state = self.state();
        state.next_id += 1;
        let mut created = entry(
            &format!("new-{}", state.next_id),
            input.date,
            input.meal_type,
        );
        created.recipe_id = input.recipe_id.to_owned();
        created.meal_plan_id = input.meal_plan_id.clone();
        created.servings = input.servings;
        state.entries.push(created.clone());

        Ok(created)
    }

    async fn update_entry(&self, id: &str, patch: &MealPlanEntryPatch) -> Result<MealPlanEntry> {
        let delay = self.state().update_delays.pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.write("update_entry")?;

        let mut state = self.state();
        if let (Some(_), Some((status, message))) = (patch.completed, &state.reject_completion) {
            return Err(ApiError::Status {
                status: *status,
                message: message.clone(),
            });
        }

        let Some(entry) = state.entries.iter_mut().find(|entry| entry.id == id) else {
            return Err(ApiError::Status {
                status: 404,
                message: Some("Refeição não encontrada".to_owned()),
            });
        };

        if let Some(date) = patch.date {
            entry.date = date;
        }
        if let Some(meal_type) = patch.meal_type {
            entry.meal_type = meal_type;
        }
        if let Some(servings) = patch.servings {
            entry.servings = servings;
        }
        if let Some(completed) = patch.completed {
            entry.completed = completed;
        }

        Ok(entry.clone())
    }

    async fn delete_entry(&self, id: &str) -> Result<()> {
        let delay = self.state().delete_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.write("delete_entry")?;
        self.state().entries.retain(|entry| entry.id != id);

        Ok(())
    }

    async fn generate(&self, input: &GenerateRequest) -> Result<Vec<MealPlanEntry>> {
        self.write("generate")?;

        let generated = DateRange::new(input.start_date, input.end_date)
            .days()
            .map(|date| entry(&format!("gen-{date}"), date, MealType::Dinner))
            .collect::<Vec<_>>();
        self.state().entries.extend(generated.iter().cloned());

        Ok(generated)
    }

    async fn copy_week(&self, _input: &CopyWeekRequest) -> Result<Vec<MealPlanEntry>> {
        self.write("copy_week")?;

        Ok(vec![])
    }

    async fn weekly_summary(&self, _user_id: &str, week_start: Date) -> Result<WeeklyPlanSummary> {
        self.read("weekly_summary")?;

        let range = DateRange::new(week_start, week_start + time::Duration::days(6));
        let state = self.state();
        let entries = state.entries.iter().filter(|entry| range.contains(entry.date));

        Ok(WeeklyPlanSummary {
            week_start: range.start,
            week_end: range.end,
            total_recipes: entries.clone().count() as u32,
            completed_meals: entries.filter(|entry| entry.completed).count() as u32,
        })
    }

    async fn suggestions(&self, _input: &SuggestionRequest) -> Result<Vec<MealSuggestion>> {
        self.read("suggestions")?;

        Ok(self.state().suggestions.clone())
    }

    async fn preferences(&self, _user_id: &str) -> Result<MealPlanPreferences> {
        self.read("preferences")?;

        Ok(MealPlanPreferences {
            servings_default: 4,
            ..Default::default()
        })
    }

    async fn save_preferences(
        &self,
        _user_id: &str,
        preferences: &MealPlanPreferences,
    ) -> Result<MealPlanPreferences> {
        self.write("save_preferences")?;

        Ok(preferences.clone())
    }
}

/// Alert sink remembering every alert shown.
#[derive(Clone, Default)]
pub struct RecordingAlert {
    shown: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingAlert {
    pub fn shown(&self) -> Vec<(String, String)> {
        self.shown.lock().unwrap().clone()
    }
}

impl Alert for RecordingAlert {
    fn show(&self, title: &str, message: &str) {
        self.shown
            .lock()
            .unwrap()
            .push((title.to_owned(), message.to_owned()));
    }
}
