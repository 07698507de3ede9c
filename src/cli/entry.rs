use std::{process::ExitCode, str::FromStr};

use cardapio::{App, StderrAlert, render};
use cardapio_mealplan::{AddRecipe, week_range};
use cardapio_shared::{
    format_date,
    mealplan::{CopyWeekRequest, GenerateRequest, MealPlanEntry, MealType},
    user::VarietyLevel,
};
use time::Date;

use super::{finish, print_json};

/// `+` and `-` step by one serving, a number sets the count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServingsChange {
    Up,
    Down,
    Set(u16),
}

impl FromStr for ServingsChange {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "+" => Ok(ServingsChange::Up),
            "-" => Ok(ServingsChange::Down),
            other => other
                .parse()
                .map(ServingsChange::Set)
                .map_err(|_| format!("expected `+`, `-` or a number, got `{other}`")),
        }
    }
}

fn print_entries(entries: &[MealPlanEntry], locale: &str) {
    for entry in entries {
        println!("{} {}", format_date(entry.date), render::entry(entry, locale));
    }
}

#[tracing::instrument(skip(app))]
pub async fn add(
    app: App,
    recipe_id: String,
    meal_type: MealType,
    date: Option<Date>,
    servings: Option<u16>,
    notes: Option<String>,
) -> anyhow::Result<ExitCode> {
    let session = app.session().await?;
    let api = app.api(&session)?;
    let query = app.query(api.clone());

    let servings = match servings {
        Some(servings) => servings,
        None => query.preferences(&session.user_id).await.servings_default,
    };
    let plan = query.active_plan(&session.user_id).await;

    let outcome = app
        .command(api, StderrAlert)
        .add(
            plan.as_ref(),
            AddRecipe {
                user_id: session.user_id.to_owned(),
                recipe_id,
                date: date.unwrap_or_else(|| query.today()),
                meal_type,
                servings,
                notes,
            },
        )
        .await;

    Ok(finish(outcome, |entry| {
        print_entries(&[entry], app.locale())
    }))
}

#[tracing::instrument(skip(app))]
pub async fn move_entry(
    app: App,
    id: String,
    date: Date,
    meal_type: MealType,
) -> anyhow::Result<ExitCode> {
    let session = app.session().await?;
    let outcome = app
        .command(app.api(&session)?, StderrAlert)
        .move_entry(&id, date, meal_type)
        .await;

    Ok(finish(outcome, |entry| {
        print_entries(&[entry], app.locale())
    }))
}

/// Stepping needs the current count, so the entry is looked up in the week
/// of `date`.
#[tracing::instrument(skip(app))]
pub async fn servings(
    app: App,
    id: String,
    change: ServingsChange,
    date: Option<Date>,
) -> anyhow::Result<ExitCode> {
    let session = app.session().await?;
    let api = app.api(&session)?;
    let query = app.query(api.clone());
    let command = app.command(api, StderrAlert);

    let outcome = match change {
        ServingsChange::Set(servings) => command.update_servings(&id, servings).await,
        step => {
            let date = date.unwrap_or_else(|| query.today());
            let Some(entry) = query.find_entry(&session.user_id, &id, date).await else {
                anyhow::bail!("meal {id} not found in the week of {}", format_date(date));
            };

            if step == ServingsChange::Up {
                command.increment_servings(&entry).await
            } else {
                command.decrement_servings(&entry).await
            }
        }
    };

    Ok(finish(outcome, |entry| {
        print_entries(&[entry], app.locale())
    }))
}

#[tracing::instrument(skip(app))]
pub async fn complete(
    app: App,
    id: String,
    undo: bool,
    toggle: Option<Date>,
) -> anyhow::Result<ExitCode> {
    let session = app.session().await?;
    let api = app.api(&session)?;
    let command = app.command(api.clone(), StderrAlert);

    let outcome = match toggle {
        Some(date) => {
            let query = app.query(api);
            let Some(entry) = query.find_entry(&session.user_id, &id, date).await else {
                anyhow::bail!("meal {id} not found in the week of {}", format_date(date));
            };

            command.toggle_completed(&entry).await
        }
        None => command.mark_completed(&id, !undo).await,
    };

    Ok(finish(outcome, |entry| {
        print_entries(&[entry], app.locale())
    }))
}

#[tracing::instrument(skip(app))]
pub async fn delete(app: App, id: String) -> anyhow::Result<ExitCode> {
    let session = app.session().await?;
    let outcome = app
        .command(app.api(&session)?, StderrAlert)
        .delete(&id)
        .await;

    Ok(finish(outcome, |_| {}))
}

#[tracing::instrument(skip(app))]
pub async fn generate(
    app: App,
    start: Date,
    end: Date,
    meal_types: Vec<MealType>,
    servings: Option<u16>,
) -> anyhow::Result<ExitCode> {
    let session = app.session().await?;
    let api = app.api(&session)?;

    let servings = match servings {
        Some(servings) => servings,
        None => {
            app.query(api.clone())
                .preferences(&session.user_id)
                .await
                .servings_default
        }
    };

    let outcome = app
        .command(api, StderrAlert)
        .generate(&GenerateRequest {
            user_id: session.user_id.to_owned(),
            start_date: start,
            end_date: end,
            meal_types,
            servings,
        })
        .await;

    Ok(finish(outcome, |entries| {
        print_entries(&entries, app.locale())
    }))
}

/// Both dates are moved to the first day of their week.
#[tracing::instrument(skip(app))]
pub async fn copy(app: App, from: Date, to: Date) -> anyhow::Result<ExitCode> {
    let session = app.session().await?;
    let week_start = app.config.calendar.week_start;

    let outcome = app
        .command(app.api(&session)?, StderrAlert)
        .copy_week(&CopyWeekRequest {
            user_id: session.user_id.to_owned(),
            source_week_start: week_range(from, week_start).start,
            target_week_start: week_range(to, week_start).start,
        })
        .await;

    Ok(finish(outcome, |entries| {
        print_entries(&entries, app.locale())
    }))
}

#[derive(Debug, Default)]
pub struct PreferencesChange {
    pub meal_types: Option<Vec<MealType>>,
    pub dietary_restrictions: Option<Vec<String>>,
    pub max_prep_time_minutes: Option<u16>,
    pub max_cook_time_minutes: Option<u16>,
    pub variety_level: Option<VarietyLevel>,
    pub servings_default: Option<u16>,
}

impl PreferencesChange {
    pub fn is_empty(&self) -> bool {
        self.meal_types.is_none()
            && self.dietary_restrictions.is_none()
            && self.max_prep_time_minutes.is_none()
            && self.max_cook_time_minutes.is_none()
            && self.variety_level.is_none()
            && self.servings_default.is_none()
    }
}

/// Prints the current preferences, or saves them with `change` applied.
#[tracing::instrument(skip(app))]
pub async fn preferences(app: App, change: PreferencesChange) -> anyhow::Result<ExitCode> {
    let session = app.session().await?;
    let api = app.api(&session)?;
    let mut preferences = app.query(api.clone()).preferences(&session.user_id).await;

    if change.is_empty() {
        print_json(&preferences)?;
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(meal_types) = change.meal_types {
        preferences.preferred_meal_types = meal_types;
    }
    if let Some(restrictions) = change.dietary_restrictions {
        preferences.dietary_restrictions = restrictions;
    }
    if let Some(minutes) = change.max_prep_time_minutes {
        preferences.max_prep_time_minutes = Some(minutes);
    }
    if let Some(minutes) = change.max_cook_time_minutes {
        preferences.max_cook_time_minutes = Some(minutes);
    }
    if let Some(level) = change.variety_level {
        preferences.variety_level = level;
    }
    if let Some(servings) = change.servings_default {
        preferences.servings_default = servings;
    }

    let outcome = app
        .command(api, StderrAlert)
        .save_preferences(&session.user_id, &preferences)
        .await;

    let mut printed = Ok(());
    let code = finish(outcome, |saved| printed = print_json(&saved));
    printed?;

    Ok(code)
}
