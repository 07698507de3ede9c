use cardapio_shared::mealplan::{MealPlanEntry, MealType};
use serde::Deserialize;
use serde_json::json;
use time::{Duration, OffsetDateTime, Time, macros::time};

use crate::{Notification, Notifier, Result};

/// Wall-clock time each meal slot is served at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MealTimes {
    pub breakfast: Time,
    pub lunch: Time,
    pub snack: Time,
    pub dinner: Time,
}

impl Default for MealTimes {
    fn default() -> Self {
        Self {
            breakfast: time!(08:00),
            lunch: time!(12:00),
            snack: time!(16:00),
            dinner: time!(19:00),
        }
    }
}

impl MealTimes {
    pub fn at(&self, meal_type: MealType) -> Time {
        match meal_type {
            MealType::Breakfast => self.breakfast,
            MealType::Lunch => self.lunch,
            MealType::Snack => self.snack,
            MealType::Dinner => self.dinner,
        }
    }
}

fn default_lead_minutes() -> u32 {
    30
}

fn default_locale() -> String {
    "pt-BR".to_owned()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReminderSettings {
    #[serde(default = "default_lead_minutes")]
    pub lead_minutes: u32,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(skip)]
    pub times: MealTimes,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            lead_minutes: default_lead_minutes(),
            locale: default_locale(),
            times: MealTimes::default(),
        }
    }
}

pub fn reminder_id(entry: &MealPlanEntry) -> String {
    format!("meal-{}", entry.id)
}

/// Reminder for `entry`, `lead_minutes` before its meal time.
///
/// Meals already served and completed entries get none. A trigger time
/// already past for an upcoming meal is moved to one minute from `now`.
/// The meal time is read in the offset of `now`.
pub fn meal_reminder(
    entry: &MealPlanEntry,
    settings: &ReminderSettings,
    now: OffsetDateTime,
) -> Option<Notification> {
    if entry.completed {
        return None;
    }

    let meal_time = settings.times.at(entry.meal_type);
    let meal_at = entry
        .date
        .with_time(meal_time)
        .assume_offset(now.offset());

    if meal_at <= now {
        return None;
    }

    let mut trigger_at = meal_at - Duration::minutes(settings.lead_minutes as i64);
    if trigger_at <= now {
        trigger_at = now + Duration::minutes(1);
    }

    let locale = settings.locale.as_str();
    let meal = rust_i18n::t!(format!("meal_type.{}", entry.meal_type), locale = locale);
    let time = format!("{:02}:{:02}", meal_time.hour(), meal_time.minute());

    Some(Notification {
        id: reminder_id(entry),
        title: rust_i18n::t!("reminder.title", locale = locale, meal = meal).to_string(),
        message: rust_i18n::t!(
            "reminder.message",
            locale = locale,
            recipe = entry.display_name(),
            time = time
        )
        .to_string(),
        trigger_at,
        payload: json!({
            "entryId": entry.id,
            "date": cardapio_shared::format_date(entry.date),
            "mealType": entry.meal_type,
            "recipeId": entry.recipe_id,
        }),
    })
}

/// Aligns pending reminders with `entries`: upcoming meals are (re)scheduled,
/// completed or past ones cancelled. Returns how many are scheduled.
pub async fn sync_reminders(
    notifier: &dyn Notifier,
    entries: &[MealPlanEntry],
    settings: &ReminderSettings,
    now: OffsetDateTime,
) -> Result<usize> {
    let mut scheduled = 0;

    for entry in entries {
        match meal_reminder(entry, settings, now) {
            Some(notification) => {
                notifier.schedule(notification).await?;
                scheduled += 1;
            }
            None => {
                notifier.cancel(&reminder_id(entry)).await?;
            }
        }
    }

    tracing::info!(scheduled, total = entries.len(), "meal reminders synced");

    Ok(scheduled)
}
