use std::fmt::Write;

use cardapio_mealplan::{
    calendar::{CalendarDay, MonthView, WeekView},
    meal_type_name,
    stats::WeekProgress,
    suggestion::RankedSuggestion,
    weekday_name,
};
use cardapio_shared::{format_date, mealplan::MealPlanEntry};

pub fn entry(entry: &MealPlanEntry, locale: &str) -> String {
    let check = if entry.completed { "x" } else { " " };

    format!(
        "[{check}] {}: {} ({}) #{}",
        meal_type_name(entry.meal_type, locale),
        entry.display_name(),
        entry.servings,
        entry.id
    )
}

fn day(out: &mut String, day: &CalendarDay, locale: &str) {
    let marker = if day.is_today { " *" } else { "" };
    let _ = writeln!(
        out,
        "{} {}{marker}",
        format_date(day.date),
        weekday_name(day.date, locale)
    );

    for meal in day.meals.entries().chain(day.meals.overflow.iter()) {
        let _ = writeln!(out, "  {}", entry(meal, locale));
    }
}

pub fn progress(progress: &WeekProgress) -> String {
    format!(
        "{}/{} ({}%)",
        progress.completed,
        progress.total,
        progress.rounded()
    )
}

pub fn week(view: &WeekView, locale: &str) -> String {
    let mut out = String::new();

    for calendar_day in &view.days {
        day(&mut out, calendar_day, locale);
    }
    out.push_str(&progress(&WeekProgress::from(view)));

    out
}

/// Only days with meals are listed, padding days from adjacent months skipped.
pub fn month(view: &MonthView, locale: &str) -> String {
    let mut out = format!("{}-{:02}\n", view.year, view.month as u8);

    for calendar_day in view
        .days
        .iter()
        .filter(|d| d.is_current_month && !d.meals.is_empty())
    {
        day(&mut out, calendar_day, locale);
    }
    out.push_str(&progress(&WeekProgress::from(view)));

    out
}

pub fn suggestions(ranked: &[RankedSuggestion]) -> String {
    ranked
        .iter()
        .map(|ranked| {
            let name = ranked
                .suggestion
                .recipe_name
                .as_deref()
                .unwrap_or(&ranked.suggestion.recipe_id);

            format!(
                "{}. {} [{} {:.0}%] {}",
                ranked.rank,
                name,
                ranked.label,
                ranked.suggestion.score * 100.0,
                ranked.suggestion.reasons.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
