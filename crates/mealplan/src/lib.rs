mod alert;
pub mod calendar;
mod command;
mod generation;
mod query;
mod service;
pub mod stats;
pub mod suggestion;

pub use alert::*;
pub use command::*;
pub use generation::*;
pub use query::*;
pub use service::*;

rust_i18n::i18n!("locales", fallback = "pt-BR");

pub const DEFAULT_LOCALE: &str = "pt-BR";

/// Localized weekday name, e.g. `Segunda-feira`.
pub fn weekday_name(date: time::Date, locale: &str) -> String {
    rust_i18n::t!(date.weekday().to_string(), locale = locale).to_string()
}

pub fn meal_type_name(meal_type: cardapio_shared::mealplan::MealType, locale: &str) -> String {
    rust_i18n::t!(format!("meal_type.{meal_type}"), locale = locale).to_string()
}
