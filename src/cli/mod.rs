use std::process::ExitCode;

use cardapio_mealplan::Outcome;
use serde::Serialize;
use time::Date;

pub mod entry;
pub mod plan;
pub mod remind;
pub mod session;

pub fn date(value: &str) -> cardapio_shared::Result<Date> {
    cardapio_shared::parse_date(value)
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);

    Ok(())
}

/// Failures were already shown by the alert sink, only the exit code is left.
pub fn finish<T>(outcome: Outcome<T>, print: impl FnOnce(T)) -> ExitCode {
    match outcome {
        Outcome::Applied(value) => {
            print(value);
            ExitCode::SUCCESS
        }
        Outcome::Superseded => ExitCode::SUCCESS,
        Outcome::Failed(_) => ExitCode::FAILURE,
    }
}
