use std::process::ExitCode;

use anyhow::Result;
use cardapio::App;
use cardapio_shared::{mealplan::MealType, user::VarietyLevel};
use clap::{Parser, Subcommand};
use time::Date;

use crate::cli::{date, entry::ServingsChange};

mod cli;

/// cardapio - meal plan calendar
#[derive(Parser)]
#[command(name = "cardapio")]
#[command(about = "Plan, track and get reminded of your weekly meals", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the local store
    Migrate,
    /// Remember the signed-in user
    Login {
        user_id: String,
        /// Bearer token sent to the API
        #[arg(long)]
        token: Option<String>,
    },
    /// Forget the signed-in user
    Logout,
    /// Show the week containing a date (today by default)
    Week {
        #[arg(long, value_parser = date)]
        date: Option<Date>,
        #[arg(long)]
        json: bool,
    },
    /// Show the month containing a date, laid out on whole weeks
    Month {
        #[arg(long, value_parser = date)]
        date: Option<Date>,
        #[arg(long)]
        json: bool,
    },
    /// Completion progress of a week
    Stats {
        #[arg(long, value_parser = date)]
        date: Option<Date>,
        #[arg(long)]
        json: bool,
    },
    /// Recipe suggestions for a meal
    Suggest {
        meal_type: MealType,
        #[arg(long, value_parser = date)]
        date: Option<Date>,
        #[arg(long, default_value_t = 10)]
        limit: u16,
        #[arg(long)]
        json: bool,
    },
    /// Add a recipe to the active meal plan
    Add {
        recipe_id: String,
        meal_type: MealType,
        #[arg(long, value_parser = date)]
        date: Option<Date>,
        /// Defaults to the servings set in the preferences
        #[arg(long)]
        servings: Option<u16>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Move a meal to another day or slot
    Move {
        id: String,
        #[arg(value_parser = date)]
        date: Date,
        meal_type: MealType,
    },
    /// Change servings: `+`, `-` or a number
    Servings {
        id: String,
        #[arg(allow_hyphen_values = true)]
        change: ServingsChange,
        /// Any day of the meal's week, used to look it up when stepping
        #[arg(long, value_parser = date)]
        date: Option<Date>,
    },
    /// Mark a meal as completed
    Complete {
        id: String,
        /// Mark as not completed instead
        #[arg(long, conflicts_with = "toggle")]
        undo: bool,
        /// Flip the current state of the meal found in the week of this date
        #[arg(long, value_parser = date)]
        toggle: Option<Date>,
    },
    /// Remove a meal from the plan
    Delete { id: String },
    /// Let the server fill a date range
    Generate {
        #[arg(long, value_parser = date)]
        start: Date,
        #[arg(long, value_parser = date)]
        end: Date,
        #[arg(long, value_delimiter = ',')]
        meal_types: Vec<MealType>,
        #[arg(long)]
        servings: Option<u16>,
    },
    /// Copy the meals of one week into another
    Copy {
        #[arg(long, value_parser = date)]
        from: Date,
        #[arg(long, value_parser = date)]
        to: Date,
    },
    /// Show or update planning preferences
    Preferences {
        #[arg(long, value_delimiter = ',')]
        meal_types: Option<Vec<MealType>>,
        #[arg(long, value_delimiter = ',')]
        dietary_restrictions: Option<Vec<String>>,
        #[arg(long)]
        max_prep_time: Option<u16>,
        #[arg(long)]
        max_cook_time: Option<u16>,
        #[arg(long)]
        variety: Option<VarietyLevel>,
        #[arg(long)]
        servings: Option<u16>,
    },
    /// Schedule local reminders for upcoming meals
    Remind {
        #[arg(long, default_value_t = 2)]
        weeks: usize,
        /// List the scheduled reminders and exit
        #[arg(long)]
        once: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = cardapio::config::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    cardapio::observability::init_observability(&config.observability)?;

    let app = App::open(config).await?;

    let code = match cli.command {
        Commands::Migrate => {
            tracing::info!("local store is up to date");
            ExitCode::SUCCESS
        }
        Commands::Login { user_id, token } => {
            cli::session::login(app, user_id, token).await?;
            ExitCode::SUCCESS
        }
        Commands::Logout => {
            cli::session::logout(app).await?;
            ExitCode::SUCCESS
        }
        Commands::Week { date, json } => {
            cli::plan::week(app, date, json).await?;
            ExitCode::SUCCESS
        }
        Commands::Month { date, json } => {
            cli::plan::month(app, date, json).await?;
            ExitCode::SUCCESS
        }
        Commands::Stats { date, json } => {
            cli::plan::stats(app, date, json).await?;
            ExitCode::SUCCESS
        }
        Commands::Suggest {
            meal_type,
            date,
            limit,
            json,
        } => {
            cli::plan::suggest(app, meal_type, date, limit, json).await?;
            ExitCode::SUCCESS
        }
        Commands::Add {
            recipe_id,
            meal_type,
            date,
            servings,
            notes,
        } => cli::entry::add(app, recipe_id, meal_type, date, servings, notes).await?,
        Commands::Move {
            id,
            date,
            meal_type,
        } => cli::entry::move_entry(app, id, date, meal_type).await?,
        Commands::Servings { id, change, date } => {
            cli::entry::servings(app, id, change, date).await?
        }
        Commands::Complete { id, undo, toggle } => {
            cli::entry::complete(app, id, undo, toggle).await?
        }
        Commands::Delete { id } => cli::entry::delete(app, id).await?,
        Commands::Generate {
            start,
            end,
            meal_types,
            servings,
        } => cli::entry::generate(app, start, end, meal_types, servings).await?,
        Commands::Copy { from, to } => cli::entry::copy(app, from, to).await?,
        Commands::Preferences {
            meal_types,
            dietary_restrictions,
            max_prep_time,
            max_cook_time,
            variety,
            servings,
        } => {
            let change = cli::entry::PreferencesChange {
                meal_types,
                dietary_restrictions,
                max_prep_time_minutes: max_prep_time,
                max_cook_time_minutes: max_cook_time,
                variety_level: variety,
                servings_default: servings,
            };

            cli::entry::preferences(app, change).await?
        }
        Commands::Remind { weeks, once } => {
            cli::remind::remind(app, weeks, once).await?;
            ExitCode::SUCCESS
        }
    };

    Ok(code)
}
