mod date;
mod error;
pub mod mealplan;
pub mod suggestion;
pub mod user;

pub use date::*;
pub use error::*;
