mod error;
pub mod reminder;
mod service;

pub use error::*;
pub use service::*;

rust_i18n::i18n!("locales", fallback = "pt-BR");
