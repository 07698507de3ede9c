pub mod app;
pub mod config;
pub mod observability;
pub mod render;

pub use app::{App, StderrAlert};
