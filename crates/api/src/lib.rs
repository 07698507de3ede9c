mod cache;
mod client;
mod error;
mod http;

pub use cache::*;
pub use client::*;
pub use error::*;
pub use http::*;
