//! HTTP control surface handlers

mod calendar;
mod configuration;
mod error;
mod health;

pub use calendar::*;
pub use configuration::*;
pub use error::ApiError;
pub use health::*;
