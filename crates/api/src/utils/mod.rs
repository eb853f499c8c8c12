//! Shared helpers for the control surface

pub mod health;
pub mod logging;
