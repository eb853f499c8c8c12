//! # caledit Domain
//!
//! Business domain types for the calendar description editor.
//!
//! This crate contains:
//! - Calendar, event and replacement-rule data types
//! - Domain error types and Result definitions
//! - The editor configuration model
//!
//! ## Architecture
//! - No dependencies on other caledit crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
