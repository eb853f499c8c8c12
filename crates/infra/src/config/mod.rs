//! Configuration loading and management
//!
//! This module provides utilities for loading the editor configuration
//! from files and environment variables, and the live store the service
//! reads it from.

pub mod loader;
pub mod store;

// Re-export commonly used items
pub use loader::{apply_env_overrides, load, load_from_file, probe_config_paths, CONFIG_PATH_ENV};
pub use store::ConfigStore;
