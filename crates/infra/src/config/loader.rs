//! Configuration loader
//!
//! Builds the editor configuration from an optional file plus environment
//! overrides, then validates it.
//!
//! ## Loading Strategy
//! 1. Load the file named by `CALEDIT_CONFIG`, or the first file found by
//!    [`probe_config_paths`]; start from defaults when there is none
//! 2. Apply environment overrides on top
//! 3. Validate; a failure here is fatal at startup
//!
//! ## Environment Variables
//! - `CALEDIT_CONFIG`: Explicit config file path
//! - `CALEDIT_CALENDARS`: Comma separated calendar display names
//! - `CALEDIT_ORIGINAL_TEXT`: Placeholder text to replace
//! - `CALEDIT_REPLACEMENT_TEXT`: Text inserted instead
//! - `CALEDIT_UPDATE_PERIOD`: Look-ahead window length (e.g. `3days`)
//! - `CALEDIT_QUERY_PERIOD`: Pass interval (e.g. `1m`)
//! - `CALEDIT_REQUEST_TIMEOUT`: Per remote call timeout (e.g. `30s`)
//! - `CALEDIT_MAX_CONCURRENCY`: Calendars processed in parallel
//!
//! ## File Locations
//! The loader probes the following names (in order), first in the current
//! working directory and then next to the executable:
//! `caledit.toml`, `caledit.json`, `config.toml`, `config.json`

use std::path::{Path, PathBuf};

use caledit_domain::{parse_period, CalEditError, EditorConfig, Result};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "CALEDIT_CONFIG";

const CANDIDATE_FILES: [&str; 4] = ["caledit.toml", "caledit.json", "config.toml", "config.json"];

/// Load, override and validate the configuration.
///
/// # Errors
/// Returns `CalEditError::Config` if:
/// - The explicit config file is missing or unreadable
/// - File format is invalid
/// - An environment override cannot be parsed
/// - The resulting configuration fails validation
pub fn load() -> Result<EditorConfig> {
    let explicit = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);

    let mut config = match explicit.or_else(probe_config_paths) {
        Some(path) => load_from_file(Some(path))?,
        None => {
            tracing::info!("No config file found, starting from defaults");
            EditorConfig::default()
        }
    };

    apply_env_overrides(&mut config)?;
    config.validate()?;

    tracing::info!(
        calendars = config.calendar_names.len(),
        update_period = %humantime::format_duration(config.update_period),
        query_period = %humantime::format_duration(config.query_period),
        "Configuration loaded"
    );
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations.
/// Supports both JSON and TOML formats (detected by file extension).
/// Fields missing from the file keep their defaults. The result is not
/// validated.
///
/// # Errors
/// Returns `CalEditError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<EditorConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(CalEditError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            CalEditError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| CalEditError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Apply `CALEDIT_*` environment overrides to `config`.
///
/// Text overrides are taken verbatim so trailing spaces survive; every other
/// value is trimmed.
///
/// # Errors
/// Returns `CalEditError::Config` if a period or number cannot be parsed.
pub fn apply_env_overrides(config: &mut EditorConfig) -> Result<()> {
    if let Some(raw) = env_value("CALEDIT_CALENDARS") {
        config.calendar_names = raw
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
    }
    if let Some(text) = env_value("CALEDIT_ORIGINAL_TEXT") {
        config.replacement.original_text = text;
    }
    if let Some(text) = env_value("CALEDIT_REPLACEMENT_TEXT") {
        config.replacement.replacement_text = text;
    }
    if let Some(raw) = env_value("CALEDIT_UPDATE_PERIOD") {
        config.update_period = parse_period("update period", &raw)?;
    }
    if let Some(raw) = env_value("CALEDIT_QUERY_PERIOD") {
        config.query_period = parse_period("query period", &raw)?;
    }
    if let Some(raw) = env_value("CALEDIT_REQUEST_TIMEOUT") {
        config.request_timeout = parse_period("request timeout", &raw)?;
    }
    if let Some(raw) = env_value("CALEDIT_MAX_CONCURRENCY") {
        config.max_concurrent_calendars = raw.trim().parse::<usize>().map_err(|e| {
            CalEditError::Config(format!("Invalid max concurrency '{raw}': {e}"))
        })?;
    }
    Ok(())
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `CalEditError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<EditorConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| CalEditError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| CalEditError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(CalEditError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut directories = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        directories.push(cwd);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            directories.push(exe_dir.to_path_buf());
        }
    }

    directories
        .iter()
        .flat_map(|dir| CANDIDATE_FILES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Read an environment variable, treating empty values as unset.
fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}
