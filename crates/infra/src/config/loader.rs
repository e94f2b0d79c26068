//! Configuration loader
//!
//! Loads [`AppConfig`] from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file into the process environment, if one exists
//! 2. An explicit `--config` path is loaded, then environment overrides apply
//! 3. Otherwise, when `DASHOPS_MERAKI_API_KEY` is set the environment alone
//!    is used
//! 4. Otherwise the first probed config file is used (environment still
//!    overrides), falling back to defaults
//!
//! ## Environment Variables
//! - `DASHOPS_MERAKI_API_KEY`, `DASHOPS_ORG_ID`, `DASHOPS_MERAKI_BASE_URL`
//! - `DASHOPS_WEBEX_TOKEN`, `DASHOPS_WEBEX_EMAIL`, `DASHOPS_WEBEX_BASE_URL`
//! - `DASHOPS_PERF_TAG`, `DASHOPS_PERF_LOSS_THRESHOLD`,
//!   `DASHOPS_PERF_LATENCY_THRESHOLD`
//! - `DASHOPS_ALWAYS_ON_TAG`
//! - `DASHOPS_SCANNING_VALIDATOR`, `DASHOPS_SCANNING_SECRET`,
//!   `DASHOPS_SCANNING_PORT`, `DASHOPS_LOG_DIR`, `DASHOPS_CAMERA_SERIAL`,
//!   `DASHOPS_HOME_MACS` (comma separated)
//! - `DASHOPS_STATE_PATH`, `DASHOPS_INVENTORY_PATH`, `DASHOPS_ARTIFACT_DIR`
//!
//! ## File Locations
//! The loader probes `dashops.{toml,json}` then `config.{toml,json}` in the
//! current directory, its two parents, and next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use dashops_domain::{AppConfig, DashOpsError, Result};

const API_KEY_VAR: &str = "DASHOPS_MERAKI_API_KEY";
const CONFIG_FILE_NAMES: [&str; 4] = ["dashops.toml", "dashops.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy.
///
/// # Errors
/// Returns `DashOpsError::Config` if an explicit file is missing or invalid,
/// or an environment variable cannot be parsed.
pub fn load(path: Option<PathBuf>) -> Result<AppConfig> {
    match dotenvy::dotenv() {
        Ok(env_file) => tracing::debug!(path = %env_file.display(), "Loaded .env file"),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!(error = %err, "Ignoring unreadable .env file"),
    }

    if path.is_some() {
        let mut config = load_from_file(path)?;
        apply_env(&mut config)?;
        return Ok(config);
    }

    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Environment incomplete, trying config files");
            let mut config = match probe_config_paths() {
                Some(found) => load_from_file(Some(found))?,
                None => {
                    tracing::debug!("No config file found, using defaults");
                    AppConfig::default()
                }
            };
            apply_env(&mut config)?;
            Ok(config)
        }
    }
}

/// Load configuration from environment variables on top of defaults.
///
/// # Errors
/// Returns `DashOpsError::Config` if `DASHOPS_MERAKI_API_KEY` is missing or
/// any variable has an invalid value.
pub fn load_from_env() -> Result<AppConfig> {
    env_var(API_KEY_VAR)?;
    let mut config = AppConfig::default();
    apply_env(&mut config)?;
    Ok(config)
}

/// Override `config` with every `DASHOPS_*` variable that is set.
///
/// # Errors
/// Returns `DashOpsError::Config` for unparsable numeric values.
pub fn apply_env(config: &mut AppConfig) -> Result<()> {
    set_string(&mut config.meraki.api_key, API_KEY_VAR);
    set_option(&mut config.meraki.org_id, "DASHOPS_ORG_ID");
    set_string(&mut config.meraki.base_url, "DASHOPS_MERAKI_BASE_URL");

    set_string(&mut config.webex.token, "DASHOPS_WEBEX_TOKEN");
    set_string(&mut config.webex.email, "DASHOPS_WEBEX_EMAIL");
    set_string(&mut config.webex.base_url, "DASHOPS_WEBEX_BASE_URL");

    set_option(&mut config.perf.tag, "DASHOPS_PERF_TAG");
    set_parsed(&mut config.perf.loss_threshold, "DASHOPS_PERF_LOSS_THRESHOLD")?;
    set_parsed(&mut config.perf.latency_threshold, "DASHOPS_PERF_LATENCY_THRESHOLD")?;

    set_option(&mut config.always_on.tag, "DASHOPS_ALWAYS_ON_TAG");

    set_string(&mut config.sense.validator, "DASHOPS_SCANNING_VALIDATOR");
    set_string(&mut config.sense.secret, "DASHOPS_SCANNING_SECRET");
    set_parsed(&mut config.sense.port, "DASHOPS_SCANNING_PORT")?;
    set_path(&mut config.sense.log_dir, "DASHOPS_LOG_DIR");
    set_option(&mut config.sense.camera_serial, "DASHOPS_CAMERA_SERIAL");
    if let Some(macs) = optional_var("DASHOPS_HOME_MACS") {
        config.sense.home_macs = macs
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect();
    }

    set_path(&mut config.demo.state_path, "DASHOPS_STATE_PATH");
    set_path(&mut config.demo.inventory_path, "DASHOPS_INVENTORY_PATH");
    set_path(&mut config.demo.artifact_dir, "DASHOPS_ARTIFACT_DIR");
    Ok(())
}

/// Load configuration from a file.
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `DashOpsError::Config` if the file is missing, no file is found
/// when probing, or the content is invalid.
pub fn load_from_file(path: Option<PathBuf>) -> Result<AppConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(DashOpsError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            DashOpsError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| DashOpsError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration; the format follows the file extension.
fn parse_config(contents: &str, path: &Path) -> Result<AppConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| DashOpsError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| DashOpsError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(DashOpsError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a config file.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `DashOpsError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    optional_var(key).ok_or_else(|| {
        DashOpsError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Set and non-blank value of `key`.
fn optional_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn set_string(target: &mut String, key: &str) {
    if let Some(value) = optional_var(key) {
        *target = value;
    }
}

fn set_option(target: &mut Option<String>, key: &str) {
    if let Some(value) = optional_var(key) {
        *target = Some(value);
    }
}

fn set_path(target: &mut PathBuf, key: &str) {
    if let Some(value) = optional_var(key) {
        *target = PathBuf::from(value);
    }
}

fn set_parsed<T>(target: &mut T, key: &str) -> Result<()>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(value) = optional_var(key) {
        *target = value
            .trim()
            .parse()
            .map_err(|e| DashOpsError::Config(format!("Invalid value for {key}: {e}")))?;
    }
    Ok(())
}
