//! Configuration management

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DASHBOARD_API_BASE_URL, PERF_LATENCY_THRESHOLD_MS, PERF_LOSS_THRESHOLD, STATE_FILE_NAME,
    WEBEX_API_BASE_URL,
};
use crate::errors::{DashOpsError, Result};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub meraki: MerakiConfig,
    pub webex: WebexConfig,
    pub perf: PerfConfig,
    pub always_on: AlwaysOnConfig,
    pub sense: SenseConfig,
    pub demo: DemoConfig,
}

/// Dashboard API credentials
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MerakiConfig {
    #[serde(skip_serializing)]
    pub api_key: String,
    pub org_id: Option<String>,
    pub base_url: String,
}

/// Chat bot credentials and recipient
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WebexConfig {
    #[serde(skip_serializing)]
    pub token: String,
    pub email: String,
    pub base_url: String,
}

/// Appliance uplink alerting thresholds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PerfConfig {
    pub tag: Option<String>,
    pub loss_threshold: f64,
    pub latency_threshold: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AlwaysOnConfig {
    pub tag: Option<String>,
}

/// Scanning receiver and motion alert settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SenseConfig {
    pub validator: String,
    #[serde(skip_serializing)]
    pub secret: String,
    pub camera_serial: Option<String>,
    pub home_macs: Vec<String>,
    pub log_dir: PathBuf,
    pub port: u16,
}

/// Demo workflow file locations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    pub state_path: PathBuf,
    pub inventory_path: PathBuf,
    pub artifact_dir: PathBuf,
}

impl Default for MerakiConfig {
    fn default() -> Self {
        Self { api_key: String::new(), org_id: None, base_url: DASHBOARD_API_BASE_URL.to_string() }
    }
}

impl Default for WebexConfig {
    fn default() -> Self {
        Self { token: String::new(), email: String::new(), base_url: WEBEX_API_BASE_URL.to_string() }
    }
}

impl Default for PerfConfig {
    fn default() -> Self {
        Self {
            tag: None,
            loss_threshold: PERF_LOSS_THRESHOLD,
            latency_threshold: PERF_LATENCY_THRESHOLD_MS,
        }
    }
}

impl Default for SenseConfig {
    fn default() -> Self {
        Self {
            validator: String::new(),
            secret: String::new(),
            camera_serial: None,
            home_macs: Vec::new(),
            log_dir: PathBuf::from("logs"),
            port: 5000,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from(STATE_FILE_NAME),
            inventory_path: PathBuf::from("inventory.toml"),
            artifact_dir: PathBuf::from("."),
        }
    }
}

impl MerakiConfig {
    /// API key, or `Config` error when unset.
    pub fn require_api_key(&self) -> Result<&str> {
        non_empty(&self.api_key, "meraki.api_key")
    }

    /// Organization id, or `Config` error when unset.
    pub fn require_org_id(&self) -> Result<&str> {
        self.org_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| DashOpsError::Config("meraki.org_id is not set".into()))
    }
}

impl WebexConfig {
    /// Fails with `Config` unless both the bot token and recipient are set.
    pub fn validate(&self) -> Result<()> {
        non_empty(&self.token, "webex.token")?;
        non_empty(&self.email, "webex.email")?;
        Ok(())
    }
}

impl SenseConfig {
    /// Home MACs trimmed and lowercased for comparison.
    pub fn normalized_home_macs(&self) -> Vec<String> {
        self.home_macs
            .iter()
            .map(|mac| mac.trim().to_lowercase())
            .filter(|mac| !mac.is_empty())
            .collect()
    }
}

fn non_empty<'a>(value: &'a str, name: &str) -> Result<&'a str> {
    if value.trim().is_empty() {
        Err(DashOpsError::Config(format!("{name} is not set")))
    } else {
        Ok(value)
    }
}
