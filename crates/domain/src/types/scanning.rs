//! Scanning API webhook payloads

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body pushed by the dashboard to a scanning receiver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanningPayload {
    #[serde(default)]
    pub secret: String,
    #[serde(default, rename = "type")]
    pub payload_type: String,
    #[serde(default)]
    pub version: String,
    pub data: ScanningData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanningData {
    #[serde(default)]
    pub observations: Vec<Observation>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One client sighting; only the MAC is interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub client_mac: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Radio that produced a scanning payload; names the stored log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanKind {
    Bluetooth,
    WiFi,
}

impl ScanKind {
    /// `BluetoothDevicesSeen` is Bluetooth; every other type is Wi-Fi.
    pub fn from_payload_type(payload_type: &str) -> Self {
        if payload_type == "BluetoothDevicesSeen" {
            Self::Bluetooth
        } else {
            Self::WiFi
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Bluetooth => "Bluetooth",
            Self::WiFi => "WiFi",
        }
    }
}

impl ScanningPayload {
    /// Lowercased client MACs of every observation.
    pub fn client_macs(&self) -> impl Iterator<Item = String> + '_ {
        self.data.observations.iter().map(|o| o.client_mac.to_lowercase())
    }
}
