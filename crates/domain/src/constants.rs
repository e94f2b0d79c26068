//! Application constants
//!
//! Centralized location for domain-level constants used throughout the
//! application.

// Remote endpoints
pub const DASHBOARD_API_BASE_URL: &str = "https://api.meraki.com/api/v0";
pub const DASHBOARD_API_KEY_HEADER: &str = "X-Cisco-Meraki-API-Key";
pub const WEBEX_API_BASE_URL: &str = "https://api.ciscospark.com/v1";

// Reporting thresholds
pub const STATUS_LOSS_THRESHOLD: f64 = 7.0;
pub const STATUS_LATENCY_THRESHOLD_MS: f64 = 240.0;
pub const PERF_LOSS_THRESHOLD: f64 = 7.0;
pub const PERF_LATENCY_THRESHOLD_MS: f64 = 49.0;
/// Device names are listed in a status group only up to this size
pub const STATUS_LIST_LIMIT: usize = 10;
/// Organization id reserved for the vendor's own org; skipped in reports
pub const VENDOR_ORG_ID: &str = "1";
/// Samples per uplink probe window used by the perf average
pub const PERF_SAMPLES_PER_PROBE: f64 = 5.0;

// Demo workflow
pub const DEMO_NETWORK_TYPE: &str = "appliance switch wireless camera";
pub const DEMO_BASE_NETWORK_NAME: &str = "Demo - ISP";
pub const DEMO_LOCATION_PREFIX: &str = "Demo ";
pub const DEMO_SSID_NAME: &str = "Code🐵get⬆get☕";
pub const DEMO_FILLER_TAGS: [&str; 6] = ["foo", "bar", "foobar", "spam", "ham", "eggs"];
pub const DEMO_DNS_SERVERS: [&str; 2] = ["208.67.220.220", "208.67.222.222"];
pub const DEMO_BLINK_SECONDS: u32 = 120;
/// Largest site number whose derived VLAN ids (`{N}1`..`{N}3`) still fit an
/// IPv4 octet
pub const MAX_SITE_NUMBER: u32 = 25;

// Artifact file names
pub const STATE_FILE_NAME: &str = "demo_data.json";
pub const CREATE_NETWORKS_FILE: &str = "create_networks.json";
pub const CREATE_DEVICES_FILE: &str = "create_devices.json";
pub const CREATE_SETTINGS_PREFIX: &str = "create_settings_";
pub const SNAPSHOT_FILE_PREFIX: &str = "demo";

// Scanning receiver
pub const SCANNING_LOG_RETENTION: usize = 100;
pub const SCANNING_LOG_TIME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
pub const HOME_PRESENCE_WINDOW_MINUTES: i64 = 5;

// Snapshot download
pub const SNAPSHOT_DOWNLOAD_ATTEMPTS: u32 = 10;
pub const SNAPSHOT_DOWNLOAD_INTERVAL_SECS: u64 = 1;
pub const SNAPSHOT_UPLOAD_WAIT_SECS: u64 = 9;
