//! # dashops Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The HTTP client with retry and timeout support
//! - Dashboard API and Webex clients
//! - File-backed state, artifact and scanning log stores
//! - The scanning API receiver (axum)
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `dashops-core`
//! - Contains all "impure" code (network and filesystem I/O)

pub mod config;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod scanning;
pub mod storage;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use integrations::{ApiResponse, MerakiClient, WebexClient};
pub use scanning::{router as scanning_router, serve as serve_scanning, ScanningState};
pub use storage::{FileArtifactStore, FileScanLogs, HttpSnapshotDownloader, JsonStateStore};
