//! Shared test helpers for `dashops-core` integration tests.
//!
//! In-memory implementations of every core port, recording the calls made
//! against them so tests can assert on behaviour instead of wiring.

#![allow(dead_code)]

pub mod dashboard;
pub mod notifier;
pub mod stores;

pub use dashboard::{api_error, network, Fixture, MockDashboard};
pub use notifier::{RecordingNotifier, SentMessage, StubDownloader};
pub use stores::{FixedPicker, MemoryArtifacts, MemoryScanLogs, MemoryStateStore};
