//! Configuration loading and management
//!
//! This module provides utilities for loading application configuration
//! from `.env`, environment variables and files, plus the demo inventory.

mod inventory;
pub mod loader;

// Re-export commonly used items
pub use inventory::load_inventory;
pub use loader::{apply_env, load, load_from_env, load_from_file, probe_config_paths};
