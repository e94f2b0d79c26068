//! # dashops Domain
//!
//! Business domain types and models for dashops.
//!
//! This crate contains:
//! - Dashboard and messaging wire types (requests, responses)
//! - Action batch and provisioning progress models
//! - Domain error types and Result definitions
//! - Configuration structures
//!
//! ## Architecture
//! - No dependencies on other dashops crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
