//! Meraki dashboard API client
//!
//! [`MerakiClient::call`] is the raw `(ok, data)` layer; the typed endpoint
//! wrappers behind [`DashboardApi`] and [`ActionBatchApi`] turn non-2xx
//! answers into [`DashOpsError::Api`].
//!
//! [`DashboardApi`]: dashops_core::DashboardApi
//! [`ActionBatchApi`]: dashops_core::ActionBatchApi
//! [`DashOpsError::Api`]: dashops_domain::DashOpsError::Api

mod client;
mod endpoints;

pub use client::{ApiResponse, MerakiClient};
