//! Scanning API webhook receiver
//!
//! `GET /` answers the validator string the dashboard checks when the
//! receiver is registered. `POST /` accepts Bluetooth and Wi-Fi observation
//! pushes, checks the shared secret and stores each payload through
//! [`FileScanLogs`]; the motion alert later reads them back to decide
//! whether someone is home.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use dashops_domain::{DashOpsError, Result, ScanKind, ScanningPayload, SenseConfig};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::storage::FileScanLogs;

/// Shared state of the receiver routes.
#[derive(Clone)]
pub struct ScanningState {
    validator: String,
    secret: String,
    logs: Arc<Mutex<FileScanLogs>>,
}

impl ScanningState {
    pub fn new(validator: impl Into<String>, secret: impl Into<String>, logs: FileScanLogs) -> Self {
        Self { validator: validator.into(), secret: secret.into(), logs: Arc::new(Mutex::new(logs)) }
    }

    pub fn from_config(config: &SenseConfig) -> Self {
        Self::new(&config.validator, &config.secret, FileScanLogs::new(&config.log_dir))
    }
}

/// Routes of the receiver, mounted at `/`.
pub fn router(state: ScanningState) -> Router {
    Router::new().route("/", get(validate).post(receive)).with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
///
/// # Errors
/// `DashOpsError::Network` when the address cannot be bound or the server
/// fails.
pub async fn serve(addr: SocketAddr, state: ScanningState) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|err| DashOpsError::Network(format!("failed to bind scanning receiver on {addr}: {err}")))?;
    info!(%addr, "scanning receiver listening");
    axum::serve(listener, router(state))
        .await
        .map_err(|err| DashOpsError::Network(format!("scanning receiver stopped: {err}")))
}

async fn validate(State(state): State<ScanningState>) -> String {
    info!("validator requested");
    state.validator.clone()
}

async fn receive(State(state): State<ScanningState>, body: Bytes) -> (StatusCode, &'static str) {
    let raw = match serde_json::from_slice::<Value>(&body) {
        Ok(raw) if raw.get("data").is_some() => raw,
        _ => {
            warn!("scanning POST without usable data");
            return (StatusCode::BAD_REQUEST, "invalid data");
        }
    };
    let payload: ScanningPayload = match serde_json::from_value(raw.clone()) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(error = %err, "scanning POST did not match the payload layout");
            return (StatusCode::BAD_REQUEST, "invalid data");
        }
    };
    if payload.secret != state.secret {
        warn!("scanning POST with wrong secret");
        return (StatusCode::FORBIDDEN, "invalid secret");
    }

    let kind = ScanKind::from_payload_type(&payload.payload_type);
    let observations = payload.data.observations.len();
    let logs = state.logs.lock().await;
    match logs.write(kind, &raw).await {
        Ok(path) => {
            info!(kind = kind.label(), observations, path = %path.display(), "scanning payload received");
            (StatusCode::OK, "Scanning API POST received")
        }
        Err(err) => {
            error!(error = %err, "scanning payload could not be stored");
            (StatusCode::INTERNAL_SERVER_ERROR, "could not store payload")
        }
    }
}
