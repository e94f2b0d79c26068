//! Conversions from external infrastructure errors into domain errors.

use dashops_domain::DashOpsError;
use reqwest::Error as HttpError;
use serde_json::Error as JsonError;
use std::io::{Error as IoError, ErrorKind};
use toml::de::Error as TomlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub DashOpsError);

impl From<InfraError> for DashOpsError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<DashOpsError> for InfraError {
    fn from(value: DashOpsError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoDashOpsError {
    fn into_dashops(self) -> DashOpsError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → DashOpsError */
/* -------------------------------------------------------------------------- */

impl IntoDashOpsError for HttpError {
    fn into_dashops(self) -> DashOpsError {
        if self.is_timeout() {
            return DashOpsError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return DashOpsError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return DashOpsError::Serialization(format!("invalid HTTP response body: {self}"));
        }

        if let Some(status) = self.status() {
            return DashOpsError::Api {
                status: status.as_u16(),
                body: status.canonical_reason().unwrap_or("unknown status").to_string(),
            };
        }

        DashOpsError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_dashops())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json / toml → DashOpsError */
/* -------------------------------------------------------------------------- */

impl IntoDashOpsError for JsonError {
    fn into_dashops(self) -> DashOpsError {
        DashOpsError::Serialization(format!(
            "invalid JSON at line {} column {}: {self}",
            self.line(),
            self.column()
        ))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_dashops())
    }
}

impl IntoDashOpsError for TomlError {
    fn into_dashops(self) -> DashOpsError {
        DashOpsError::Serialization(format!("invalid TOML: {}", self.message()))
    }
}

impl From<TomlError> for InfraError {
    fn from(value: TomlError) -> Self {
        InfraError(value.into_dashops())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → DashOpsError */
/* -------------------------------------------------------------------------- */

impl IntoDashOpsError for IoError {
    fn into_dashops(self) -> DashOpsError {
        match self.kind() {
            ErrorKind::NotFound => DashOpsError::NotFound(self.to_string()),
            _ => DashOpsError::Io(self.to_string()),
        }
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_dashops())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use reqwest::{Client, StatusCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn missing_file_maps_to_not_found() {
        let err = IoError::new(ErrorKind::NotFound, "demo_data.json");
        let mapped: DashOpsError = InfraError::from(err).into();
        assert!(matches!(mapped, DashOpsError::NotFound(msg) if msg.contains("demo_data")));
    }

    #[test]
    fn other_io_failures_map_to_io() {
        let err = IoError::new(ErrorKind::PermissionDenied, "read-only");
        let mapped: DashOpsError = InfraError::from(err).into();
        assert!(matches!(mapped, DashOpsError::Io(_)));
    }

    #[test]
    fn json_errors_keep_position() {
        let err = serde_json::from_str::<serde_json::Value>("{\n  \"a\": }").unwrap_err();
        let mapped: DashOpsError = InfraError::from(err).into();
        match mapped {
            DashOpsError::Serialization(msg) => assert!(msg.contains("line 2")),
            other => panic!("expected serialization error, got {other:?}"),
        }
    }

    #[test]
    fn toml_errors_map_to_serialization() {
        let err = toml::from_str::<toml::Value>("sites = [").unwrap_err();
        let mapped: DashOpsError = InfraError::from(err).into();
        assert!(matches!(mapped, DashOpsError::Serialization(msg) if msg.starts_with("invalid TOML")));
    }

    #[tokio::test]
    async fn http_status_errors_keep_the_status_code() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::UNAUTHORIZED))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: DashOpsError = InfraError::from(error).into();
        assert_eq!(mapped.api_status(), Some(401));
    }
}
