use dashops_domain::constants::{DASHBOARD_API_BASE_URL, DASHBOARD_API_KEY_HEADER};
use dashops_domain::{DashOpsError, MerakiConfig, Result};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::InfraError;
use crate::http::HttpClient;

/// Outcome of one dashboard call: `ok` for 2xx, `data` is the raw body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub ok: bool,
    pub status: u16,
    pub data: String,
}

impl ApiResponse {
    /// Non-2xx answers become `DashOpsError::Api` carrying the body verbatim.
    pub fn into_result(self) -> Result<Self> {
        if self.ok {
            Ok(self)
        } else {
            Err(DashOpsError::Api { status: self.status, body: self.data })
        }
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.data).map_err(|err| DashOpsError::from(InfraError::from(err)))
    }
}

/// Dashboard API client authenticated with an API key.
#[derive(Clone)]
pub struct MerakiClient {
    http: HttpClient,
    api_key: String,
    base_url: String,
}

impl MerakiClient {
    pub fn new(api_key: impl Into<String>, http: HttpClient) -> Self {
        Self { http, api_key: api_key.into(), base_url: DASHBOARD_API_BASE_URL.to_string() }
    }

    /// Build a client from configuration.
    ///
    /// # Errors
    /// `DashOpsError::Config` when no API key is configured.
    pub fn from_config(config: &MerakiConfig) -> Result<Self> {
        let api_key = config.require_api_key()?;
        Ok(Self::new(api_key, HttpClient::new()?).with_base_url(&config.base_url))
    }

    /// Point the client at another base URL (tests, regional shards).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform one call against `resource` (a path such as
    /// `/organizations`), with an optional JSON body.
    ///
    /// # Errors
    /// Only transport failures; HTTP error statuses are reported through
    /// [`ApiResponse::ok`].
    pub async fn call(&self, method: Method, resource: &str, body: Option<&Value>) -> Result<ApiResponse> {
        self.execute(method, resource, &[], body).await
    }

    async fn execute(
        &self,
        method: Method,
        resource: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<ApiResponse> {
        let url = format!("{}{resource}", self.base_url);
        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(DASHBOARD_API_KEY_HEADER, &self.api_key);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = self.http.send(request).await?;
        let status = response.status();
        let data = response.text().await.map_err(|err| DashOpsError::from(InfraError::from(err)))?;

        if status.is_success() {
            debug!(%method, resource, status = status.as_u16(), "dashboard call succeeded");
        } else {
            warn!(%method, resource, status = status.as_u16(), "dashboard call failed");
        }
        Ok(ApiResponse { ok: status.is_success(), status: status.as_u16(), data })
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, resource: &str) -> Result<T> {
        self.get_with_query(resource, &[]).await
    }

    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        self.execute(Method::GET, resource, query, None).await?.into_result()?.json()
    }

    pub(crate) async fn send_json<B, T>(&self, method: Method, resource: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = to_value(body)?;
        self.call(method, resource, Some(&body)).await?.into_result()?.json()
    }

    /// Like [`Self::send_json`] for endpoints whose answer is not needed.
    pub(crate) async fn send_unit<B>(&self, method: Method, resource: &str, body: Option<&B>) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let body = body.map(to_value).transpose()?;
        self.call(method, resource, body.as_ref()).await?.into_result().map(|_| ())
    }
}

fn to_value<B: Serialize + ?Sized>(body: &B) -> Result<Value> {
    serde_json::to_value(body).map_err(|err| DashOpsError::from(InfraError::from(err)))
}
