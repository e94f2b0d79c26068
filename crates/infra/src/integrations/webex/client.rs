use std::path::Path;

use async_trait::async_trait;
use dashops_core::Notifier;
use dashops_domain::constants::WEBEX_API_BASE_URL;
use dashops_domain::{ChatMessage, DashOpsError, Result, WebexConfig};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, Response};
use tracing::{debug, instrument, warn};

use crate::errors::InfraError;
use crate::http::HttpClient;

/// Bot-token client that messages a single recipient.
#[derive(Clone)]
pub struct WebexClient {
    http: HttpClient,
    token: String,
    email: String,
    base_url: String,
}

impl WebexClient {
    pub fn new(token: impl Into<String>, email: impl Into<String>, http: HttpClient) -> Self {
        Self {
            http,
            token: token.into(),
            email: email.into(),
            base_url: WEBEX_API_BASE_URL.to_string(),
        }
    }

    /// # Errors
    /// `DashOpsError::Config` when the token or recipient is missing.
    pub fn from_config(config: &WebexConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(&config.token, &config.email, HttpClient::new()?)
            .with_base_url(&config.base_url))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn recipient(&self) -> &str {
        &self.email
    }

    fn messages_url(&self) -> String {
        format!("{}/messages", self.base_url)
    }

    async fn post_json(&self, message: &ChatMessage) -> Result<()> {
        let request = self
            .http
            .request(Method::POST, self.messages_url())
            .bearer_auth(&self.token)
            .json(message);
        let response = self.http.send(request).await?;
        check_status(response).await
    }
}

async fn check_status(response: Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        debug!(status = status.as_u16(), "message delivered");
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    warn!(status = status.as_u16(), "message rejected");
    Err(DashOpsError::Api { status: status.as_u16(), body })
}

#[async_trait]
impl Notifier for WebexClient {
    async fn post_message(&self, markdown: &str) -> Result<()> {
        self.post_json(&ChatMessage::markdown(&self.email, markdown)).await
    }

    async fn post_file_url(&self, markdown: &str, url: &str) -> Result<()> {
        self.post_json(&ChatMessage::markdown(&self.email, markdown).with_file(url)).await
    }

    #[instrument(skip(self, markdown), fields(path = %path.display()))]
    async fn send_file(&self, markdown: &str, path: &Path, mime: &str) -> Result<()> {
        let bytes = tokio::fs::read(path).await.map_err(|err| DashOpsError::from(InfraError::from(err)))?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_string(), |name| name.to_string_lossy().into_owned());
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime)
            .map_err(|err| DashOpsError::from(InfraError::from(err)))?;
        let form = Form::new()
            .text("toPersonEmail", self.email.clone())
            .text("markdown", markdown.to_string())
            .part("files", part);

        let request = self
            .http
            .request(Method::POST, self.messages_url())
            .bearer_auth(&self.token)
            .multipart(form);
        let response = self.http.send_once(request).await?;
        check_status(response).await
    }
}
