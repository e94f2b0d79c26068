//! Chat message payloads

use serde::{Deserialize, Serialize};

/// Direct message to one person; `file` is a remote URL to attach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub to_person_email: String,
    pub markdown: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl ChatMessage {
    pub fn markdown(to: impl Into<String>, markdown: impl Into<String>) -> Self {
        Self { to_person_email: to.into(), markdown: markdown.into(), file: None }
    }

    pub fn with_file(mut self, url: impl Into<String>) -> Self {
        self.file = Some(url.into());
        self
    }
}
