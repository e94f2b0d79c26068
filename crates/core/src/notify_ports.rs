//! Port interface for outbound chat notifications

use std::path::Path;

use async_trait::async_trait;
use dashops_domain::Result;

/// Direct messages to the configured recipient.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Markdown-only message.
    async fn post_message(&self, markdown: &str) -> Result<()>;

    /// Message with a remote file attached by URL.
    async fn post_file_url(&self, markdown: &str, url: &str) -> Result<()>;

    /// Message with a local file uploaded as multipart.
    async fn send_file(&self, markdown: &str, path: &Path, mime: &str) -> Result<()>;
}
