//! Recording notifier and scripted snapshot downloader.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use dashops_core::{Notifier, SnapshotDownloader};
use dashops_domain::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentMessage {
    Text(String),
    FileUrl { markdown: String, url: String },
    Upload { markdown: String, path: PathBuf, mime: String },
}

impl SentMessage {
    pub fn markdown(&self) -> &str {
        match self {
            Self::Text(markdown) => markdown,
            Self::FileUrl { markdown, .. } | Self::Upload { markdown, .. } => markdown,
        }
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentMessage>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent().iter().map(|m| m.markdown().to_string()).collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn post_message(&self, markdown: &str) -> Result<()> {
        self.sent.lock().unwrap().push(SentMessage::Text(markdown.to_string()));
        Ok(())
    }

    async fn post_file_url(&self, markdown: &str, url: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push(SentMessage::FileUrl { markdown: markdown.to_string(), url: url.to_string() });
        Ok(())
    }

    async fn send_file(&self, markdown: &str, path: &Path, mime: &str) -> Result<()> {
        self.sent.lock().unwrap().push(SentMessage::Upload {
            markdown: markdown.to_string(),
            path: path.to_path_buf(),
            mime: mime.to_string(),
        });
        Ok(())
    }
}

/// Answers downloads from a script; succeeds when the script is empty.
#[derive(Default)]
pub struct StubDownloader {
    script: Mutex<VecDeque<bool>>,
    requested: Mutex<Vec<(String, String)>>,
}

impl StubDownloader {
    pub fn failing() -> Self {
        let stub = Self::default();
        stub.script.lock().unwrap().extend([false; 8]);
        stub
    }

    pub fn requested(&self) -> Vec<(String, String)> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl SnapshotDownloader for StubDownloader {
    async fn download(&self, url: &str, name: &str) -> Option<PathBuf> {
        self.requested.lock().unwrap().push((url.to_string(), name.to_string()));
        let ok = self.script.lock().unwrap().pop_front().unwrap_or(true);
        ok.then(|| PathBuf::from(format!("{name}.jpg")))
    }
}
