//! Webex messaging integration
//!
//! Sends direct messages to one configured person through the `/messages`
//! endpoint. Plain and URL-attached messages go out as JSON; local files are
//! uploaded as `multipart/form-data`.
//!
//! ```no_run
//! use dashops_core::Notifier;
//! use dashops_infra::http::HttpClient;
//! use dashops_infra::integrations::WebexClient;
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = WebexClient::new("token", "ada@example.com", HttpClient::new()?);
//! client.post_message("**hello**").await?;
//! # Ok(())
//! # }
//! ```

mod client;

pub use client::WebexClient;
