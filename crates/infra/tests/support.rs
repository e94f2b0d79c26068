#![allow(dead_code)]

use std::time::Duration;

use dashops_infra::HttpClient;

pub const API_KEY: &str = "test-api-key";

/// HTTP client that retries quickly so failure paths stay fast.
pub fn fast_http() -> HttpClient {
    HttpClient::builder()
        .timeout(Duration::from_secs(5))
        .base_backoff(Duration::from_millis(5))
        .max_attempts(2)
        .build()
        .expect("http client should build")
}
