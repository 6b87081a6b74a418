//! HTTP Transport
//!
//! Thin JSON-over-GET seam between the resolver and the network, so tests
//! can count and script provider calls without any real sockets.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::FeedError;

/// Fetches a provider endpoint and parses the body as JSON
#[async_trait]
pub trait PriceTransport: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<Value, FeedError>;
}

/// reqwest-backed transport with a bounded per-request timeout
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }
}

#[async_trait]
impl PriceTransport for HttpTransport {
    async fn get_json(&self, url: &str) -> Result<Value, FeedError> {
        let response = self.client.get(url).timeout(self.timeout).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::BadStatus(status));
        }

        Ok(response.json().await?)
    }
}
