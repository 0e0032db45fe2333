//! Client for the external video provider (YouTube Data API v3).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, info};

use super::models::SearchResponse;
use crate::config::Config;
use crate::constants::USER_AGENT;
use crate::error::{Error, Result};

/// Source of channel video listings.
#[async_trait]
pub trait VideoProvider: Send + Sync {
    /// The most recent `max_results` videos of a channel, newest first.
    async fn latest_videos(&self, channel_id: &str, max_results: u32) -> Result<SearchResponse>;
}

/// YouTube search endpoint client. Holds the API key; nothing it returns
/// contains the key.
#[derive(Clone)]
pub struct YouTubeClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for YouTubeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTubeClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl YouTubeClient {
    /// Create a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: &str, api_key: String, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(Error::from_reqwest)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Create a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.youtube_api_url,
            config.google_api_key.clone(),
            config.http_timeout,
        )
    }
}

#[async_trait]
impl VideoProvider for YouTubeClient {
    async fn latest_videos(&self, channel_id: &str, max_results: u32) -> Result<SearchResponse> {
        let url = format!("{}/search", self.base_url);
        info!(channel_id = %channel_id, max_results, "Fetching channel videos from provider");

        let max_results = max_results.to_string();
        let response = self
            .http
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("channelId", channel_id),
                ("maxResults", max_results.as_str()),
                ("order", "date"),
                ("type", "video"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                let err = Error::from_reqwest(e);
                error!(channel_id = %channel_id, error = %err, "Video provider request failed");
                err
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(
                channel_id = %channel_id,
                status = status.as_u16(),
                reason = status.canonical_reason().unwrap_or(""),
                "Video provider returned error status"
            );
            return Err(Error::from_status(status));
        }

        let body = response.text().await.map_err(Error::from_reqwest)?;
        let parsed: SearchResponse = serde_json::from_str(&body).map_err(|e| {
            error!(channel_id = %channel_id, error = %e, "Failed to decode video provider response");
            Error::Decode(e.to_string())
        })?;

        debug!(channel_id = %channel_id, items = parsed.items.len(), "Video provider response received");
        Ok(parsed)
    }
}
