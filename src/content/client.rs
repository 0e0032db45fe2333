//! HTTP client for the headless CMS delivery API.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::mapper::MediaReference;
use super::models::{ContentItem, ContentResponse, MediaItem, MediaResponse};
use super::query::{ContentQuery, MediaQuery};
use crate::config::Config;
use crate::constants::USER_AGENT;
use crate::error::{Error, Result};

/// Client for the content store's list and item endpoints.
///
/// No retries happen here; failures propagate to the caller immediately.
#[derive(Debug, Clone)]
pub struct ContentClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl ContentClient {
    /// Create a client for the delivery API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
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
            &config.content_api_url,
            config.content_api_key.clone(),
            config.http_timeout,
        )
    }

    /// Run a list query.
    ///
    /// An empty result is an error: every caller expects at least one item.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when `total` is zero or `items` is empty,
    /// [`Error::InvalidArgument`] for an unbuildable query, and
    /// [`Error::Transport`] / [`Error::Upstream`] for HTTP failures.
    pub async fn query(&self, query: &ContentQuery) -> Result<ContentResponse> {
        let request = query.build()?;
        let response: ContentResponse = self.get_json(&request.path, &request.params).await?;

        if response.total == 0 || response.items.is_empty() {
            debug!(path = %request.path, filter = ?request.filter(), "Content query returned no items");
            return Err(Error::NotFound);
        }

        Ok(response)
    }

    /// Fetch the first item of a content type.
    ///
    /// # Errors
    ///
    /// See [`ContentClient::query`].
    pub async fn first_of_type(&self, content_type: &str) -> Result<ContentItem> {
        let response = self.query(&ContentQuery::by_type(content_type)).await?;
        response.items.into_iter().next().ok_or(Error::NotFound)
    }

    /// Fetch a single item by id or route path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the store answers 404, otherwise the
    /// same failures as [`ContentClient::query`].
    pub async fn fetch_item(&self, id_or_path: &str) -> Result<ContentItem> {
        if id_or_path.trim().is_empty() {
            return Err(Error::InvalidArgument("id or path is required".to_string()));
        }
        let path = format!("/content/item/{}", urlencoding::encode(id_or_path));
        match self.get_json(&path, &[]).await {
            Err(Error::Upstream { status: 404, .. }) => Err(Error::NotFound),
            other => other,
        }
    }

    /// Run a media list query.
    ///
    /// An empty media library is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for an unbuildable query and
    /// [`Error::Transport`] / [`Error::Upstream`] for HTTP failures.
    pub async fn query_media(&self, query: &MediaQuery) -> Result<MediaResponse> {
        let request = query.build()?;
        self.get_json(&request.path, &request.params).await
    }

    /// Fetch one media item by id. `None` if the store does not know it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for an empty id, otherwise the
    /// same HTTP failures as [`ContentClient::query_media`].
    pub async fn fetch_media(&self, id: &str) -> Result<Option<MediaReference>> {
        if id.trim().is_empty() {
            return Err(Error::InvalidArgument("media id is required".to_string()));
        }
        let path = format!("/media/item/{}", urlencoding::encode(id));
        match self.get_json::<MediaItem>(&path, &[]).await {
            Ok(item) => Ok(Some(MediaReference::from(&item))),
            Err(Error::Upstream { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T> {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, params = ?params, "Content store request");

        let mut request = self.http.get(&url).query(params);
        if let Some(key) = &self.api_key {
            request = request.header("Api-Key", key);
        }

        let response = request.send().await.map_err(|e| {
            let err = Error::from_reqwest(e);
            warn!(url = %url, error = %err, "Content store request failed");
            err
        })?;

        let status = response.status();
        if !status.is_success() {
            if status != StatusCode::NOT_FOUND {
                warn!(url = %url, status = %status, "Content store returned error status");
            }
            return Err(Error::from_status(status));
        }

        let body = response.text().await.map_err(Error::from_reqwest)?;
        serde_json::from_str(&body).map_err(|e| {
            warn!(url = %url, error = %e, "Failed to decode content store response");
            Error::Decode(e.to_string())
        })
    }
}
