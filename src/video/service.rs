//! Channel video lookups: validation, allow-listing, caching, normalization.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use super::cache::{CacheStatus, ResponseCache};
use super::channels::ChannelRegistry;
use super::models::VideoListResponse;
use super::normalize::normalize;
use super::provider::VideoProvider;
use crate::constants::{MAX_MAX_RESULTS, MIN_MAX_RESULTS};
use crate::error::{Error, Result};

/// Cache key: one entry per channel and page size.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub channel_ref: String,
    pub max_results: u32,
}

pub struct VideoProxyService {
    provider: Arc<dyn VideoProvider>,
    channels: Arc<dyn ChannelRegistry>,
    cache: ResponseCache<CacheKey, VideoListResponse>,
}

impl VideoProxyService {
    #[must_use]
    pub fn new(
        provider: Arc<dyn VideoProvider>,
        channels: Arc<dyn ChannelRegistry>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            provider,
            channels,
            cache: ResponseCache::new(cache_ttl),
        }
    }

    /// Latest videos for a configured channel.
    ///
    /// Checks run in order: `max_results` range, non-empty channel, channel
    /// configured. Nothing goes upstream until all three pass.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] for an out-of-range `max_results` or an
    ///   empty channel reference
    /// - [`Error::NotConfigured`] for a channel the registry does not list
    /// - [`Error::Transport`] / [`Error::Upstream`] / [`Error::Decode`] from
    ///   the registry or the provider
    pub async fn get_channel_videos(
        &self,
        channel_ref: &str,
        max_results: i64,
    ) -> Result<VideoListResponse> {
        let max_results = validate_max_results(max_results)?;

        let channel_ref = channel_ref.trim();
        if channel_ref.is_empty() {
            return Err(Error::InvalidArgument("Channel ID is required".to_string()));
        }

        if !self.channels.is_configured(channel_ref).await? {
            info!(channel_id = %channel_ref, "Rejected request for unconfigured channel");
            return Err(Error::NotConfigured("Channel ID wasn't found".to_string()));
        }

        let key = CacheKey {
            channel_ref: channel_ref.to_string(),
            max_results,
        };

        let (response, status) = self
            .cache
            .get_or_try_insert_with(key, move || async move {
                let search = self.provider.latest_videos(channel_ref, max_results).await?;
                Ok::<_, Error>(normalize(search, max_results as usize))
            })
            .await?;

        match status {
            CacheStatus::Hit => debug!(channel_id = %channel_ref, max_results, "Video cache hit"),
            CacheStatus::Miss => info!(
                channel_id = %channel_ref,
                max_results,
                videos = response.videos.len(),
                "Fetched and cached channel videos"
            ),
        }

        Ok(response)
    }

    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        self.cache.ttl()
    }
}

fn validate_max_results(max_results: i64) -> Result<u32> {
    if !(MIN_MAX_RESULTS..=MAX_MAX_RESULTS).contains(&max_results) {
        return Err(Error::InvalidArgument(format!(
            "maxResults must be between {MIN_MAX_RESULTS} and {MAX_MAX_RESULTS}"
        )));
    }
    u32::try_from(max_results)
        .map_err(|_| Error::InvalidArgument("maxResults is out of range".to_string()))
}
