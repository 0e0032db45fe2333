//! Which channels the proxy is allowed to serve.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::cache::{CacheStatus, ResponseCache};
use crate::content::ContentClient;
use crate::error::{Error, Result};
use crate::loader::{DependentPage, VideoChannelIndexSource};

/// System of record for configured channel identifiers.
#[async_trait]
pub trait ChannelRegistry: Send + Sync {
    /// All configured channel ids.
    async fn configured_channels(&self) -> Result<Vec<String>>;

    /// Whether `channel_id` is among the configured channels.
    async fn is_configured(&self, channel_id: &str) -> Result<bool> {
        Ok(self
            .configured_channels()
            .await?
            .iter()
            .any(|configured| configured == channel_id))
    }
}

/// Reads channel ids from the channel pages under the video index page.
///
/// The list is kept for `ttl`, so a channel added in the CMS becomes servable
/// once that short window has passed. A zero `ttl` reads the CMS every time.
/// When a refresh fails the last list read successfully is used instead, and
/// the error only surfaces if there has never been one.
#[derive(Debug)]
pub struct ContentChannelRegistry {
    source: VideoChannelIndexSource,
    cache: ResponseCache<(), Vec<String>>,
    last_known: RwLock<Option<Vec<String>>>,
}

impl ContentChannelRegistry {
    #[must_use]
    pub fn new(client: ContentClient, ttl: Duration) -> Self {
        Self {
            source: VideoChannelIndexSource::new(client),
            cache: ResponseCache::new(ttl),
            last_known: RwLock::new(None),
        }
    }

    async fn refresh(&self) -> Result<Vec<String>> {
        match self.fetch_channels().await {
            Ok(channels) => {
                *self.last_known.write().await = Some(channels.clone());
                Ok(channels)
            }
            Err(e) => match self.last_known.read().await.clone() {
                Some(channels) => {
                    warn!(error = %e, "Channel list refresh failed; using last known list");
                    Ok(channels)
                }
                None => Err(e),
            },
        }
    }

    async fn fetch_channels(&self) -> Result<Vec<String>> {
        let parent = match self.source.fetch_page().await {
            Ok(outcome) => outcome,
            Err(Error::NotFound) => {
                debug!("No video channel index page; no channels configured");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };
        let Some(parent_id) = parent.children_of else {
            return Ok(Vec::new());
        };

        let pages = match self.source.fetch_children(&parent_id).await {
            Ok(pages) => pages,
            Err(Error::NotFound) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        Ok(pages
            .into_iter()
            .filter_map(|page| page.channel_id)
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect())
    }
}

#[async_trait]
impl ChannelRegistry for ContentChannelRegistry {
    async fn configured_channels(&self) -> Result<Vec<String>> {
        let (channels, status) = self
            .cache
            .get_or_try_insert_with((), || self.refresh())
            .await?;
        if status == CacheStatus::Miss {
            debug!(channels = channels.len(), "Refreshed configured channel list");
        }
        Ok(channels)
    }
}

/// Fixed channel list, for tests and static deployments.
#[derive(Debug, Clone, Default)]
pub struct StaticChannelRegistry {
    channels: Vec<String>,
}

impl StaticChannelRegistry {
    pub fn new<I, S>(channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            channels: channels.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl ChannelRegistry for StaticChannelRegistry {
    async fn configured_channels(&self) -> Result<Vec<String>> {
        Ok(self.channels.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_registry_membership() {
        let registry = StaticChannelRegistry::new(["UC1", "UC2"]);
        assert!(registry.is_configured("UC1").await.unwrap());
        assert!(!registry.is_configured("UC3").await.unwrap());
        assert!(!registry.is_configured("").await.unwrap());
    }

    #[tokio::test]
    async fn test_channel_match_is_exact() {
        let registry = StaticChannelRegistry::new(["UCabc"]);
        assert!(!registry.is_configured("ucabc").await.unwrap());
        assert!(!registry.is_configured("UCab").await.unwrap());
    }
}
