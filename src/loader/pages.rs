//! Page sources backed by the content store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::composed::{DependentPage, NoChildren, ParentOutcome};
use crate::constants::content_types;
use crate::content::{
    ContentClient, ContentQuery, HomePage, NewsIndexPage, NewsItemPage, VideoChannelIndexPage,
    VideoChannelPage,
};
use crate::error::{Error, Result};

/// The site home page. Single stage.
#[derive(Debug, Clone)]
pub struct HomePageSource {
    client: ContentClient,
}

impl HomePageSource {
    #[must_use]
    pub fn new(client: ContentClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DependentPage for HomePageSource {
    type Page = HomePage;
    type Child = NoChildren;

    async fn fetch_page(&self) -> Result<ParentOutcome<HomePage>> {
        let item = self.client.first_of_type(content_types::HOME).await?;
        Ok(ParentOutcome::standalone(HomePage::from_properties(
            &item.properties,
        )))
    }
}

/// The news index page and the news items published under it.
#[derive(Debug, Clone)]
pub struct NewsIndexSource {
    client: ContentClient,
    take: Option<u32>,
    published_before: Option<DateTime<Utc>>,
}

impl NewsIndexSource {
    #[must_use]
    pub fn new(client: ContentClient) -> Self {
        Self {
            client,
            take: None,
            published_before: None,
        }
    }

    /// Cap the number of news items fetched.
    #[must_use]
    pub fn take(mut self, take: u32) -> Self {
        self.take = Some(take);
        self
    }

    /// Only include items published before `cutoff` instead of now.
    #[must_use]
    pub fn published_before(mut self, cutoff: DateTime<Utc>) -> Self {
        self.published_before = Some(cutoff);
        self
    }
}

#[async_trait]
impl DependentPage for NewsIndexSource {
    type Page = NewsIndexPage;
    type Child = NewsItemPage;

    async fn fetch_page(&self) -> Result<ParentOutcome<NewsIndexPage>> {
        let item = self.client.first_of_type(content_types::NEWS_INDEX).await?;
        Ok(ParentOutcome::with_children(
            NewsIndexPage::from_properties(&item.properties),
            item.id,
        ))
    }

    async fn fetch_children(&self, parent_id: &str) -> Result<Vec<NewsItemPage>> {
        let mut query =
            ContentQuery::children_of(parent_id).with_content_type(content_types::NEWS_ITEM);
        if let Some(take) = self.take {
            query = query.take(take);
        }
        if let Some(cutoff) = self.published_before {
            query = query.published_before(cutoff);
        }

        let response = self.client.query(&query).await?;
        Ok(response.items.iter().map(NewsItemPage::from_item).collect())
    }
}

/// A single news item, looked up by id or route path. Single stage.
#[derive(Debug, Clone)]
pub struct NewsItemSource {
    client: ContentClient,
    id_or_path: String,
}

impl NewsItemSource {
    #[must_use]
    pub fn new(client: ContentClient, id_or_path: impl Into<String>) -> Self {
        Self {
            client,
            id_or_path: id_or_path.into(),
        }
    }
}

#[async_trait]
impl DependentPage for NewsItemSource {
    type Page = NewsItemPage;
    type Child = NoChildren;

    async fn fetch_page(&self) -> Result<ParentOutcome<NewsItemPage>> {
        let item = self.client.fetch_item(&self.id_or_path).await?;
        if item.content_type != content_types::NEWS_ITEM {
            return Err(Error::NotFound);
        }
        Ok(ParentOutcome::standalone(NewsItemPage::from_item(&item)))
    }
}

/// The video channel index page and the channel pages under it.
#[derive(Debug, Clone)]
pub struct VideoChannelIndexSource {
    client: ContentClient,
}

impl VideoChannelIndexSource {
    #[must_use]
    pub fn new(client: ContentClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DependentPage for VideoChannelIndexSource {
    type Page = VideoChannelIndexPage;
    type Child = VideoChannelPage;

    async fn fetch_page(&self) -> Result<ParentOutcome<VideoChannelIndexPage>> {
        let item = self
            .client
            .first_of_type(content_types::VIDEO_CHANNEL_INDEX)
            .await?;
        Ok(ParentOutcome::with_children(
            VideoChannelIndexPage::from_properties(&item.properties),
            item.id,
        ))
    }

    async fn fetch_children(&self, parent_id: &str) -> Result<Vec<VideoChannelPage>> {
        let query =
            ContentQuery::children_of(parent_id).with_content_type(content_types::VIDEO_CHANNEL);
        let response = self.client.query(&query).await?;
        Ok(response.items.iter().map(VideoChannelPage::from_item).collect())
    }
}
