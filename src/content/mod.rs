//! Content store access: query building, fetching, and typed page mapping.

mod client;
pub mod mapper;
mod models;
mod query;

pub use client::ContentClient;
pub use mapper::{
    AuthorReference, HomePage, Link, MediaReference, NewsIndexPage, NewsItemPage, PageModel,
    VideoChannelIndexPage, VideoChannelPage,
};
pub use models::{
    ContentItem, ContentResponse, ContentRoute, MediaItem, MediaResponse, PropertyBag, StartItem,
};
pub use query::{ContentQuery, MediaQuery, QueryRequest};
