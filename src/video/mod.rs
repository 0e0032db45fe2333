//! YouTube video proxy: allow-listed channels, normalized summaries, TTL cache.

mod cache;
mod channels;
mod models;
mod normalize;
mod provider;
mod service;

pub use cache::{CacheStatus, ResponseCache};
pub use channels::{ChannelRegistry, ContentChannelRegistry, StaticChannelRegistry};
pub use models::{PageInfo, SearchResponse, VideoListResponse, VideoSummary};
pub use normalize::{best_thumbnail, normalize, summarize, watch_url};
pub use provider::{VideoProvider, YouTubeClient};
pub use service::{CacheKey, VideoProxyService};
