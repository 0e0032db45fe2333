//! Shared constants used across the application.

/// User agent string sent on outbound HTTP requests.
pub const USER_AGENT: &str = concat!("content-video-proxy/", env!("CARGO_PKG_VERSION"));

/// Smallest `maxResults` accepted by the video proxy.
pub const MIN_MAX_RESULTS: i64 = 1;

/// Largest `maxResults` accepted by the video proxy (provider page size limit).
pub const MAX_MAX_RESULTS: i64 = 50;

/// `maxResults` used when the caller does not supply one.
pub const DEFAULT_MAX_RESULTS: i64 = 10;

/// Base URL for watch links built from a video id.
pub const WATCH_URL_BASE: &str = "https://www.youtube.com/watch?v=";

/// Content type aliases as configured in the CMS.
pub mod content_types {
    pub const HOME: &str = "homePage";
    pub const NEWS_INDEX: &str = "news";
    pub const NEWS_ITEM: &str = "newsItem";
    pub const VIDEO_CHANNEL_INDEX: &str = "youtubeParentPage";
    pub const VIDEO_CHANNEL: &str = "youtubePage";
}
