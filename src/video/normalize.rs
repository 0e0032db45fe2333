//! Turning raw provider search items into [`VideoSummary`] values.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;

use super::models::{SearchResponse, VideoListResponse, VideoSummary};
use crate::constants::WATCH_URL_BASE;
use crate::error::PartialItemError;

/// Thumbnail sizes, best first.
const THUMBNAIL_PRIORITY: [&str; 4] = ["maxres", "high", "medium", "default"];

const NO_TITLE: &str = "No title";
const NO_DESCRIPTION: &str = "No description";

/// Pick the highest-resolution thumbnail URL present.
#[must_use]
pub fn best_thumbnail(thumbnails: Option<&Value>) -> String {
    let Some(thumbnails) = thumbnails.and_then(Value::as_object) else {
        return String::new();
    };
    THUMBNAIL_PRIORITY
        .iter()
        .filter_map(|size| thumbnails.get(*size))
        .filter_map(|thumb| thumb.get("url").and_then(Value::as_str))
        .find(|url| !url.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Watch page URL for a video id.
#[must_use]
pub fn watch_url(video_id: &str) -> String {
    format!("{WATCH_URL_BASE}{video_id}")
}

/// Summarize one search item.
///
/// # Errors
///
/// Fails when the item carries no video id or no snippet. An absent or null
/// title or description falls back to a placeholder; an empty string is kept.
pub fn summarize(item: &Value) -> Result<(VideoSummary, Option<DateTime<Utc>>), PartialItemError> {
    let item = item.as_object().ok_or(PartialItemError::Malformed)?;

    let video_id = item
        .get("id")
        .and_then(|id| id.get("videoId"))
        .and_then(Value::as_str)
        .filter(|id| !id.trim().is_empty())
        .ok_or(PartialItemError::MissingVideoId)?;

    let snippet = item
        .get("snippet")
        .and_then(Value::as_object)
        .ok_or(PartialItemError::MissingSnippet)?;

    let text = |key: &str, fallback: &str| {
        snippet
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or(fallback)
            .to_string()
    };

    let published_at = snippet
        .get("publishedAt")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|d| d.with_timezone(&Utc));

    let summary = VideoSummary {
        video_id: video_id.to_string(),
        title: text("title", NO_TITLE),
        description: text("description", NO_DESCRIPTION),
        thumbnail_url: best_thumbnail(snippet.get("thumbnails")),
        watch_url: watch_url(video_id),
    };

    Ok((summary, published_at))
}

/// Build the outbound response from a provider search result.
///
/// Malformed items are logged and skipped. The rest are ordered newest
/// first and truncated to `max_results`. Items without a publish date keep
/// their relative order after the dated ones.
#[must_use]
pub fn normalize(search: SearchResponse, max_results: usize) -> VideoListResponse {
    let mut dated: Vec<(VideoSummary, Option<DateTime<Utc>>)> = search
        .items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match summarize(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed video item");
                None
            }
        })
        .collect();

    // Stable: ties keep provider order.
    dated.sort_by(|a, b| b.1.cmp(&a.1));

    let videos: Vec<VideoSummary> = dated
        .into_iter()
        .map(|(summary, _)| summary)
        .take(max_results)
        .collect();

    let total_results = search
        .page_info
        .and_then(|info| info.total_results)
        .unwrap_or_else(|| i64::try_from(videos.len()).unwrap_or(i64::MAX));

    VideoListResponse {
        videos,
        total_results,
        next_page_token: search.next_page_token,
        prev_page_token: search.prev_page_token,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::video::models::PageInfo;

    fn item(id: &str, published: &str) -> Value {
        json!({
            "id": { "kind": "youtube#video", "videoId": id },
            "snippet": {
                "publishedAt": published,
                "title": format!("Video {id}"),
                "description": "desc",
                "thumbnails": {
                    "default": { "url": format!("https://i.ytimg.com/vi/{id}/default.jpg") }
                }
            }
        })
    }

    #[test]
    fn test_best_thumbnail_priority() {
        let thumbs = json!({
            "default": { "url": "d.jpg" },
            "medium": { "url": "m.jpg" },
            "high": { "url": "h.jpg" }
        });
        assert_eq!(best_thumbnail(Some(&thumbs)), "h.jpg");

        let thumbs = json!({
            "default": { "url": "d.jpg" },
            "maxres": { "url": "x.jpg" }
        });
        assert_eq!(best_thumbnail(Some(&thumbs)), "x.jpg");

        let thumbs = json!({ "default": { "url": "d.jpg" } });
        assert_eq!(best_thumbnail(Some(&thumbs)), "d.jpg");
    }

    #[test]
    fn test_best_thumbnail_missing() {
        assert_eq!(best_thumbnail(None), "");
        assert_eq!(best_thumbnail(Some(&json!({}))), "");
        assert_eq!(best_thumbnail(Some(&json!({ "high": {} }))), "");
    }

    #[test]
    fn test_summarize_full_item() {
        let (summary, published) = summarize(&item("abc123", "2024-05-01T10:00:00Z")).unwrap();
        assert_eq!(summary.video_id, "abc123");
        assert_eq!(summary.title, "Video abc123");
        assert_eq!(summary.description, "desc");
        assert_eq!(
            summary.thumbnail_url,
            "https://i.ytimg.com/vi/abc123/default.jpg"
        );
        assert_eq!(summary.watch_url, "https://www.youtube.com/watch?v=abc123");
        assert!(published.is_some());
    }

    #[test]
    fn test_summarize_defaults_title_and_description() {
        let value = json!({
            "id": { "videoId": "xyz" },
            "snippet": { "title": null }
        });
        let (summary, published) = summarize(&value).unwrap();
        assert_eq!(summary.title, "No title");
        assert_eq!(summary.description, "No description");
        assert_eq!(summary.thumbnail_url, "");
        assert_eq!(published, None);
    }

    #[test]
    fn test_summarize_keeps_empty_strings() {
        let value = json!({
            "id": { "videoId": "xyz" },
            "snippet": { "title": "", "description": "" }
        });
        let (summary, _) = summarize(&value).unwrap();
        assert_eq!(summary.title, "");
        assert_eq!(summary.description, "");
    }

    #[test]
    fn test_summarize_rejects_partial_items() {
        assert_eq!(
            summarize(&json!({ "snippet": {} })),
            Err(PartialItemError::MissingVideoId)
        );
        assert_eq!(
            summarize(&json!({ "id": { "channelId": "UC1" }, "snippet": {} })),
            Err(PartialItemError::MissingVideoId)
        );
        assert_eq!(
            summarize(&json!({ "id": { "videoId": "abc" } })),
            Err(PartialItemError::MissingSnippet)
        );
        assert_eq!(summarize(&json!("nope")), Err(PartialItemError::Malformed));
    }

    #[test]
    fn test_normalize_skips_bad_items_and_sorts() {
        let search = SearchResponse {
            items: vec![
                item("old", "2023-01-01T00:00:00Z"),
                json!({ "id": {} }),
                item("new", "2024-06-01T00:00:00Z"),
                item("mid", "2023-06-01T00:00:00Z"),
            ],
            page_info: Some(PageInfo {
                total_results: Some(42),
                results_per_page: Some(4),
            }),
            next_page_token: Some("NEXT".to_string()),
            prev_page_token: None,
        };

        let response = normalize(search, 10);
        let ids: Vec<&str> = response.videos.iter().map(|v| v.video_id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
        assert_eq!(response.total_results, 42);
        assert_eq!(response.next_page_token.as_deref(), Some("NEXT"));
        assert_eq!(response.prev_page_token, None);
    }

    #[test]
    fn test_normalize_truncates() {
        let search = SearchResponse {
            items: vec![
                item("a", "2024-01-03T00:00:00Z"),
                item("b", "2024-01-02T00:00:00Z"),
                item("c", "2024-01-01T00:00:00Z"),
            ],
            ..SearchResponse::default()
        };

        let response = normalize(search, 2);
        assert_eq!(response.videos.len(), 2);
        assert_eq!(response.videos[0].video_id, "a");
        // No pageInfo: fall back to the number of videos returned.
        assert_eq!(response.total_results, 2);
    }

    #[test]
    fn test_normalize_empty() {
        let response = normalize(SearchResponse::default(), 10);
        assert!(response.videos.is_empty());
        assert_eq!(response.total_results, 0);
    }
}
