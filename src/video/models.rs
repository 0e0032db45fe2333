use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Compact description of one video, as returned to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSummary {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub watch_url: String,
}

/// Body of the channel videos endpoint. This is also what gets cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoListResponse {
    pub videos: Vec<VideoSummary>,
    pub total_results: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_page_token: Option<String>,
}

/// Raw search response from the provider.
///
/// Items stay untyped so one malformed entry cannot fail the whole page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<Value>,
    #[serde(default)]
    pub page_info: Option<PageInfo>,
    #[serde(default)]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub prev_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub total_results: Option<i64>,
    #[serde(default)]
    pub results_per_page: Option<i64>,
}
