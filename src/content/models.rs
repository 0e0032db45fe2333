//! Wire shapes of the delivery API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Untyped property bag carried by every content item.
pub type PropertyBag = Map<String, Value>;

/// Envelope returned by the content list endpoints.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ContentResponse {
    pub total: i64,
    #[serde(default)]
    pub items: Vec<ContentItem>,
}

/// One record from the content store.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: String,
    pub content_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub create_date: Option<String>,
    #[serde(default)]
    pub update_date: Option<String>,
    #[serde(default)]
    pub route: Option<ContentRoute>,
    #[serde(default)]
    pub properties: PropertyBag,
    #[serde(default)]
    pub cultures: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRoute {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub start_item: Option<StartItem>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StartItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub path: String,
}

/// Envelope returned by the media list endpoint.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MediaResponse {
    pub total: i64,
    #[serde(default)]
    pub items: Vec<MediaItem>,
}

/// One media library item.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub media_type: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub bytes: Option<u64>,
    #[serde(default)]
    pub properties: PropertyBag,
    #[serde(default)]
    pub create_date: Option<String>,
    #[serde(default)]
    pub update_date: Option<String>,
}
