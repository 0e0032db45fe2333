//! Typed page models projected from untyped content properties.
//!
//! Each content type has its own mapping function. Mapping never fails: a
//! missing or wrongly-typed property simply leaves the field empty, so
//! renamed CMS fields show up as absent data at this boundary rather than
//! as errors deep inside rendering.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::models::{ContentItem, MediaItem, PropertyBag};
use crate::constants::content_types;

/// A typed page, one variant per supported content type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PageModel {
    Home(HomePage),
    NewsIndex(NewsIndexPage),
    NewsItem(NewsItemPage),
    VideoChannelIndex(VideoChannelIndexPage),
    VideoChannel(VideoChannelPage),
}

impl PageModel {
    /// Map a content item by its content type alias.
    ///
    /// Returns `None` for content types without a page model.
    #[must_use]
    pub fn from_item(item: &ContentItem) -> Option<Self> {
        let page = match item.content_type.as_str() {
            content_types::HOME => Self::Home(HomePage::from_properties(&item.properties)),
            content_types::NEWS_INDEX => {
                Self::NewsIndex(NewsIndexPage::from_properties(&item.properties))
            }
            content_types::NEWS_ITEM => Self::NewsItem(NewsItemPage::from_item(item)),
            content_types::VIDEO_CHANNEL_INDEX => {
                Self::VideoChannelIndex(VideoChannelIndexPage::from_properties(&item.properties))
            }
            content_types::VIDEO_CHANNEL => Self::VideoChannel(VideoChannelPage::from_item(item)),
            _ => return None,
        };
        Some(page)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomePage {
    pub page_title: Option<String>,
    pub body_text: Option<String>,
    pub footer_text: Option<String>,
    pub background_image: Option<String>,
}

impl HomePage {
    #[must_use]
    pub fn from_properties(props: &PropertyBag) -> Self {
        Self {
            page_title: string(props, "pageTitle"),
            body_text: rich_text(props, "bodyText"),
            footer_text: string(props, "footerText"),
            background_image: first_media(props, "backgroundImage").and_then(|m| m.url),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsIndexPage {
    pub title: Option<String>,
    pub description: Option<String>,
    pub main_image: Option<MediaReference>,
    pub category_filter_options: Option<Vec<String>>,
    pub default_sort_order: Option<String>,
    pub news_per_page: Option<u32>,
    pub show_featured_news: Option<bool>,
}

impl NewsIndexPage {
    #[must_use]
    pub fn from_properties(props: &PropertyBag) -> Self {
        Self {
            title: string(props, "title"),
            description: rich_text(props, "description"),
            main_image: first_media(props, "mainImage"),
            category_filter_options: string_list(props, "categoryFilterOptions"),
            default_sort_order: string(props, "defaultSortOrder"),
            news_per_page: integer(props, "newsPerPage").and_then(|n| u32::try_from(n).ok()),
            show_featured_news: boolean(props, "showFeaturedNews"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItemPage {
    pub id: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub body_text: Option<String>,
    pub main_image: Option<MediaReference>,
    pub publish_date: Option<DateTime<Utc>>,
    pub featured: Option<bool>,
    pub author: Option<AuthorReference>,
    pub related_links: Option<Vec<Link>>,
    pub attachments: Option<Vec<MediaReference>>,
}

impl NewsItemPage {
    #[must_use]
    pub fn from_properties(props: &PropertyBag) -> Self {
        Self {
            id: None,
            title: string(props, "title"),
            summary: string(props, "summary"),
            body_text: rich_text(props, "bodyText"),
            main_image: first_media(props, "mainImage"),
            publish_date: date(props, "publishDate"),
            featured: boolean(props, "featured"),
            author: first_object(props, "author").map(AuthorReference::from_value),
            related_links: object_list(props, "relatedLinks")
                .map(|links| links.iter().map(Link::from_value).collect()),
            // The CMS property keeps its historical spelling.
            attachments: object_list(props, "attachements")
                .map(|media| media.iter().map(MediaReference::from_value).collect()),
        }
    }

    #[must_use]
    pub fn from_item(item: &ContentItem) -> Self {
        Self {
            id: Some(item.id.clone()),
            ..Self::from_properties(&item.properties)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoChannelIndexPage {
    pub page_title: Option<String>,
    pub menu_name: Option<String>,
}

impl VideoChannelIndexPage {
    #[must_use]
    pub fn from_properties(props: &PropertyBag) -> Self {
        Self {
            page_title: string(props, "pageTitle"),
            menu_name: string(props, "menuName"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoChannelPage {
    pub id: Option<String>,
    pub channel_id: Option<String>,
    pub page_title: Option<String>,
    pub menu_name: Option<String>,
    pub amount_of_videos: Option<u32>,
    pub featured_video_url: Option<String>,
    pub youtube_channel_name: Option<String>,
}

impl VideoChannelPage {
    #[must_use]
    pub fn from_properties(props: &PropertyBag) -> Self {
        Self {
            id: None,
            channel_id: string(props, "channelId"),
            page_title: string(props, "pageTitle"),
            menu_name: string(props, "menuName"),
            amount_of_videos: integer(props, "amountOfVideos").and_then(|n| u32::try_from(n).ok()),
            featured_video_url: string(props, "featuredVideoUrl"),
            youtube_channel_name: string(props, "youtubeChannelName"),
        }
    }

    #[must_use]
    pub fn from_item(item: &ContentItem) -> Self {
        Self {
            id: Some(item.id.clone()),
            ..Self::from_properties(&item.properties)
        }
    }
}

/// A media item as delivered inside a property. Crop and focal point data
/// are left to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaReference {
    pub id: Option<String>,
    pub name: Option<String>,
    pub media_type: Option<String>,
    pub url: Option<String>,
    pub extension: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub bytes: Option<u64>,
}

impl MediaReference {
    fn from_value(value: &Value) -> Self {
        Self {
            id: value_string(value, "id"),
            name: value_string(value, "name"),
            media_type: value_string(value, "mediaType"),
            url: value_string(value, "url"),
            extension: value_string(value, "extension"),
            width: value.get("width").and_then(Value::as_u64).and_then(|n| u32::try_from(n).ok()),
            height: value.get("height").and_then(Value::as_u64).and_then(|n| u32::try_from(n).ok()),
            bytes: value.get("bytes").and_then(Value::as_u64),
        }
    }
}

impl From<&MediaItem> for MediaReference {
    fn from(item: &MediaItem) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            id: non_empty(&item.id),
            name: non_empty(&item.name),
            media_type: non_empty(&item.media_type),
            url: non_empty(&item.url),
            extension: item.extension.clone(),
            width: item.width,
            height: item.height,
            bytes: item.bytes,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorReference {
    pub id: Option<String>,
    pub name: Option<String>,
    pub content_type: Option<String>,
    pub url: Option<String>,
}

impl AuthorReference {
    fn from_value(value: &Value) -> Self {
        Self {
            id: value_string(value, "id"),
            name: value_string(value, "name"),
            content_type: value_string(value, "contentType"),
            url: route_path(value),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub name: Option<String>,
    pub target: Option<String>,
    pub link_type: Option<String>,
    pub url: Option<String>,
}

impl Link {
    fn from_value(value: &Value) -> Self {
        Self {
            name: value_string(value, "title").or_else(|| value_string(value, "name")),
            target: value_string(value, "target"),
            link_type: value_string(value, "linkType").or_else(|| value_string(value, "type")),
            url: value_string(value, "url").or_else(|| route_path(value)),
        }
    }
}

fn string(props: &PropertyBag, key: &str) -> Option<String> {
    props.get(key).and_then(Value::as_str).map(str::to_string)
}

fn integer(props: &PropertyBag, key: &str) -> Option<i64> {
    match props.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn boolean(props: &PropertyBag, key: &str) -> Option<bool> {
    props.get(key).and_then(Value::as_bool)
}

/// Rich text arrives as `{markup, blocks}`; only the markup is rendered.
fn rich_text(props: &PropertyBag, key: &str) -> Option<String> {
    match props.get(key)? {
        Value::Object(obj) => obj.get("markup").and_then(Value::as_str).map(str::to_string),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

fn date(props: &PropertyBag, key: &str) -> Option<DateTime<Utc>> {
    let raw = props.get(key)?.as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

fn string_list(props: &PropertyBag, key: &str) -> Option<Vec<String>> {
    props.get(key)?.as_array().map(|values| {
        values
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    })
}

fn object_list<'a>(props: &'a PropertyBag, key: &str) -> Option<&'a Vec<Value>> {
    props.get(key)?.as_array()
}

/// Pickers deliver a list even for single selections; take the first entry.
fn first_object<'a>(props: &'a PropertyBag, key: &str) -> Option<&'a Value> {
    match props.get(key)? {
        Value::Array(values) => values.first().filter(|v| v.is_object()),
        value @ Value::Object(_) => Some(value),
        _ => None,
    }
}

fn first_media(props: &PropertyBag, key: &str) -> Option<MediaReference> {
    first_object(props, key).map(MediaReference::from_value)
}

fn value_string(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn route_path(value: &Value) -> Option<String> {
    value
        .get("route")
        .and_then(|r| r.get("path"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
