use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::constants::{DEFAULT_MAX_RESULTS, MAX_MAX_RESULTS, MIN_MAX_RESULTS};
use crate::content::{MediaQuery, MediaReference};
use crate::error::Error;
use crate::loader::{
    ComposedLoader, DependentPage, HomePageSource, NewsIndexSource, NewsItemSource,
    VideoChannelIndexSource,
};

/// Create the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(health))
        .route("/api/youtube/health", get(youtube_health))
        .route(
            "/api/youtube/channel/:channel_id/videos",
            get(channel_videos),
        )
        .route("/api/pages/home", get(home_page))
        .route("/api/pages/news", get(news_index_page))
        .route("/api/pages/news/:id_or_path", get(news_item_page))
        .route("/api/pages/videos", get(video_channels_page))
        .route("/api/media", get(media_list))
        .route("/api/media/:id", get(media_item))
}

async fn health() -> &'static str {
    "OK"
}

// ========== Video Proxy Routes ==========

#[derive(Debug, Serialize)]
struct YouTubeHealth {
    status: &'static str,
    timestamp: String,
    message: &'static str,
}

async fn youtube_health() -> Json<YouTubeHealth> {
    Json(YouTubeHealth {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339(),
        message: "YouTube API proxy is running",
    })
}

#[derive(Debug, Deserialize)]
pub struct ChannelVideosParams {
    #[serde(rename = "maxResults")]
    max_results: Option<String>,
}

async fn channel_videos(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
    Query(params): Query<ChannelVideosParams>,
) -> Response {
    let max_results = match parse_max_results(params.max_results.as_deref()) {
        Ok(n) => n,
        Err(e) => return e.into_response(),
    };

    match state
        .videos
        .get_channel_videos(&channel_id, max_results)
        .await
    {
        Ok(videos) => Json(videos).into_response(),
        Err(e) => {
            if e.status_code().is_server_error() {
                tracing::error!(channel_id = %channel_id, error = %e, "Failed to fetch channel videos");
            } else {
                tracing::debug!(channel_id = %channel_id, error = %e, "Channel videos request rejected");
            }
            e.into_response()
        }
    }
}

/// Missing means the default; anything unparseable is out of range.
fn parse_max_results(raw: Option<&str>) -> Result<i64, Error> {
    match raw.map(str::trim) {
        None | Some("") => Ok(DEFAULT_MAX_RESULTS),
        Some(raw) => raw.parse::<i64>().map_err(|_| {
            Error::InvalidArgument(format!(
                "maxResults must be between {MIN_MAX_RESULTS} and {MAX_MAX_RESULTS}"
            ))
        }),
    }
}

// ========== Page Routes ==========

/// Run a composed load to completion and return its settled state.
///
/// Load failures travel in the `error` field, so this is always a 200.
async fn load_page<S>(source: S) -> Response
where
    S: DependentPage,
    S::Page: Serialize,
    S::Child: Serialize,
{
    let loader = ComposedLoader::new();
    let state = loader.load(&source).await;
    if let Some(error) = &state.error {
        tracing::warn!(error = %error, "Page load failed");
    }
    (StatusCode::OK, Json(state)).into_response()
}

async fn home_page(State(state): State<AppState>) -> Response {
    load_page(HomePageSource::new(state.content.clone())).await
}

#[derive(Debug, Deserialize)]
pub struct NewsParams {
    take: Option<String>,
}

async fn news_index_page(
    State(state): State<AppState>,
    Query(params): Query<NewsParams>,
) -> Response {
    let take = match parse_take(params.take.as_deref()) {
        Ok(take) => take,
        Err(e) => return e.into_response(),
    };

    let mut source = NewsIndexSource::new(state.content.clone());
    if let Some(take) = take {
        source = source.take(take);
    }
    load_page(source).await
}

async fn news_item_page(
    State(state): State<AppState>,
    Path(id_or_path): Path<String>,
) -> Response {
    load_page(NewsItemSource::new(state.content.clone(), id_or_path)).await
}

async fn video_channels_page(State(state): State<AppState>) -> Response {
    load_page(VideoChannelIndexSource::new(state.content.clone())).await
}

// ========== Media Routes ==========

#[derive(Debug, Deserialize)]
pub struct MediaParams {
    #[serde(rename = "mediaType")]
    media_type: Option<String>,
    sort: Option<String>,
    skip: Option<String>,
    take: Option<String>,
}

#[derive(Debug, Serialize)]
struct MediaList {
    total: i64,
    items: Vec<MediaReference>,
}

async fn media_list(
    State(state): State<AppState>,
    Query(params): Query<MediaParams>,
) -> Response {
    let paging = (
        parse_skip(params.skip.as_deref()),
        parse_take(params.take.as_deref()),
    );
    let (skip, take) = match paging {
        (Ok(skip), Ok(take)) => (skip, take),
        (Err(e), _) | (_, Err(e)) => return e.into_response(),
    };

    let mut query = match params.media_type.as_deref().map(str::trim) {
        Some(media_type) if !media_type.is_empty() => MediaQuery::by_type(media_type),
        _ => MediaQuery::all(),
    };
    if let Some(sort) = params.sort.filter(|s| !s.trim().is_empty()) {
        query = query.sort(sort);
    }
    if let Some(skip) = skip {
        query = query.skip(skip);
    }
    if let Some(take) = take {
        query = query.take(take);
    }

    match state.content.query_media(&query).await {
        Ok(response) => Json(MediaList {
            total: response.total,
            items: response.items.iter().map(MediaReference::from).collect(),
        })
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to query media");
            e.into_response()
        }
    }
}

async fn media_item(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.content.fetch_media(&id).await {
        Ok(Some(media)) => Json(media).into_response(),
        Ok(None) => Error::NotFound.into_response(),
        Err(e) => {
            tracing::error!(media_id = %id, error = %e, "Failed to fetch media item");
            e.into_response()
        }
    }
}

/// Optional positive page size.
fn parse_take(raw: Option<&str>) -> Result<Option<u32>, Error> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => match raw.parse::<u32>() {
            Ok(take) if take > 0 => Ok(Some(take)),
            _ => Err(Error::InvalidArgument(
                "take must be a positive integer".to_string(),
            )),
        },
    }
}

/// Optional non-negative offset.
fn parse_skip(raw: Option<&str>) -> Result<Option<u32>, Error> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse::<u32>().map(Some).map_err(|_| {
            Error::InvalidArgument("skip must be a non-negative integer".to_string())
        }),
    }
}
