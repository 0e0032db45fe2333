//! HTTP surface: shared state, router assembly and the server loop.

mod error;
mod routes;

pub use error::ErrorBody;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::content::ContentClient;
use crate::video::{ContentChannelRegistry, VideoProxyService, YouTubeClient};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub content: ContentClient,
    pub videos: Arc<VideoProxyService>,
}

impl AppState {
    /// Wire up the content client, the channel registry and the video proxy.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn from_config(config: Config) -> Result<Self> {
        let content =
            ContentClient::from_config(&config).context("Failed to create content client")?;
        let provider =
            YouTubeClient::from_config(&config).context("Failed to create video provider client")?;
        let channels = ContentChannelRegistry::new(content.clone(), config.channel_cache_duration);
        let videos = VideoProxyService::new(
            Arc::new(provider),
            Arc::new(channels),
            config.cache_duration,
        );

        Ok(Self {
            config: Arc::new(config),
            content,
            videos: Arc::new(videos),
        })
    }
}

/// Start the web server.
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn serve(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.web_host, config.web_port)
        .parse()
        .context("Invalid web server address")?;

    let state = AppState::from_config(config)?;
    let app = create_app(state);

    info!(addr = %addr, "Starting HTTP web server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind web server")?;

    axum::serve(listener, app)
        .await
        .context("Web server error")?;

    Ok(())
}

/// Create the main application router.
pub fn create_app(state: AppState) -> Router {
    let cors_allow_any = state.config.cors_allow_any;

    let app = Router::new()
        .merge(routes::router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors_allow_any {
        info!("CORS: allowing any origin");
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}
