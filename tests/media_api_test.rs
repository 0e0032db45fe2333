//! Integration tests for the media library endpoints.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use content_video_proxy::config::Config;
use content_video_proxy::web::{create_app, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_app(server: &MockServer) -> Router {
    let mut config = Config::for_testing();
    config.content_api_url = server.uri();
    create_app(AppState::from_config(config).expect("Failed to build state"))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_media_item() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/item/m1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "m1",
            "name": "Logo",
            "mediaType": "Image",
            "url": "/media/m1/logo.png",
            "extension": "png",
            "width": 64,
            "height": 64
        })))
        .mount(&server)
        .await;

    let (status, body) = get_json(create_test_app(&server), "/api/media/m1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "m1");
    assert_eq!(body["mediaType"], "Image");
    assert_eq!(body["url"], "/media/m1/logo.png");
    assert_eq!(body["width"], 64);
}

#[tokio::test]
async fn test_unknown_media_item_is_404() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/item/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let (status, body) = get_json(create_test_app(&server), "/api/media/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Content not found");
}

#[tokio::test]
async fn test_media_list_forwards_filter_and_paging() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media"))
        .and(query_param("filter", "mediaType:Image"))
        .and(query_param("skip", "10"))
        .and(query_param("take", "5"))
        .and(query_param("sort", "name:asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 11,
            "items": [{ "id": "m11", "mediaType": "Image", "url": "/media/m11.jpg" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = get_json(
        create_test_app(&server),
        "/api/media?mediaType=Image&skip=10&take=5&sort=name:asc",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 11);
    assert_eq!(body["items"][0]["id"], "m11");
    assert_eq!(body["items"][0]["url"], "/media/m11.jpg");
}

#[tokio::test]
async fn test_media_list_rejects_bad_paging() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    for uri in ["/api/media?take=0", "/api/media?skip=-1", "/api/media?take=lots"] {
        let (status, body) = get_json(create_test_app(&server), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["error"].is_string(), "{uri}");
    }
}
