use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use httpmock::{Method::GET, MockServer};
use random_words::{create_app, loader::WordSource, AppState, SharedState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn state_for(server: &MockServer) -> SharedState {
    let source = WordSource::new(
        reqwest::Client::new(),
        server.url("/words.json"),
        server.url("/languages/{lang}.json"),
    );
    Arc::new(AppState::new(source, Duration::from_millis(5000)))
}

fn request(method: &str, uri: &str, client: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(ip) = client {
        builder = builder.header("x-forwarded-for", ip);
    }
    builder.body(Body::empty()).unwrap()
}

async fn send(app: &Router, uri: &str, client: &str) -> Response {
    app.clone()
        .oneshot(request("GET", uri, Some(client)))
        .await
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_root_redirects_home() {
    let server = MockServer::start_async().await;
    let app = create_app(state_for(&server));

    let response = send(&app, "/", "10.0.0.1").await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/home");
}

#[tokio::test]
async fn test_home_page() {
    let server = MockServer::start_async().await;
    let app = create_app(state_for(&server));

    let response = send(&app, "/home", "10.0.0.1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&bytes).contains("/word"));
}

#[tokio::test]
async fn test_languages_with_fallback_only() {
    let server = MockServer::start_async().await;
    let app = create_app(state_for(&server));

    let response = send(&app, "/languages", "10.0.0.1").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!(["en"]));
}

#[tokio::test]
async fn test_languages_after_remote_load() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/words.json");
            then.status(200).json_body(json!(["apple", "river"]));
        })
        .await;
    for lang in ["es", "fr"] {
        server
            .mock_async(|when, then| {
                when.method(GET).path(format!("/languages/{lang}.json"));
                then.status(200).json_body(json!(["uno"]));
            })
            .await;
    }
    let app = create_app(state_for(&server));

    let response = send(&app, "/languages", "10.0.0.1").await;
    assert_eq!(body_json(response).await, json!(["en", "es", "fr"]));

    let response = send(&app, "/all?lang=en", "10.0.0.1").await;
    assert_eq!(body_json(response).await, json!(["apple", "river"]));
}

#[tokio::test]
async fn test_all_defaults_to_english() {
    let server = MockServer::start_async().await;
    let app = create_app(state_for(&server));

    let response = send(&app, "/all", "10.0.0.1").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!(["hello", "sun", "example", "random", "api"])
    );
}

#[tokio::test]
async fn test_unknown_language_forbidden() {
    let server = MockServer::start_async().await;
    let app = create_app(state_for(&server));

    let response = send(&app, "/all?lang=xx", "10.0.0.1").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await, json!({"error": "Unknown language: xx"}));

    let response = send(&app, "/word?lang=xx&number=3&length=5", "10.0.0.2").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await, json!({"error": "Unknown language: xx"}));
}

#[tokio::test]
async fn test_word_length_filter_on_fallback() {
    let server = MockServer::start_async().await;
    let app = create_app(state_for(&server));

    let response = send(&app, "/word?number=3&length=5&lang=en", "10.0.0.1").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!(["hello"]));
}

#[tokio::test]
async fn test_word_no_words_of_length() {
    let server = MockServer::start_async().await;
    let app = create_app(state_for(&server));

    let response = send(&app, "/word?length=9", "10.0.0.1").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await, json!({"error": "No words of length 9"}));
}

#[tokio::test]
async fn test_word_count_is_clamped() {
    let server = MockServer::start_async().await;
    let words: Vec<String> = (0..150).map(|i| format!("word{i}")).collect();
    server
        .mock_async(|when, then| {
            when.method(GET).path("/words.json");
            then.status(200).json_body(json!(words));
        })
        .await;
    let app = create_app(state_for(&server));

    let response = send(&app, "/word?number=500", "10.0.0.1").await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 100);

    let response = send(&app, "/word?number=0", "10.0.0.2").await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

    let response = send(&app, "/word", "10.0.0.3").await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

    let response = send(&app, "/word?number=4&diff=3", "10.0.0.4").await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_rate_limit_per_client() {
    let server = MockServer::start_async().await;
    let app = create_app(state_for(&server));

    let response = send(&app, "/word", "10.0.0.1").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "/all", "10.0.0.1").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().starts_with("Too many requests"));

    let response = send(&app, "/word", "10.0.0.2").await;
    assert_eq!(response.status(), StatusCode::OK);

    // Unlimited routes are not affected
    let response = send(&app, "/languages", "10.0.0.1").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_repeated_query_keys_use_first_value() {
    let server = MockServer::start_async().await;
    let words: Vec<String> = (0..10).map(|i| format!("word{i}")).collect();
    server
        .mock_async(|when, then| {
            when.method(GET).path("/words.json");
            then.status(200).json_body(json!(words));
        })
        .await;
    let app = create_app(state_for(&server));

    let response = send(&app, "/word?number=2&number=3", "10.0.0.1").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);

    let response = send(&app, "/all?lang=xx&lang=en", "10.0.0.2").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await, json!({"error": "Unknown language: xx"}));

    let response = send(&app, "/all?lang=en&lang=de", "10.0.0.3").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 10);

    // Still rate limited like any other request
    let response = send(&app, "/word?number=2&number=3", "10.0.0.1").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().starts_with("Too many requests"));
}

#[tokio::test]
async fn test_cf_connecting_ip_clients_limited_independently() {
    let server = MockServer::start_async().await;
    let app = create_app(state_for(&server));

    let from_cdn = |ip: &str| {
        Request::builder()
            .uri("/word")
            .header("cf-connecting-ip", ip)
            .body(Body::empty())
            .unwrap()
    };

    let response = app.clone().oneshot(from_cdn("9.9.9.1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(from_cdn("9.9.9.2")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(from_cdn("9.9.9.1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_anonymous_clients_share_a_bucket() {
    let server = MockServer::start_async().await;
    let app = create_app(state_for(&server));

    let response = app.clone().oneshot(request("GET", "/word", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(request("GET", "/word", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_rate_limit_window_elapses() {
    let server = MockServer::start_async().await;
    let source = WordSource::new(
        reqwest::Client::new(),
        server.url("/words.json"),
        server.url("/languages/{lang}.json"),
    );
    let app = create_app(Arc::new(AppState::new(source, Duration::from_millis(50))));

    assert_eq!(send(&app, "/word", "10.0.0.1").await.status(), StatusCode::OK);
    assert_eq!(send(&app, "/word", "10.0.0.1").await.status(), StatusCode::FORBIDDEN);

    tokio::time::sleep(Duration::from_millis(80)).await;
    assert_eq!(send(&app, "/word", "10.0.0.1").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unmatched_routes_not_found() {
    let server = MockServer::start_async().await;
    let app = create_app(state_for(&server));

    let response = send(&app, "/nope", "10.0.0.1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await, json!({"error": "Not found"}));

    let response = app
        .clone()
        .oneshot(request("POST", "/word", Some("10.0.0.1")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await, json!({"error": "Not found"}));
}

#[tokio::test]
async fn test_cors_header_present() {
    let server = MockServer::start_async().await;
    let app = create_app(state_for(&server));

    let request = Request::builder()
        .uri("/languages")
        .header(header::ORIGIN, "https://example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn test_remote_loaded_once_across_requests() {
    let server = MockServer::start_async().await;
    let primary = server
        .mock_async(|when, then| {
            when.method(GET).path("/words.json");
            then.status(200).json_body(json!(["apple"]));
        })
        .await;
    let state = state_for(&server);
    let app = create_app(state.clone());

    let response = send(&app, "/health", "10.0.0.1").await;
    assert_eq!(body_json(response).await["load_state"], "unloaded");

    for i in 0..3 {
        send(&app, "/languages", &format!("10.0.1.{i}")).await;
        send(&app, "/word", &format!("10.0.2.{i}")).await;
    }
    primary.assert_hits_async(1).await;

    let response = send(&app, "/health", "10.0.0.1").await;
    let health = body_json(response).await;
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["load_state"], "loaded");
    assert_eq!(health["languages"], 1);
    assert_eq!(health["tracked_clients"], 3);
}
