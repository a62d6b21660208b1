//! End-to-end tests of the HTTP server.

use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use langneg::HttpServer;
use tower::ServiceExt;

mod common;

const CONFIG: &str = r#"
    [listener]
    bind_address = "127.0.0.1:0"

    [http]
    directives = [
        ["set_from_accept_language", "$lang", "en", "fr"],
        ["add_header", "Content-Language", "$lang"],
        ["return", "200", "lang=$lang"],
    ]

    [[http.locations]]
    name = "docs"
    path_prefix = "/docs"
    directives = [["return", "302", "/docs/${lang}/"]]

    [[http.locations]]
    name = "german"
    path_prefix = "/de"
    directives = [
        ["set_from_accept_language", "$lang", "de", "de-CH"],
        ["return", "200", "$lang"],
    ]

    [[http.locations]]
    name = "plain"
    host = "plain.example.com"
    directives = [["add_header", "X-Plain", "yes"]]
"#;

async fn send(uri: &str, host: &str, accept_language: Option<&str>) -> axum::response::Response {
    let server = HttpServer::new(common::configuration(CONFIG));
    let mut builder = Request::builder().uri(uri).header(header::HOST, host);
    if let Some(value) = accept_language {
        builder = builder.header(header::ACCEPT_LANGUAGE, value);
    }
    server
        .router()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_root_scope_negotiates_and_sets_header() {
    let response = send("/", "example.com", Some("fr-CA, en;q=0.8")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_LANGUAGE], "fr");
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(body_text(response).await, "lang=fr");
}

#[tokio::test]
async fn test_missing_header_uses_default() {
    let response = send("/", "example.com", None).await;
    assert_eq!(response.headers()[header::CONTENT_LANGUAGE], "en");
    assert_eq!(body_text(response).await, "lang=en");
}

#[tokio::test]
async fn test_unmatched_header_uses_default() {
    let response = send("/", "example.com", Some("ja, zh-CN")).await;
    assert_eq!(body_text(response).await, "lang=en");
}

#[tokio::test]
async fn test_nested_scope_inherits_tags_and_headers() {
    let response = send("/docs/start", "example.com", Some("FR")).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/docs/fr/");
    assert_eq!(response.headers()[header::CONTENT_LANGUAGE], "fr");
}

#[tokio::test]
async fn test_nested_scope_with_own_tags_overrides() {
    let response = send("/de/page", "example.com", Some("fr, de-CH")).await;
    assert_eq!(response.status(), StatusCode::OK);
    // "de" comes first in the scope's list and prefixes "de-CH".
    assert_eq!(body_text(response).await, "de");

    let response = send("/de/page", "example.com", Some("en")).await;
    assert_eq!(body_text(response).await, "de");
}

#[tokio::test]
async fn test_scope_without_return_is_not_found() {
    let response = send("/", "plain.example.com", Some("fr")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()["x-plain"], "yes");
    assert!(response.headers().get(header::CONTENT_LANGUAGE).is_none());
}

#[test]
fn test_bundled_config_compiles() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("langneg.toml");
    let config = langneg::config::load_config(&path).unwrap();
    assert_eq!(config.router().root().accept_language().len(), 3);
    assert_eq!(config.router().root().children().len(), 4);
}

#[tokio::test]
async fn test_client_request_id_is_propagated() {
    let server = HttpServer::new(common::configuration(CONFIG));
    let request = Request::builder()
        .uri("/")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .unwrap();
    let response = server.router().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-42");
}

#[tokio::test]
async fn test_live_server_answers_and_reloads() {
    let running = common::start_server(CONFIG).await;
    let client = common::client();
    let url = format!("http://{}/", running.addr);

    let res = client
        .get(&url)
        .header("Accept-Language", "fr")
        .send()
        .await
        .expect("server reachable");
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-language"], "fr");

    running
        .updates
        .send(common::configuration(
            r#"
            [http]
            directives = [
                ["set_from_accept_language", "$lang", "pt"],
                ["return", "200", "$lang"],
            ]
            "#,
        ))
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let res = client
        .get(&url)
        .header("Accept-Language", "fr")
        .send()
        .await
        .unwrap();
    assert_eq!(res.text().await.unwrap(), "pt");

    running.shutdown.trigger();
}

#[tokio::test]
async fn test_live_server_stops_on_shutdown() {
    let running = common::start_server(CONFIG).await;
    running.shutdown.trigger();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let result = common::client()
        .get(format!("http://{}/", running.addr))
        .timeout(Duration::from_secs(1))
        .send()
        .await;
    assert!(result.is_err());
}
