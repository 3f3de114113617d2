#![cfg(feature = "server")]

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use httpmock::prelude::*;
use serde_json::Value;
use tower::ServiceExt;
use umbrella_check::core::CheckSettings;
use umbrella_check::server::{create_app, AppState};
use umbrella_check::{DecisionMode, FixedClock, HttpFetcher, UmbrellaService};

const FEED_PATH: &str = "/fwo/IDN11060.xml";

const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<product>
  <forecast>
    <area aac="NSW_PT131" description="Sydney">
      <forecast-period index="0" start-time-local="2025-10-10T00:00:00+11:00">
        <text type="probability_of_precipitation">5%</text>
      </forecast-period>
      <forecast-period index="1" start-time-local="2025-10-11T00:00:00+11:00">
        <element type="precipitation_range">2 to 8 mm</element>
        <element type="air_temperature_minimum">15</element>
        <element type="air_temperature_maximum">25</element>
        <text type="probability_of_precipitation">80%</text>
      </forecast-period>
    </area>
  </forecast>
</product>"#;

fn app(server: &MockServer) -> Router {
    let settings = CheckSettings {
        feed_url: server.url(FEED_PATH),
        area_code: "NSW_PT131".to_string(),
        location_label: "Sydney".to_string(),
        mode: DecisionMode::TargetDay,
        default_threshold: None,
    };
    let clock = FixedClock::parse("2025-10-10T12:00:00+11:00").unwrap();
    let service = UmbrellaService::new(HttpFetcher::new(5).unwrap(), clock, settings);
    create_app(AppState::new(service))
}

fn serve_feed(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(GET).path(FEED_PATH);
        then.status(200)
            .header("Content-Type", "application/xml")
            .body(FEED);
    })
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(app, uri).await;
    (status, serde_json::from_str(&body).unwrap())
}

#[tokio::test]
async fn test_api_umbrella_returns_verdict() {
    let server = MockServer::start();
    let feed = serve_feed(&server);

    let (status, json) = get_json(app(&server), "/api/umbrella").await;

    feed.assert();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["need_umbrella"], true);
    assert_eq!(json["precipitation_chance_percent"], 80);
    assert_eq!(json["precipitation_volume_mm"], 8.0);
    assert_eq!(json["location"], "Sydney");
    assert_eq!(json["min_temp"], 15);
    assert_eq!(json["max_temp"], 25);
    assert_eq!(json["mode"], "target_day");
    assert_eq!(json["threshold"], 50.0);
    assert_eq!(json["forecast_date"], "2025-10-11");
    assert_eq!(json["timestamp"], "2025-10-10T12:00:00+11:00");
    assert!(json.get("sum_product").is_none());
    assert_eq!(json["periods"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_api_umbrella_threshold_query() {
    let server = MockServer::start();
    serve_feed(&server);

    let (status, json) = get_json(app(&server), "/api/umbrella?threshold=100").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["need_umbrella"], false);
    assert_eq!(json["threshold"], 100.0);
}

#[tokio::test]
async fn test_api_umbrella_bad_threshold_falls_back() {
    let server = MockServer::start();
    serve_feed(&server);

    let (status, json) = get_json(app(&server), "/api/umbrella?threshold=abc").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["need_umbrella"], true);
    assert_eq!(json["threshold"], 50.0);
}

#[tokio::test]
async fn test_api_temp() {
    let server = MockServer::start();
    serve_feed(&server);

    let (status, json) = get_json(app(&server), "/api/temp").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!({"min_temp": 15, "max_temp": 25}));
}

#[tokio::test]
async fn test_upstream_failure_is_500() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(FEED_PATH);
        then.status(500);
    });

    let (status, json) = get_json(app(&server), "/api/umbrella").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Failed to fetch weather data");
    assert_eq!(json["code"], "upstream_status");

    let (status, json) = get_json(app(&server), "/api/temp").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Failed to fetch weather data");

    let (status, body) = get(app(&server), "/").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Failed to fetch weather data");
}

#[tokio::test]
async fn test_index_renders_html() {
    let server = MockServer::start();
    serve_feed(&server);

    let response = app(&server)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let page = String::from_utf8(body.to_vec()).unwrap();
    assert!(page.contains("Take an umbrella!"));
    assert!(page.contains("80% chance · 8.0mm"));
    assert!(page.contains("<svg"));
}

#[tokio::test]
async fn test_health_does_not_touch_feed() {
    let server = MockServer::start();
    let feed = serve_feed(&server);

    let (status, json) = get_json(app(&server), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    feed.assert_hits(0);
}
