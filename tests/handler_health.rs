mod common;

use axum::http::StatusCode;
use common::{LINKS_CSV, create_test_app};
use short_link::prelude::RouteOptions;

#[tokio::test]
async fn test_health_endpoint_success() {
    let app = create_test_app(LINKS_CSV).await;
    let server = app.server();

    let response = server.get("/_status/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["running"], true);
    assert_eq!(json["healthy"], true);
    assert_eq!(json["mapping_size"], 5);
    assert!(json["last_update"].is_string());
    assert!(json.get("last_error").is_none());
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let app = create_test_app(LINKS_CSV).await;
    let server = app.server();

    let response = server.get("/_status/health").await;

    let json = response.json::<serde_json::Value>();

    assert!(json.get("status").is_some());
    assert!(json.get("version").is_some());
    assert!(json.get("mapping_size").is_some());
    assert!(json.get("running").is_some());
    assert!(json.get("healthy").is_some());
}

#[tokio::test]
async fn test_health_degraded_after_source_failure() {
    let app = create_test_app(LINKS_CSV).await;
    let server = app.server();

    std::fs::remove_file(&app.source_path).unwrap();
    assert!(app.refresh_service().refresh(false).await.is_err());

    let response = server.get("/_status/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["healthy"], false);
    assert_eq!(json["running"], true);
    assert_eq!(json["mapping_size"], 5, "previous mapping is kept");
    assert!(json["last_error"].is_string());
}

#[tokio::test]
async fn test_health_recovers_after_successful_refresh() {
    let app = create_test_app(LINKS_CSV).await;
    let server = app.server();

    std::fs::remove_file(&app.source_path).unwrap();
    let _ = app.refresh_service().refresh(false).await;
    server
        .get("/_status/health")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);

    common::write_csv(&app.source_path, LINKS_CSV);
    app.refresh_service().refresh(false).await.unwrap();

    server.get("/_status/health").await.assert_status_ok();
}

#[tokio::test]
async fn test_health_disabled_falls_through_to_redirects() {
    let app = create_test_app(LINKS_CSV).await;
    let options = RouteOptions {
        status_enabled: false,
        ..RouteOptions::default()
    };
    let server = axum_test::TestServer::new(app.router(options)).unwrap();

    let response = server.get("/_status/health").await;

    response.assert_status_not_found();
    assert!(response.text().contains("Redirect not found"));
}
