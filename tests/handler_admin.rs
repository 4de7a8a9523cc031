mod common;

use axum::http::StatusCode;
use common::{LINKS_CSV, create_test_app, create_test_app_with};
use short_link::web::ResponseOptions;

#[tokio::test]
async fn test_admin_routes_disabled_by_default() {
    let app = create_test_app(LINKS_CSV).await;
    let server = app.server();

    server.get("/_status/info").await.assert_status_not_found();
    server
        .get("/_api/update-mapping")
        .await
        .assert_status_not_found();
    server
        .post("/_api/update-mapping")
        .await
        .assert_status(StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_info_lists_sorted_mapping() {
    let app = create_test_app(LINKS_CSV).await;
    let server = app.admin_server();

    let response = server.get("/_status/info").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();

    let keys: Vec<&str> = json["mapping"]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(
        keys,
        ["__root", "blog", "docs", "go.example.com", "www.example.com"]
    );
    assert_eq!(json["mapping"]["docs"], "https://example.com/docs");
    assert!(json["source_id"].as_str().unwrap().starts_with("csv:"));
    assert!(json["last_update"].is_string());
    assert!(json["last_modified"].is_string());
    assert!(json.get("last_error").is_none());
}

#[tokio::test]
async fn test_update_mapping_forces_refresh() {
    let app = create_test_app(LINKS_CSV).await;
    let server = app.admin_server();

    common::write_csv(
        &app.source_path,
        "key,target\nfresh,https://example.com/fresh\n",
    );

    let response = server.get("/_api/update-mapping").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["message"], "Update OK, mapping size: 1");
    assert_eq!(json["mapping_size"], 1);
    assert_eq!(json["origin"], "source");

    server
        .get("/fresh")
        .await
        .assert_status(StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn test_update_mapping_accepts_post() {
    let app = create_test_app(LINKS_CSV).await;
    let server = app.admin_server();

    let response = server.post("/_api/update-mapping").await;

    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["mapping_size"], 5);
}

#[tokio::test]
async fn test_update_mapping_reports_source_failure() {
    let app = create_test_app(LINKS_CSV).await;
    let server = app.admin_server();
    std::fs::remove_file(&app.source_path).unwrap();

    let response = server.post("/_api/update-mapping").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "service_unavailable");

    let info = server.get("/_status/info").await.json::<serde_json::Value>();
    assert!(info["last_error"].is_string());
    assert_eq!(info["mapping"].as_object().unwrap().len(), 5);
}

#[tokio::test]
async fn test_update_mapping_uses_fallback() {
    let app = create_test_app_with(LINKS_CSV, ResponseOptions::default(), true).await;
    let server = app.admin_server();
    assert!(app.fallback_path().exists());
    std::fs::remove_file(&app.source_path).unwrap();

    let response = server.post("/_api/update-mapping").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["origin"], "fallback");
    assert_eq!(json["mapping_size"], 5);
}
