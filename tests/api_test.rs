use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use glossary_backend::{
    bootstrap, build_router, config::Config, db, services::seed_service::DEFAULT_TERMS, AppState,
};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn app(seed: bool) -> Router {
    let pool = db::connect_in_memory().await.expect("in-memory pool");
    let config = Config { seed_default_terms: seed, ..Config::default() };
    bootstrap(&pool, &config).await.expect("bootstrap");
    build_router(Arc::new(AppState::new(pool)))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap_or_else(|err| panic!("failed to build request: {err}"));

    let response = app
        .clone()
        .oneshot(request)
        .await
        .unwrap_or_else(|err| panic!("router request failed: {err}"));
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap_or_else(|err| panic!("failed to read response body: {err}"));
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn send_raw(app: &Router, request: Request<Body>) -> (StatusCode, String, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .unwrap_or_else(|err| panic!("router request failed: {err}"));
    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let bytes = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap_or_else(|err| panic!("failed to read response body: {err}"));
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|err| panic!("response body is not JSON ({err}): {bytes:?}"));
    (status, content_type, value)
}

fn oracle() -> Value {
    json!({
        "keyword": "Oracle",
        "definition": "A service providing external data to smart contracts.",
        "category": "Технологии"
    })
}

#[tokio::test]
async fn root_and_health() {
    let app = app(false).await;

    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Blockchain Glossary API");
    assert!(body["endpoints"].is_object());

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "healthy", "service": "Blockchain Glossary API" }));
}

#[tokio::test]
async fn oracle_lifecycle() {
    let app = app(false).await;

    let (status, created) = send(&app, "POST", "/terms", Some(oracle())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created["id"].as_i64().is_some());
    assert!(created["created_at"].is_string());
    assert!(created["updated_at"].is_null());
    assert_eq!(created["category"], "Технологии");

    let (status, lower) = send(&app, "GET", "/terms/oracle", None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, exact) = send(&app, "GET", "/terms/Oracle", None).await;
    assert_eq!(lower, exact);
    assert_eq!(lower, created);

    let (status, updated) = send(
        &app,
        "PUT",
        "/terms/Oracle",
        Some(json!({ "category": "Инфраструктура" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["definition"], created["definition"]);
    assert_eq!(updated["category"], "Инфраструктура");
    assert!(updated["updated_at"].is_string());
    assert_eq!(updated["created_at"], created["created_at"]);

    let (status, deleted) = send(&app, "DELETE", "/terms/Oracle", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["deleted_term"]["keyword"], "Oracle");
    assert!(deleted["message"].as_str().unwrap().contains("Oracle"));

    let (status, body) = send(&app, "GET", "/terms/Oracle", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Термин 'Oracle' не найден в глоссарии");
}

#[tokio::test]
async fn duplicate_keyword_is_rejected_with_400() {
    let app = app(true).await;

    let (status, body) = send(
        &app,
        "POST",
        "/terms",
        Some(json!({ "keyword": "blockchain", "definition": "Another blockchain definition" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("уже существует"));
}

#[tokio::test]
async fn validation_errors_are_422() {
    let app = app(false).await;

    let (status, body) = send(
        &app,
        "POST",
        "/terms",
        Some(json!({ "keyword": "   ", "definition": "short" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<_> = body["detail"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(fields, vec!["keyword", "definition"]);

    send(&app, "POST", "/terms", Some(oracle())).await;
    let (status, _) = send(
        &app,
        "PUT",
        "/terms/oracle",
        Some(json!({ "definition": "  tiny  " })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

}

#[tokio::test]
async fn malformed_bodies_get_json_errors() {
    let app = app(false).await;

    // 缺少必填字段
    let request = Request::builder()
        .method("POST")
        .uri("/terms")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "keyword": "Gas" }).to_string()))
        .unwrap();
    let (status, content_type, body) = send_raw(&app, request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(content_type.starts_with("application/json"));
    assert_eq!(body["detail"][0]["field"], "body");
    assert!(body["detail"][0]["message"].as_str().unwrap().contains("definition"));

    // 字段类型错误
    let request = Request::builder()
        .method("POST")
        .uri("/terms")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "keyword": 42, "definition": "Long enough definition" }).to_string()))
        .unwrap();
    let (status, _, body) = send_raw(&app, request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_array());

    // JSON 语法错误
    let request = Request::builder()
        .method("PUT")
        .uri("/terms/Gas")
        .header("content-type", "application/json")
        .body(Body::from("{\"definition\":"))
        .unwrap();
    let (status, content_type, body) = send_raw(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(content_type.starts_with("application/json"));
    assert!(body["detail"].is_string());

    // 缺少 Content-Type
    let request = Request::builder()
        .method("POST")
        .uri("/terms")
        .body(Body::from(oracle().to_string()))
        .unwrap();
    let (status, _, body) = send_raw(&app, request).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn malformed_query_gets_json_error() {
    let app = app(false).await;

    let request = Request::builder().uri("/terms?skip=-1").body(Body::empty()).unwrap();
    let (status, content_type, body) = send_raw(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(content_type.starts_with("application/json"));
    assert!(body["detail"].as_str().unwrap().contains("query"));
}

#[tokio::test]
async fn health_reports_unhealthy_when_storage_is_gone() {
    let pool = db::connect_in_memory().await.expect("in-memory pool");
    bootstrap(&pool, &Config { seed_default_terms: false, ..Config::default() })
        .await
        .expect("bootstrap");
    let app = build_router(Arc::new(AppState::new(pool.clone())));
    pool.close().await;

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");

    let (status, body) = send(&app, "GET", "/terms", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn update_and_delete_missing_term_are_404() {
    let app = app(false).await;

    let (status, _) = send(
        &app,
        "PUT",
        "/terms/Nothing",
        Some(json!({ "definition": "Long enough definition" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/terms/Nothing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_update_sets_updated_at_only() {
    let app = app(false).await;
    let (_, created) = send(&app, "POST", "/terms", Some(oracle())).await;

    let (status, updated) = send(&app, "PUT", "/terms/ORACLE", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["definition"], created["definition"]);
    assert_eq!(updated["category"], created["category"]);
    assert!(updated["updated_at"].is_string());
}

#[tokio::test]
async fn list_filters_and_paginates_seed_data() {
    let app = app(true).await;

    let (status, all) = send(&app, "GET", "/terms", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), DEFAULT_TERMS.len());

    let (_, platforms) = send(&app, "GET", "/terms?category=%D0%9F%D0%BB%D0%B0%D1%82%D1%84%D0%BE%D1%80%D0%BC%D1%8B", None).await;
    let platforms = platforms.as_array().unwrap();
    assert_eq!(platforms.len(), 2);
    assert!(platforms.iter().all(|t| t["category"] == "Платформы"));

    let (_, page) = send(&app, "GET", "/terms?skip=2&limit=3", None).await;
    let keywords: Vec<_> = page
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["keyword"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(keywords, vec!["Smart Contract", "Ethereum", "Hyperledger Fabric"]);

    let (_, unfiltered) = send(&app, "GET", "/terms?category=", None).await;
    assert_eq!(unfiltered.as_array().unwrap().len(), DEFAULT_TERMS.len());
}

#[tokio::test]
async fn categories_endpoint_lists_distinct_categories() {
    let app = app(true).await;

    let (status, body) = send(&app, "GET", "/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    let categories = body["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 7);
    assert!(categories.contains(&json!("Платформы")));
}

#[tokio::test]
async fn percent_encoded_keyword_path_is_decoded() {
    let app = app(true).await;

    let (status, body) = send(&app, "GET", "/terms/smart%20contract", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["keyword"], "Smart Contract");
}
