use analytics_dashboard_backend::config::AppConfig;
use analytics_dashboard_backend::utils::auth::create_jwt;
use analytics_dashboard_backend::{AppState, create_app};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

const SECRET: &str = "test_secret";

fn test_app() -> Router {
    let config = AppConfig {
        jwt_secret: SECRET.to_string(),
        validator_type: "pass".to_string(),
        ..AppConfig::default()
    };
    create_app(AppState::new(config))
}

async fn get(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }

    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_health_is_public() {
    let app = test_app();
    let (status, json) = get(&app, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["in_flight"], 0);
}

#[tokio::test]
async fn test_datasets_require_a_token() {
    let app = test_app();
    let (status, _) = get(&app, "/datasets", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let app = test_app();
    let (status, _) = get(&app, "/datasets", Some("not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_datasets_require_admin_role() {
    let app = test_app();
    let analyst = create_jwt("analyst_1", "analyst", SECRET).unwrap();
    let admin = create_jwt("admin_1", "admin", SECRET).unwrap();

    let (status, _) = get(&app, "/datasets", Some(&analyst)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, json) = get(&app, "/datasets", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_analytics_require_analyst_role() {
    let app = test_app();
    let analyst = create_jwt("analyst_1", "analyst", SECRET).unwrap();
    let admin = create_jwt("admin_1", "admin", SECRET).unwrap();

    let (status, _) = get(&app, "/stats/analytics", Some(&admin)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, json) = get(&app, "/stats/analytics", Some(&analyst)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["metrics"].as_array().unwrap().len(), 4);
    assert_eq!(json["metrics"][0]["label"], "Financial Inclusion Rate");
    assert_eq!(json["metrics"][0]["value"], "73.2%");
    assert_eq!(json["charts"].as_array().unwrap().len(), 4);
    assert_eq!(json["exportFormats"][2]["format"], "CSV");
}

#[tokio::test]
async fn test_overview_is_role_aware() {
    let app = test_app();
    let analyst = create_jwt("analyst_1", "analyst", SECRET).unwrap();
    let admin = create_jwt("admin_1", "admin", SECRET).unwrap();

    let (status, _) = get(&app, "/stats/overview", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, json) = get(&app, "/stats/overview", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stats"][0]["title"], "Total Datasets");
    assert_eq!(json["recentActivities"].as_array().unwrap().len(), 4);

    let (status, json) = get(&app, "/stats/overview", Some(&analyst)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stats"][0]["title"], "Financial Inclusion Rate");
}
