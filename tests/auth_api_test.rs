mod common;

use common::{ADMIN_EMAIL, TestApp, bearer};
use poem::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;

    let resp = app.client.get("/api/health").send().await;
    resp.assert_status_is_ok();
    let body = resp.json().await;
    let health = body.value().object();
    health.get("status").assert_string("healthy");
    health.get("database").assert_bool(true);
}

#[tokio::test]
async fn test_login_returns_token_and_permissions() {
    let app = TestApp::new().await;

    let resp = app
        .client
        .post("/api/auth/login")
        .body_json(&json!({ "email": ADMIN_EMAIL, "password": app.admin_password }))
        .send()
        .await;
    resp.assert_status_is_ok();

    let body = resp.json().await;
    let token = body.value().object();
    token.get("token_type").assert_string("Bearer");
    assert_eq!(token.get("permisos").array().len(), 7);
}

#[tokio::test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let app = TestApp::new().await;

    let resp = app
        .client
        .post("/api/auth/login")
        .body_json(&json!({ "email": ADMIN_EMAIL, "password": "not-the-password" }))
        .send()
        .await;

    resp.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_whoami_echoes_claims() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let resp = app
        .client
        .get("/api/auth/whoami")
        .header("Authorization", bearer(&token))
        .send()
        .await;
    resp.assert_status_is_ok();
    resp.json().await.value().object().get("email").assert_string(ADMIN_EMAIL);
}

#[tokio::test]
async fn test_protected_endpoint_requires_token() {
    let app = TestApp::new().await;

    app.client
        .get("/api/orders")
        .send()
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    app.client
        .get("/api/orders")
        .header("Authorization", "Bearer not-a-jwt")
        .send()
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}
