mod common;

use common::{DAY, TestApp, bearer, now};
use poem::http::StatusCode;
use procurement_backend::cli::bootstrap::{APPROVER_ROLE, REQUESTER_ROLE};
use serde_json::json;

const REQUESTER_EMAIL: &str = "ana@example.mx";
const REQUESTER_PASSWORD: &str = "ana-password-123";

/// Budget code of `presupuesto` centavos in force for the next month
async fn create_budget_code(app: &TestApp, admin: &str, codigo: &str, presupuesto: i64) -> String {
    let resp = app
        .client
        .post("/api/budget-codes")
        .header("Authorization", bearer(admin))
        .body_json(&json!({
            "codigo": codigo,
            "nombre": "Papelería",
            "monto_presupuesto": presupuesto,
            "vigencia_inicio": now() - DAY,
            "vigencia_fin": now() + 30 * DAY,
        }))
        .send()
        .await;
    resp.assert_status_is_ok();

    let body = resp.json().await;
    body.value().object().get("id").string().to_string()
}

async fn create_requester(app: &TestApp, admin: &str, cp_id: &str) {
    let role_id = app.role_id(REQUESTER_ROLE).await;
    let resp = app
        .client
        .post("/api/users")
        .header("Authorization", bearer(admin))
        .body_json(&json!({
            "nombre": "Ana",
            "email": REQUESTER_EMAIL,
            "password": REQUESTER_PASSWORD,
            "role_ids": [role_id],
            "cp_ids": [cp_id],
        }))
        .send()
        .await;
    resp.assert_status_is_ok();
}

async fn create_order(app: &TestApp, token: &str, cp_id: &str) -> String {
    let resp = app
        .client
        .post("/api/orders")
        .header("Authorization", bearer(token))
        .body_json(&json!({
            "cp_id": cp_id,
            "descripcion": "Papel para impresora",
            "items": [
                { "descripcion": "Resma carta", "cantidad": 10, "precio_unitario": 5000 }
            ],
        }))
        .send()
        .await;
    resp.assert_status_is_ok();

    let body = resp.json().await;
    let order = body.value().object().get("order").object();
    order.get("estado").assert_string("Nueva");
    order.get("monto").assert_i64(50_000);
    order.get("folio").assert_string("OC-000001");
    order.get("id").string().to_string()
}

async fn post_action(app: &TestApp, token: &str, order_id: &str, action: &str) -> poem::test::TestResponse {
    app.client
        .post(format!("/api/orders/{}/{}", order_id, action))
        .header("Authorization", bearer(token))
        .send()
        .await
}

#[tokio::test]
async fn test_order_lifecycle_debits_budget_code() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let cp_id = create_budget_code(&app, &admin, "CP-100", 100_000).await;
    create_requester(&app, &admin, &cp_id).await;
    let ana = app.login(REQUESTER_EMAIL, REQUESTER_PASSWORD).await;

    let order_id = create_order(&app, &ana, &cp_id).await;

    let resp = post_action(&app, &ana, &order_id, "submit").await;
    resp.assert_status_is_ok();
    resp.json()
        .await
        .value()
        .object()
        .get("order")
        .object()
        .get("estado")
        .assert_string("EnRevision");

    // Requester role cannot approve
    post_action(&app, &ana, &order_id, "approve")
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let resp = post_action(&app, &admin, &order_id, "approve").await;
    resp.assert_status_is_ok();

    let resp = app
        .client
        .get(format!("/api/budget-codes/{}/balance", cp_id))
        .header("Authorization", bearer(&admin))
        .send()
        .await;
    resp.assert_status_is_ok();
    let body = resp.json().await;
    let balance = body.value().object();
    balance.get("monto_disponible").assert_i64(50_000);
    balance.get("monto_comprometido").assert_i64(50_000);

    post_action(&app, &ana, &order_id, "request-close")
        .await
        .assert_status_is_ok();
    let resp = post_action(&app, &admin, &order_id, "close").await;
    resp.assert_status_is_ok();
    resp.json()
        .await
        .value()
        .object()
        .get("order")
        .object()
        .get("estado")
        .assert_string("Cerrada");

    // Approved and closed
    let resp = app
        .client
        .get("/api/notifications/unread-count")
        .header("Authorization", bearer(&ana))
        .send()
        .await;
    resp.assert_status_is_ok();
    resp.json().await.value().object().get("count").assert_i64(2);
}

#[tokio::test]
async fn test_approval_fails_without_enough_budget() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let cp_id = create_budget_code(&app, &admin, "CP-200", 10_000).await;
    create_requester(&app, &admin, &cp_id).await;
    let ana = app.login(REQUESTER_EMAIL, REQUESTER_PASSWORD).await;

    let order_id = create_order(&app, &ana, &cp_id).await;
    post_action(&app, &ana, &order_id, "submit")
        .await
        .assert_status_is_ok();

    let resp = post_action(&app, &admin, &order_id, "approve").await;
    resp.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    resp.json()
        .await
        .value()
        .object()
        .get("error")
        .assert_string("insufficient_budget");

    let resp = app
        .client
        .get(format!("/api/orders/{}", order_id))
        .header("Authorization", bearer(&ana))
        .send()
        .await;
    resp.assert_status_is_ok();
    resp.json()
        .await
        .value()
        .object()
        .get("order")
        .object()
        .get("estado")
        .assert_string("EnRevision");
}

#[tokio::test]
async fn test_reject_requires_reason() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let cp_id = create_budget_code(&app, &admin, "CP-300", 100_000).await;
    create_requester(&app, &admin, &cp_id).await;
    let ana = app.login(REQUESTER_EMAIL, REQUESTER_PASSWORD).await;

    let order_id = create_order(&app, &ana, &cp_id).await;
    post_action(&app, &ana, &order_id, "submit")
        .await
        .assert_status_is_ok();

    let reject_path = format!("/api/orders/{}/reject", order_id);
    app.client
        .post(&reject_path)
        .header("Authorization", bearer(&admin))
        .body_json(&json!({}))
        .send()
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let resp = app
        .client
        .post(&reject_path)
        .header("Authorization", bearer(&admin))
        .body_json(&json!({ "motivo": "Proveedor no autorizado" }))
        .send()
        .await;
    resp.assert_status_is_ok();
    let body = resp.json().await;
    let order = body.value().object().get("order").object();
    order.get("estado").assert_string("Rechazada");
    order.get("motivo_rechazo").assert_string("Proveedor no autorizado");
}

#[tokio::test]
async fn test_requester_cannot_see_other_users_orders() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let cp_id = create_budget_code(&app, &admin, "CP-400", 100_000).await;
    create_requester(&app, &admin, &cp_id).await;
    let ana = app.login(REQUESTER_EMAIL, REQUESTER_PASSWORD).await;
    let order_id = create_order(&app, &ana, &cp_id).await;

    let role_id = app.role_id(REQUESTER_ROLE).await;
    app.client
        .post("/api/users")
        .header("Authorization", bearer(&admin))
        .body_json(&json!({
            "nombre": "Luis",
            "email": "luis@example.mx",
            "password": "luis-password-123",
            "role_ids": [role_id],
            "cp_ids": [cp_id],
        }))
        .send()
        .await
        .assert_status_is_ok();
    let luis = app.login("luis@example.mx", "luis-password-123").await;

    app.client
        .get(format!("/api/orders/{}", order_id))
        .header("Authorization", bearer(&luis))
        .send()
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let resp = app
        .client
        .get("/api/orders")
        .header("Authorization", bearer(&luis))
        .send()
        .await;
    resp.assert_status_is_ok();
    assert!(resp.json().await.value().array().is_empty());
}

#[tokio::test]
async fn test_bootstrap_roles_are_listed() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let resp = app
        .client
        .get("/api/roles")
        .header("Authorization", bearer(&admin))
        .send()
        .await;
    resp.assert_status_is_ok();

    let body = resp.json().await;
    let roles = body.value().object_array();
    let names: Vec<&str> = roles.iter().map(|r| r.get("nombre").string()).collect();
    assert!(names.contains(&REQUESTER_ROLE));
    assert!(names.contains(&APPROVER_ROLE));
    assert_eq!(roles.len(), 3);
}
