// Common test utilities for integration tests
#![allow(dead_code)]

use std::sync::Arc;

use migration::{AuditMigrator, MainMigrator, MigratorTrait};
use poem::Route;
use poem::test::TestClient;
use procurement_backend::AppData;
use procurement_backend::api;
use procurement_backend::cli::bootstrap;
use procurement_backend::config::{DatabaseConnections, MockEnvironment, SecretManager};
use procurement_backend::types::internal::context::RequestContext;
use sea_orm::{Database, DatabaseConnection};
use serde_json::json;

pub const TEST_JWT_SECRET: &str = "integration-secret-key-at-least-32-chars";
pub const TEST_PEPPER: &str = "integration-pepper-value";
pub const ADMIN_EMAIL: &str = "admin@example.mx";

pub const DAY: i64 = 86_400;

/// Creates main and audit in-memory databases with migrations applied
pub async fn setup_test_databases() -> (DatabaseConnection, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    MainMigrator::up(&db, None)
        .await
        .expect("Failed to run main migrations");

    let audit_db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create audit database");
    AuditMigrator::up(&audit_db, None)
        .await
        .expect("Failed to run audit migrations");

    (db, audit_db)
}

pub fn test_env() -> MockEnvironment {
    MockEnvironment::empty()
        .with_var("JWT_SECRET", TEST_JWT_SECRET)
        .with_var("PASSWORD_PEPPER", TEST_PEPPER)
}

pub async fn setup_app_data() -> Arc<AppData> {
    let (main, audit) = setup_test_databases().await;
    let secret_manager =
        Arc::new(SecretManager::init_with_env(&test_env()).expect("test secrets are valid"));

    Arc::new(AppData::with_secrets(
        DatabaseConnections { main, audit },
        secret_manager,
    ))
}

/// Running application seeded by `bootstrap`, plus the admin's password
pub struct TestApp {
    pub app_data: Arc<AppData>,
    pub client: TestClient<Route>,
    pub admin_password: String,
}

impl TestApp {
    pub async fn new() -> Self {
        let app_data = setup_app_data().await;
        let report = bootstrap::seed(
            &app_data,
            &RequestContext::for_cli("bootstrap"),
            ADMIN_EMAIL,
            "Administrador",
        )
        .await
        .expect("bootstrap should succeed on an empty database");

        let client = TestClient::new(api::routes(app_data.clone(), "http://localhost:3000"));

        Self {
            app_data,
            client,
            admin_password: report.admin_password,
        }
    }

    /// Log in and return the access token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let resp = self
            .client
            .post("/api/auth/login")
            .body_json(&json!({ "email": email, "password": password }))
            .send()
            .await;
        resp.assert_status_is_ok();

        let body = resp.json().await;
        body.value().object().get("access_token").string().to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_EMAIL, &self.admin_password).await
    }

    pub async fn role_id(&self, nombre: &str) -> String {
        self.app_data
            .role_store
            .find_by_name(&self.app_data.connections.main, nombre)
            .await
            .expect("role lookup")
            .expect("role is seeded by bootstrap")
            .id
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}
