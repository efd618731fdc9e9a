// Test utilities shared across unit tests
// Only compiled when running tests

use std::sync::Arc;

use migration::{AuditMigrator, MainMigrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

use crate::app_data::AppData;
use crate::config::{DatabaseConnections, MockEnvironment, SecretManager};
use crate::stores::{
    BudgetCodeStore, NewBudgetCode, NewUser, RoleStore, UserStore, unix_now,
};
use crate::types::db::{budget_code, purchase_order, user};
use crate::types::internal::auth::Claims;
use crate::types::internal::context::RequestContext;
use crate::types::internal::{OrderStatus, Permission, PricedItem};

pub const TEST_JWT_SECRET: &str = "test-secret-key-minimum-32-characters-long";
pub const TEST_PEPPER: &str = "test-pepper-for-unit-tests";

const DAY: i64 = 86_400;

/// Creates main and audit in-memory databases with migrations applied
///
/// ```rust
/// let (db, _audit_db) = setup_test_databases().await;
/// ```
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

pub fn test_secret_manager() -> Arc<SecretManager> {
    let env = MockEnvironment::empty()
        .with_var("JWT_SECRET", TEST_JWT_SECRET)
        .with_var("PASSWORD_PEPPER", TEST_PEPPER);

    Arc::new(SecretManager::init_with_env(&env).expect("test secrets are valid"))
}

/// Full AppData over fresh in-memory databases
pub async fn setup_test_app_data() -> Arc<AppData> {
    let (main, audit) = setup_test_databases().await;
    let connections = DatabaseConnections { main, audit };

    Arc::new(AppData::with_secrets(connections, test_secret_manager()))
}

/// Authenticated API context whose claims carry exactly `permissions`
pub fn ctx_with_permissions(user_id: &str, permissions: &[Permission]) -> RequestContext {
    let now = unix_now();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: now + 900,
        iat: now,
        jti: Uuid::new_v4().to_string(),
        email: format!("{}@example.mx", user_id),
        permisos: permissions.iter().map(|p| p.key().to_string()).collect(),
    };

    RequestContext::new().with_actor_id(user_id).with_auth(claims)
}

/// Unsaved order owned by `user_id`, charged to `cp-1`
pub fn sample_order(user_id: &str, estado: OrderStatus, monto: i64) -> purchase_order::Model {
    let now = unix_now();
    purchase_order::Model {
        id: "order-1".to_string(),
        numero: 1,
        folio: purchase_order::folio_for(1),
        usuario_id: user_id.to_string(),
        cp_id: "cp-1".to_string(),
        proveedor_id: None,
        descripcion: "Material de oficina".to_string(),
        monto,
        estado,
        motivo_rechazo: None,
        usuario_actualizacion_id: user_id.to_string(),
        created_at: now,
        updated_at: now,
    }
}

/// Unsaved budget code `cp-1`, in force from yesterday for a year
pub fn sample_budget_code(presupuesto: i64, disponible: i64) -> budget_code::Model {
    let now = unix_now();
    budget_code::Model {
        id: "cp-1".to_string(),
        codigo: "CP-001".to_string(),
        nombre: "Papelería".to_string(),
        area_id: None,
        monto_presupuesto: presupuesto,
        monto_disponible: disponible,
        vigencia_inicio: now - DAY,
        vigencia_fin: now + 365 * DAY,
        created_at: now,
        updated_at: now,
    }
}

pub async fn insert_user(db: &DatabaseConnection, email: &str) -> user::Model {
    UserStore::new()
        .create(
            db,
            NewUser {
                nombre: email.split('@').next().unwrap_or(email).to_string(),
                email: email.to_string(),
                password_hash: "not-a-real-hash".to_string(),
                area_id: None,
            },
        )
        .await
        .expect("Failed to insert test user")
}

/// Budget code in force from yesterday for a year
pub async fn insert_budget_code(
    db: &DatabaseConnection,
    codigo: &str,
    presupuesto: i64,
) -> budget_code::Model {
    let now = unix_now();
    BudgetCodeStore::new()
        .create(
            db,
            NewBudgetCode {
                codigo: codigo.to_string(),
                nombre: format!("Partida {}", codigo),
                area_id: None,
                monto_presupuesto: presupuesto,
                vigencia_inicio: now - DAY,
                vigencia_fin: now + 365 * DAY,
            },
        )
        .await
        .expect("Failed to insert test budget code")
}

/// Give `user_id` a fresh role granting `permissions`
pub async fn grant_permissions(db: &DatabaseConnection, user_id: &str, permissions: &[Permission]) {
    let roles = RoleStore::new();
    let role = roles
        .create(db, format!("role-{}", Uuid::new_v4()), None)
        .await
        .expect("Failed to create test role");

    for permission in permissions {
        let permiso = roles
            .get_permission(db, permission.key())
            .await
            .expect("permission is seeded");
        roles
            .set_permission(db, &role.id, &permiso.id, true)
            .await
            .expect("Failed to grant test permission");
    }

    let users = UserStore::new();
    let mut role_ids = users.role_ids(db, user_id).await.expect("Failed to read roles");
    role_ids.push(role.id);
    users
        .set_roles(db, user_id, &role_ids)
        .await
        .expect("Failed to assign test role");
}

pub fn priced_item(descripcion: &str, cantidad: i64, precio_unitario: i64) -> PricedItem {
    PricedItem {
        producto_id: None,
        descripcion: descripcion.to_string(),
        cantidad,
        precio_unitario,
        importe: cantidad * precio_unitario,
    }
}
