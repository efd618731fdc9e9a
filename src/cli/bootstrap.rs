// Bootstrap command implementation
// Seeds the default roles and the first administrator account

use crate::app_data::AppData;
use crate::config::{begin_transaction, commit_transaction};
use crate::errors::InternalError;
use crate::stores::NewUser;
use crate::types::internal::Permission;
use crate::types::internal::audit::EventType;
use crate::types::internal::context::RequestContext;

pub const ADMIN_ROLE: &str = "Administrador";
pub const REQUESTER_ROLE: &str = "Solicitante";
pub const APPROVER_ROLE: &str = "Aprobador";

/// Roles seeded by bootstrap; `None` grants every permission in the catalog
const DEFAULT_ROLES: [(&str, &str, Option<&[Permission]>); 3] = [
    (ADMIN_ROLE, "Acceso total al sistema", None),
    (
        REQUESTER_ROLE,
        "Crea y da seguimiento a sus órdenes de compra",
        Some(&[Permission::OrdersCreate]),
    ),
    (
        APPROVER_ROLE,
        "Revisa y aprueba órdenes de compra",
        Some(&[Permission::OrdersApprove, Permission::OrdersViewAll]),
    ),
];

/// What bootstrap created; the password is only available here
#[derive(Debug)]
pub struct BootstrapReport {
    pub admin_user_id: String,
    pub admin_email: String,
    pub admin_password: String,
    pub roles_created: Vec<String>,
}

/// Bootstrap the system and print the generated credentials once
///
/// The CLI session is audited whether or not bootstrap succeeds.
pub async fn bootstrap_system(
    app_data: &AppData,
    email: &str,
    nombre: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n=== Procurement Bootstrap ===\n");

    let ctx = RequestContext::for_cli("bootstrap");
    app_data.audit_logger.log_cli_session_start(&ctx, "bootstrap").await;

    let result = seed(app_data, &ctx, email, nombre).await;

    match &result {
        Ok(_) => {
            app_data
                .audit_logger
                .log_cli_session_end(&ctx, "bootstrap", true, None)
                .await
        }
        Err(e) => {
            app_data
                .audit_logger
                .log_cli_session_end(&ctx, "bootstrap", false, Some(e.to_string()))
                .await
        }
    }

    let report = result?;

    if report.roles_created.is_empty() {
        println!("Default roles already present");
    } else {
        println!("✓ Roles created: {}", report.roles_created.join(", "));
    }
    println!("\n✓ Administrator account created");
    println!("  E-mail:   {}", report.admin_email);
    println!("  Password: {}", report.admin_password);
    println!("\n⚠️  This password is shown only once. Store it now.\n");

    Ok(())
}

/// Create missing default roles and the administrator, in one transaction
///
/// Existing roles are left as they are. Fails if the e-mail is already taken.
pub async fn seed(
    app_data: &AppData,
    ctx: &RequestContext,
    email: &str,
    nombre: &str,
) -> Result<BootstrapReport, InternalError> {
    let email = email.trim().to_lowercase();
    if !email.contains('@') {
        return Err(InternalError::validation("email", "must be an e-mail address"));
    }

    let db = &app_data.connections.main;
    let role_store = &app_data.role_store;
    let txn = begin_transaction(db).await?;

    let catalog = role_store.list_permissions(&txn).await?;
    let mut roles_created = Vec::new();
    let mut admin_role_id = None;

    for (role_name, descripcion, grants) in DEFAULT_ROLES {
        let role = match role_store.find_by_name(&txn, role_name).await? {
            Some(existing) => existing,
            None => {
                let role = role_store
                    .create(&txn, role_name.to_string(), Some(descripcion.to_string()))
                    .await?;
                for permiso in &catalog {
                    let granted = match grants {
                        None => true,
                        Some(keys) => keys.iter().any(|p| p.key() == permiso.clave),
                    };
                    if granted {
                        role_store.set_permission(&txn, &role.id, &permiso.id, true).await?;
                    }
                }
                roles_created.push(role_name.to_string());
                role
            }
        };
        if role_name == ADMIN_ROLE {
            admin_role_id = Some(role.id);
        }
    }

    let admin_role_id = admin_role_id
        .ok_or_else(|| InternalError::validation("roles", "administrator role missing"))?;

    let admin_password = app_data.crypto_provider.generate_secure_password();
    let password_hash = app_data.crypto_provider.hash_password(&admin_password)?;
    let admin = app_data
        .user_store
        .create(
            &txn,
            NewUser {
                nombre: nombre.trim().to_string(),
                email: email.clone(),
                password_hash,
                area_id: None,
            },
        )
        .await?;
    app_data
        .user_store
        .set_roles(&txn, &admin.id, &[admin_role_id])
        .await?;

    commit_transaction(txn).await?;

    app_data
        .audit_logger
        .entity_event(ctx, EventType::UserCreated, "usuario", &admin.id)
        .add_field("email", &admin.email)
        .add_field("roles", [ADMIN_ROLE])
        .emit()
        .await;

    tracing::info!("Bootstrap created administrator {}", admin.id);

    Ok(BootstrapReport {
        admin_user_id: admin.id,
        admin_email: admin.email,
        admin_password,
        roles_created,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::internal::UserError;
    use crate::test::utils::setup_test_app_data;

    #[tokio::test]
    async fn test_seed_creates_roles_and_admin_with_every_permission() {
        let app_data = setup_test_app_data().await;
        let ctx = RequestContext::for_cli("bootstrap");

        let report = seed(&app_data, &ctx, "Admin@Example.mx", "Administración").await.unwrap();

        assert_eq!(report.admin_email, "admin@example.mx");
        assert_eq!(report.roles_created, vec![ADMIN_ROLE, REQUESTER_ROLE, APPROVER_ROLE]);

        let db = &app_data.connections.main;
        let permisos = app_data
            .role_store
            .effective_permissions(db, &report.admin_user_id)
            .await
            .unwrap();
        assert_eq!(permisos.len(), Permission::ALL.len());

        let login_hash = app_data
            .user_store
            .get(db, &report.admin_user_id)
            .await
            .unwrap()
            .password_hash;
        assert!(app_data
            .crypto_provider
            .verify_password(&report.admin_password, &login_hash)
            .unwrap());
    }

    #[tokio::test]
    async fn test_second_run_keeps_roles_and_rejects_same_email() {
        let app_data = setup_test_app_data().await;
        let ctx = RequestContext::for_cli("bootstrap");
        seed(&app_data, &ctx, "admin@example.mx", "Admin").await.unwrap();

        let again = seed(&app_data, &ctx, "admin@example.mx", "Admin").await;
        assert!(matches!(
            again,
            Err(InternalError::User(UserError::DuplicateEmail { .. }))
        ));

        let other = seed(&app_data, &ctx, "otro@example.mx", "Otro").await.unwrap();
        assert!(other.roles_created.is_empty());
        let roles = app_data.role_store.list(&app_data.connections.main).await.unwrap();
        assert_eq!(roles.len(), 3);
    }

    #[tokio::test]
    async fn test_requester_role_only_creates_orders() {
        let app_data = setup_test_app_data().await;
        let ctx = RequestContext::for_cli("bootstrap");
        seed(&app_data, &ctx, "admin@example.mx", "Admin").await.unwrap();

        let db = &app_data.connections.main;
        let role = app_data
            .role_store
            .find_by_name(db, REQUESTER_ROLE)
            .await
            .unwrap()
            .unwrap();
        let keys = app_data.role_store.granted_keys(db, vec![role.id]).await.unwrap();

        assert_eq!(keys, vec![Permission::OrdersCreate.key().to_string()]);
    }
}
