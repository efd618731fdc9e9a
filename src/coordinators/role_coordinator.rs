use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::audit::AuditLogger;
use crate::config::{begin_transaction, commit_transaction};
use crate::coordinators::validation;
use crate::errors::InternalError;
use crate::providers::AuthorizationProvider;
use crate::stores::RoleStore;
use crate::types::db::{permission, role};
use crate::types::internal::Permission;
use crate::types::internal::audit::EventType;
use crate::types::internal::context::RequestContext;

const ROLE_ENTITY: &str = "rol";

/// A role with the permission keys it currently grants
#[derive(Debug, Clone)]
pub struct RoleDetail {
    pub role: role::Model,
    pub permisos: Vec<String>,
}

/// Role coordinator: roles and their permission grants
///
/// Reads and writes both require `usuarios.administrar`.
pub struct RoleCoordinator {
    db: DatabaseConnection,
    role_store: Arc<RoleStore>,
    authorization_provider: AuthorizationProvider,
    audit_logger: Arc<AuditLogger>,
}

impl RoleCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.connections.main.clone(),
            role_store: app_data.role_store.clone(),
            authorization_provider: AuthorizationProvider::new(),
            audit_logger: app_data.audit_logger.clone(),
        }
    }

    pub async fn list_permissions(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<permission::Model>, InternalError> {
        self.authorization_provider.require(ctx, Permission::UsersAdmin)?;

        self.role_store.list_permissions(&self.db).await
    }

    /// Create a role granting `permisos` in one transaction
    ///
    /// # Authorization
    /// Requires `usuarios.administrar`
    ///
    /// # Arguments
    /// * `ctx` - RequestContext with authenticated user info
    /// * `nombre` - Unique role name
    /// * `descripcion` - Optional free text
    /// * `permisos` - Permission ids or claves; repeats are granted once
    ///
    /// # Returns
    /// * `Ok(RoleDetail)` - The role with its granted keys
    /// * `Err(InternalError)` - Missing permission, duplicate name, or an unknown
    ///   permission (nothing is created)
    pub async fn create_role(
        &self,
        ctx: &RequestContext,
        nombre: String,
        descripcion: Option<String>,
        permisos: Vec<String>,
    ) -> Result<RoleDetail, InternalError> {
        self.authorization_provider.require(ctx, Permission::UsersAdmin)?;
        let nombre = validation::required_text("nombre", &nombre)?;
        let permisos = validation::unique_ids(permisos);

        let txn = begin_transaction(&self.db).await?;

        let role = self
            .role_store
            .create(&txn, nombre, validation::optional_text(descripcion))
            .await?;
        for permiso in &permisos {
            let permiso = self.role_store.get_permission(&txn, permiso).await?;
            self.role_store
                .set_permission(&txn, &role.id, &permiso.id, true)
                .await?;
        }

        commit_transaction(txn).await?;

        self.audit_logger
            .entity_event(ctx, EventType::RoleCreated, ROLE_ENTITY, &role.id)
            .add_field("nombre", &role.nombre)
            .add_field("permisos", &permisos)
            .emit()
            .await;

        self.detail(role).await
    }

    pub async fn list_roles(&self, ctx: &RequestContext) -> Result<Vec<RoleDetail>, InternalError> {
        self.authorization_provider.require(ctx, Permission::UsersAdmin)?;

        let roles = self.role_store.list(&self.db).await?;
        let mut details = Vec::with_capacity(roles.len());
        for role in roles {
            details.push(self.detail(role).await?);
        }
        Ok(details)
    }

    pub async fn get_role(
        &self,
        ctx: &RequestContext,
        role_id: &str,
    ) -> Result<RoleDetail, InternalError> {
        self.authorization_provider.require(ctx, Permission::UsersAdmin)?;

        let role = self.role_store.get(&self.db, role_id).await?;
        self.detail(role).await
    }

    /// Delete a role that no user holds
    pub async fn delete_role(&self, ctx: &RequestContext, role_id: &str) -> Result<(), InternalError> {
        self.authorization_provider.require(ctx, Permission::UsersAdmin)?;

        let txn = begin_transaction(&self.db).await?;
        self.role_store.delete(&txn, role_id).await?;
        commit_transaction(txn).await?;

        self.audit_logger
            .entity_event(ctx, EventType::RoleDeleted, ROLE_ENTITY, role_id)
            .emit()
            .await;

        Ok(())
    }

    /// Grant or soft-revoke one permission; the link row is kept either way
    ///
    /// Tokens already issued keep the old permission set until they expire.
    ///
    /// # Arguments
    /// * `ctx` - RequestContext with authenticated user info
    /// * `role_id` - Role to change
    /// * `permiso` - Permission id or clave
    /// * `asignado` - `true` grants, `false` revokes
    ///
    /// # Returns
    /// * `Ok(RoleDetail)` - The role with its granted keys after the change
    /// * `Err(InternalError)` - Missing permission, unknown role or permission
    pub async fn set_role_permission(
        &self,
        ctx: &RequestContext,
        role_id: &str,
        permiso: &str,
        asignado: bool,
    ) -> Result<RoleDetail, InternalError> {
        self.authorization_provider.require(ctx, Permission::UsersAdmin)?;

        let txn = begin_transaction(&self.db).await?;

        let role = self.role_store.get(&txn, role_id).await?;
        let permiso = self.role_store.get_permission(&txn, permiso).await?;
        self.role_store
            .set_permission(&txn, role_id, &permiso.id, asignado)
            .await?;

        commit_transaction(txn).await?;

        self.audit_logger
            .entity_event(ctx, EventType::RolePermissionChanged, ROLE_ENTITY, role_id)
            .add_field("permiso", &permiso.clave)
            .add_field("asignado", asignado)
            .emit()
            .await;

        self.detail(role).await
    }

    async fn detail(&self, role: role::Model) -> Result<RoleDetail, InternalError> {
        let permisos = self
            .role_store
            .granted_keys(&self.db, vec![role.id.clone()])
            .await?;
        Ok(RoleDetail { role, permisos })
    }
}
