use std::sync::Arc;

use sea_orm::{ConnectionTrait, DatabaseConnection};

use crate::app_data::AppData;
use crate::audit::AuditLogger;
use crate::config::{begin_transaction, commit_transaction};
use crate::coordinators::validation;
use crate::errors::InternalError;
use crate::providers::{AuthorizationProvider, CryptoProvider};
use crate::stores::{
    AreaStore, BudgetCodeStore, NewUser, RoleStore, UserChanges, UserFilter, UserStore,
};
use crate::types::db::user;
use crate::types::internal::audit::EventType;
use crate::types::internal::context::RequestContext;
use crate::types::internal::{Permission, UserStatus};

const USER_ENTITY: &str = "usuario";

/// Input for creating a user
#[derive(Debug, Clone, Default)]
pub struct CreateUserInput {
    pub nombre: String,
    pub email: String,
    /// Generated when absent
    pub password: Option<String>,
    pub area_id: Option<String>,
    pub role_ids: Vec<String>,
    pub cp_ids: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CreatedUser {
    pub user: user::Model,
    /// Only set when the password was generated; shown once
    pub generated_password: Option<String>,
}

/// A user with their role and budget code assignments
#[derive(Debug, Clone)]
pub struct UserDetail {
    pub user: user::Model,
    pub role_ids: Vec<String>,
    pub cp_ids: Vec<String>,
    pub permisos: Vec<String>,
}

/// User coordinator that orchestrates account administration
///
/// Every operation requires `usuarios.administrar` except the caller's own
/// profile, preferences and permissions.
pub struct UserCoordinator {
    db: DatabaseConnection,
    user_store: Arc<UserStore>,
    role_store: Arc<RoleStore>,
    area_store: Arc<AreaStore>,
    budget_code_store: Arc<BudgetCodeStore>,
    crypto_provider: Arc<CryptoProvider>,
    authorization_provider: AuthorizationProvider,
    audit_logger: Arc<AuditLogger>,
}

impl UserCoordinator {
    /// Create UserCoordinator from AppData
    ///
    /// # Arguments
    /// * `app_data` - Application data containing all stores and configuration
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.connections.main.clone(),
            user_store: app_data.user_store.clone(),
            role_store: app_data.role_store.clone(),
            area_store: app_data.area_store.clone(),
            budget_code_store: app_data.budget_code_store.clone(),
            crypto_provider: app_data.crypto_provider.clone(),
            authorization_provider: AuthorizationProvider::new(),
            audit_logger: app_data.audit_logger.clone(),
        }
    }

    /// Create a user with their roles and budget codes in one transaction
    ///
    /// # Authorization
    /// Requires `usuarios.administrar`
    ///
    /// # Arguments
    /// * `ctx` - RequestContext with authenticated user info
    /// * `input` - Profile, optional password, and assignments; repeated ids are linked once
    ///
    /// # Returns
    /// * `Ok(CreatedUser)` - The user, plus the generated password when none was given
    /// * `Err(InternalError)` - Validation, duplicate e-mail, or an unknown area,
    ///   role or budget code (nothing is created)
    pub async fn create_user(
        &self,
        ctx: &RequestContext,
        input: CreateUserInput,
    ) -> Result<CreatedUser, InternalError> {
        self.authorization_provider.require(ctx, Permission::UsersAdmin)?;

        let nombre = validation::required_text("nombre", &input.nombre)?;
        let email = validation::normalized_email(&input.email)?;
        let (password, generated_password) = match input.password {
            Some(password) => {
                validation::password(&password)?;
                (password, None)
            }
            None => {
                let generated = self.crypto_provider.generate_secure_password();
                (generated.clone(), Some(generated))
            }
        };
        let password_hash = self.crypto_provider.hash_password(&password)?;

        let txn = begin_transaction(&self.db).await?;

        let area_id = validation::optional_text(input.area_id);
        if let Some(area_id) = &area_id {
            self.area_store.get(&txn, area_id).await?;
        }
        let role_ids = validation::unique_ids(input.role_ids);
        let cp_ids = validation::unique_ids(input.cp_ids);
        self.role_store.ensure_exist(&txn, &role_ids).await?;
        self.ensure_budget_codes_exist(&txn, &cp_ids).await?;

        let user = self
            .user_store
            .create(
                &txn,
                NewUser {
                    nombre,
                    email,
                    password_hash,
                    area_id,
                },
            )
            .await?;
        self.user_store.set_roles(&txn, &user.id, &role_ids).await?;
        self.user_store.set_budget_codes(&txn, &user.id, &cp_ids).await?;

        commit_transaction(txn).await?;

        self.audit_logger
            .entity_event(ctx, EventType::UserCreated, USER_ENTITY, &user.id)
            .add_field("email", &user.email)
            .add_field("role_ids", &role_ids)
            .add_field("cp_ids", &cp_ids)
            .emit()
            .await;

        tracing::info!("User {} created by {}", user.id, ctx.actor_id);

        Ok(CreatedUser {
            user,
            generated_password,
        })
    }

    pub async fn list_users(
        &self,
        ctx: &RequestContext,
        filter: UserFilter,
    ) -> Result<Vec<user::Model>, InternalError> {
        self.authorization_provider.require(ctx, Permission::UsersAdmin)?;

        self.user_store.list(&self.db, &filter).await
    }

    pub async fn get_user(
        &self,
        ctx: &RequestContext,
        user_id: &str,
    ) -> Result<UserDetail, InternalError> {
        self.require_admin_or_self(ctx, user_id)?;

        let user = self.user_store.get(&self.db, user_id).await?;
        self.detail(user).await
    }

    /// Profile of the caller
    pub async fn current_user(&self, ctx: &RequestContext) -> Result<UserDetail, InternalError> {
        let user_id = self.authorization_provider.authenticated_user(ctx)?;

        let user = self.user_store.get(&self.db, user_id).await?;
        self.detail(user).await
    }

    pub async fn update_user(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        changes: UserChanges,
    ) -> Result<user::Model, InternalError> {
        self.authorization_provider.require(ctx, Permission::UsersAdmin)?;

        let changes = UserChanges {
            nombre: changes
                .nombre
                .map(|n| validation::required_text("nombre", &n))
                .transpose()?,
            email: changes
                .email
                .map(|e| validation::normalized_email(&e))
                .transpose()?,
            area_id: changes.area_id.map(validation::optional_text),
            estado: changes.estado,
        };
        if changes.estado == Some(UserStatus::Inactivo) {
            self.ensure_not_self(ctx, user_id)?;
        }

        let txn = begin_transaction(&self.db).await?;

        if let Some(Some(area_id)) = &changes.area_id {
            self.area_store.get(&txn, area_id).await?;
        }
        let current = self.user_store.get(&txn, user_id).await?;
        let updated = self.user_store.update(&txn, current, changes).await?;

        commit_transaction(txn).await?;

        self.audit_logger
            .entity_event(ctx, EventType::UserUpdated, USER_ENTITY, &updated.id)
            .add_field("email", &updated.email)
            .add_field("estado", updated.estado)
            .add_field("area_id", &updated.area_id)
            .emit()
            .await;

        Ok(updated)
    }

    /// Mark the account inactive; its orders and history stay untouched
    pub async fn deactivate_user(
        &self,
        ctx: &RequestContext,
        user_id: &str,
    ) -> Result<user::Model, InternalError> {
        self.update_user(
            ctx,
            user_id,
            UserChanges {
                estado: Some(UserStatus::Inactivo),
                ..Default::default()
            },
        )
        .await
    }

    /// Replace the user's roles
    ///
    /// Tokens already issued keep their permissions until they expire.
    ///
    /// # Authorization
    /// Requires `usuarios.administrar`
    ///
    /// # Arguments
    /// * `ctx` - RequestContext with authenticated user info
    /// * `user_id` - The user to change
    /// * `role_ids` - The complete new role set; repeats are ignored
    ///
    /// # Returns
    /// * `Ok(UserDetail)` - The user with the assignments now stored
    /// * `Err(InternalError)` - Missing permission, unknown user, or unknown role
    pub async fn set_user_roles(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        role_ids: Vec<String>,
    ) -> Result<UserDetail, InternalError> {
        self.authorization_provider.require(ctx, Permission::UsersAdmin)?;
        let role_ids = validation::unique_ids(role_ids);

        let txn = begin_transaction(&self.db).await?;

        let user = self.user_store.get(&txn, user_id).await?;
        self.role_store.ensure_exist(&txn, &role_ids).await?;
        self.user_store.set_roles(&txn, user_id, &role_ids).await?;

        commit_transaction(txn).await?;

        self.audit_logger
            .entity_event(ctx, EventType::UserRolesChanged, USER_ENTITY, user_id)
            .add_field("role_ids", &role_ids)
            .emit()
            .await;

        self.detail(user).await
    }

    /// Replace the budget codes the user may charge orders to
    ///
    /// # Arguments
    /// * `ctx` - RequestContext; requires `usuarios.administrar`
    /// * `user_id` - The user to change
    /// * `cp_ids` - The complete new set; repeats are ignored
    ///
    /// # Returns
    /// * `Ok(UserDetail)` - The user with the assignments now stored
    /// * `Err(InternalError)` - Missing permission, unknown user, or unknown budget code
    pub async fn set_user_budget_codes(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        cp_ids: Vec<String>,
    ) -> Result<UserDetail, InternalError> {
        self.authorization_provider.require(ctx, Permission::UsersAdmin)?;
        let cp_ids = validation::unique_ids(cp_ids);

        let txn = begin_transaction(&self.db).await?;

        let user = self.user_store.get(&txn, user_id).await?;
        self.ensure_budget_codes_exist(&txn, &cp_ids).await?;
        self.user_store.set_budget_codes(&txn, user_id, &cp_ids).await?;

        commit_transaction(txn).await?;

        self.audit_logger
            .entity_event(ctx, EventType::UserBudgetCodesChanged, USER_ENTITY, user_id)
            .add_field("cp_ids", &cp_ids)
            .emit()
            .await;

        self.detail(user).await
    }

    /// Store the caller's UI preferences; must be a JSON object
    pub async fn update_preferences(
        &self,
        ctx: &RequestContext,
        preferences: serde_json::Value,
    ) -> Result<serde_json::Value, InternalError> {
        let user_id = self.authorization_provider.authenticated_user(ctx)?;

        if !preferences.is_object() {
            return Err(InternalError::validation("preferences", "must be a JSON object"));
        }
        let serialized = serde_json::to_string(&preferences)
            .map_err(|e| InternalError::parse("preferences", e.to_string()))?;

        let current = self.user_store.get(&self.db, user_id).await?;
        self.user_store
            .set_preferences(&self.db, current, serialized)
            .await?;

        Ok(preferences)
    }

    /// Permission keys the user currently holds through their roles
    pub async fn effective_permissions(
        &self,
        ctx: &RequestContext,
        user_id: &str,
    ) -> Result<Vec<String>, InternalError> {
        self.require_admin_or_self(ctx, user_id)?;

        self.user_store.get(&self.db, user_id).await?;
        self.role_store.effective_permissions(&self.db, user_id).await
    }

    async fn detail(&self, user: user::Model) -> Result<UserDetail, InternalError> {
        let role_ids = self.user_store.role_ids(&self.db, &user.id).await?;
        let cp_ids = self.user_store.budget_code_ids(&self.db, &user.id).await?;
        let permisos = self.role_store.granted_keys(&self.db, role_ids.clone()).await?;

        Ok(UserDetail {
            user,
            role_ids,
            cp_ids,
            permisos,
        })
    }

    async fn ensure_budget_codes_exist<C: ConnectionTrait>(
        &self,
        conn: &C,
        cp_ids: &[String],
    ) -> Result<(), InternalError> {
        for cp_id in cp_ids {
            self.budget_code_store.get(conn, cp_id).await?;
        }
        Ok(())
    }

    fn require_admin_or_self(&self, ctx: &RequestContext, user_id: &str) -> Result<(), InternalError> {
        let caller = self.authorization_provider.authenticated_user(ctx)?;
        if caller != user_id {
            self.authorization_provider.require(ctx, Permission::UsersAdmin)?;
        }
        Ok(())
    }

    fn ensure_not_self(&self, ctx: &RequestContext, user_id: &str) -> Result<(), InternalError> {
        if ctx.user_id() == Some(user_id) {
            return Err(InternalError::validation(
                "estado",
                "you cannot deactivate your own account",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::internal::{AuthorizationError, UserError};
    use crate::test::utils::{ctx_with_permissions, insert_budget_code, setup_test_app_data};

    fn admin() -> RequestContext {
        ctx_with_permissions("admin", &[Permission::UsersAdmin])
    }

    fn input(email: &str) -> CreateUserInput {
        CreateUserInput {
            nombre: "Luis".to_string(),
            email: email.to_string(),
            password: Some("password-123".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_user_requires_permission() {
        let app_data = setup_test_app_data().await;
        let coordinator = UserCoordinator::new(app_data);
        let ctx = ctx_with_permissions("someone", &[Permission::OrdersCreate]);

        let result = coordinator.create_user(&ctx, input("luis@example.mx")).await;

        assert!(matches!(
            result,
            Err(InternalError::Authorization(AuthorizationError::MissingPermission { .. }))
        ));
    }

    #[tokio::test]
    async fn test_create_user_normalizes_email_and_rejects_duplicates() {
        let app_data = setup_test_app_data().await;
        let coordinator = UserCoordinator::new(app_data);

        let created = coordinator
            .create_user(&admin(), input(" Luis@Example.MX "))
            .await
            .unwrap();
        assert_eq!(created.user.email, "luis@example.mx");
        assert!(created.generated_password.is_none());

        let duplicate = coordinator.create_user(&admin(), input("luis@example.mx")).await;
        assert!(matches!(
            duplicate,
            Err(InternalError::User(UserError::DuplicateEmail { .. }))
        ));
    }

    #[tokio::test]
    async fn test_generated_password_is_returned_once() {
        let app_data = setup_test_app_data().await;
        let coordinator = UserCoordinator::new(app_data.clone());

        let created = coordinator
            .create_user(
                &admin(),
                CreateUserInput {
                    password: None,
                    ..input("gen@example.mx")
                },
            )
            .await
            .unwrap();

        let password = created.generated_password.unwrap();
        assert!(app_data
            .crypto_provider
            .verify_password(&password, &created.user.password_hash)
            .unwrap());
    }

    #[tokio::test]
    async fn test_unknown_budget_code_rolls_back_creation() {
        let app_data = setup_test_app_data().await;
        let coordinator = UserCoordinator::new(app_data.clone());

        let result = coordinator
            .create_user(
                &admin(),
                CreateUserInput {
                    cp_ids: vec!["missing".to_string()],
                    ..input("rollback@example.mx")
                },
            )
            .await;

        assert!(result.is_err());
        let found = app_data
            .user_store
            .find_by_email(&app_data.connections.main, "rollback@example.mx")
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_budget_code_assignment() {
        let app_data = setup_test_app_data().await;
        let coordinator = UserCoordinator::new(app_data.clone());
        let cp = insert_budget_code(&app_data.connections.main, "CP-7", 1_000).await;
        let created = coordinator
            .create_user(&admin(), input("cp@example.mx"))
            .await
            .unwrap();

        let detail = coordinator
            .set_user_budget_codes(&admin(), &created.user.id, vec![cp.id.clone()])
            .await
            .unwrap();

        assert_eq!(detail.cp_ids, vec![cp.id]);
    }

    #[tokio::test]
    async fn test_repeated_assignment_ids_are_linked_once() {
        let app_data = setup_test_app_data().await;
        let db = &app_data.connections.main;
        let coordinator = UserCoordinator::new(app_data.clone());
        let role = app_data
            .role_store
            .create(db, "Revisor".to_string(), None)
            .await
            .unwrap();
        let cp = insert_budget_code(db, "CP-8", 1_000).await;
        let created = coordinator
            .create_user(
                &admin(),
                CreateUserInput {
                    role_ids: vec![role.id.clone(), role.id.clone()],
                    cp_ids: vec![cp.id.clone(), cp.id.clone()],
                    ..input("dup@example.mx")
                },
            )
            .await
            .unwrap();

        let detail = coordinator
            .set_user_roles(&admin(), &created.user.id, vec![role.id.clone(), role.id.clone()])
            .await
            .unwrap();
        assert_eq!(detail.role_ids, vec![role.id.clone()]);

        let detail = coordinator
            .set_user_budget_codes(&admin(), &created.user.id, vec![cp.id.clone(), cp.id.clone()])
            .await
            .unwrap();
        assert_eq!(detail.cp_ids, vec![cp.id]);
    }

    #[tokio::test]
    async fn test_preferences_must_be_object_and_are_own_only() {
        let app_data = setup_test_app_data().await;
        let coordinator = UserCoordinator::new(app_data.clone());
        let created = coordinator
            .create_user(&admin(), input("prefs@example.mx"))
            .await
            .unwrap();
        let own = ctx_with_permissions(&created.user.id, &[]);

        let rejected = coordinator
            .update_preferences(&own, serde_json::json!(["dark"]))
            .await;
        assert!(matches!(rejected, Err(InternalError::Validation { .. })));

        coordinator
            .update_preferences(&own, serde_json::json!({"tema": "oscuro"}))
            .await
            .unwrap();
        let detail = coordinator.current_user(&own).await.unwrap();
        assert_eq!(detail.user.preferences, r#"{"tema":"oscuro"}"#);
    }

    #[tokio::test]
    async fn test_cannot_deactivate_self() {
        let app_data = setup_test_app_data().await;
        let coordinator = UserCoordinator::new(app_data);

        let result = coordinator.deactivate_user(&admin(), "admin").await;

        assert!(matches!(result, Err(InternalError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_other_users_permissions_need_admin() {
        let app_data = setup_test_app_data().await;
        let coordinator = UserCoordinator::new(app_data);
        let ctx = ctx_with_permissions("u-1", &[]);

        let result = coordinator.effective_permissions(&ctx, "u-2").await;

        assert!(matches!(
            result,
            Err(InternalError::Authorization(AuthorizationError::MissingPermission { .. }))
        ));
    }
}
