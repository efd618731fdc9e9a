use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::audit::AuditLogger;
use crate::errors::InternalError;
use crate::errors::internal::{AuthorizationError, CredentialError};
use crate::providers::{CryptoProvider, IssuedToken, TokenProvider};
use crate::stores::{RoleStore, UserStore};
use crate::types::db::user;
use crate::types::internal::auth::Claims;
use crate::types::internal::context::RequestContext;

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: IssuedToken,
    pub user: user::Model,
    pub permisos: Vec<String>,
}

/// Auth coordinator that orchestrates login and token inspection
pub struct AuthCoordinator {
    db: DatabaseConnection,
    user_store: Arc<UserStore>,
    role_store: Arc<RoleStore>,
    crypto_provider: Arc<CryptoProvider>,
    token_provider: Arc<TokenProvider>,
    audit_logger: Arc<AuditLogger>,
}

impl AuthCoordinator {
    /// Create AuthCoordinator from AppData
    ///
    /// # Arguments
    /// * `app_data` - Application data containing all stores and configuration
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.connections.main.clone(),
            user_store: app_data.user_store.clone(),
            role_store: app_data.role_store.clone(),
            crypto_provider: app_data.crypto_provider.clone(),
            token_provider: app_data.token_provider.clone(),
            audit_logger: app_data.audit_logger.clone(),
        }
    }

    /// Get a reference to the internal TokenProvider
    ///
    /// Used by the API layer to validate bearer tokens
    pub fn token_provider(&self) -> Arc<TokenProvider> {
        self.token_provider.clone()
    }

    /// Orchestrate the login workflow
    ///
    /// 1. Look the user up by e-mail
    /// 2. Verify the peppered Argon2id hash
    /// 3. Reject inactive accounts (only after the password matched)
    /// 4. Resolve effective permissions and issue the JWT
    ///
    /// Unknown e-mails and wrong passwords produce the same error.
    ///
    /// # Arguments
    /// * `ctx` - RequestContext carrying the client IP for the audit trail
    /// * `email` - As typed; trimmed and lowercased before lookup
    /// * `password` - The plaintext password
    ///
    /// # Returns
    /// * `Ok(LoginOutcome)` - Token, user row and the permission keys in the token
    /// * `Err(InternalError)` - `CredentialError::InvalidCredentials`,
    ///   `CredentialError::UserInactive`, or an infrastructure error
    pub async fn login(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
    ) -> Result<LoginOutcome, InternalError> {
        let email = email.trim().to_lowercase();
        let email = email.as_str();

        let user = match self.user_store.find_by_email(&self.db, email).await? {
            Some(user) => user,
            None => {
                self.audit_logger.log_login_failure(ctx, email, "unknown_email").await;
                return Err(CredentialError::InvalidCredentials.into());
            }
        };

        if !self.crypto_provider.verify_password(password, &user.password_hash)? {
            self.audit_logger.log_login_failure(ctx, email, "wrong_password").await;
            return Err(CredentialError::InvalidCredentials.into());
        }

        if !user.estado.is_active() {
            self.audit_logger.log_login_failure(ctx, email, "user_inactive").await;
            return Err(CredentialError::UserInactive { user_id: user.id }.into());
        }

        let permisos = self.role_store.effective_permissions(&self.db, &user.id).await?;
        let token = self
            .token_provider
            .generate_jwt(&user.id, &user.email, permisos.clone())?;

        self.audit_logger
            .log_login_success(ctx, &user.id, &token.jti)
            .await;

        tracing::info!("User {} logged in", user.id);

        Ok(LoginOutcome {
            token,
            user,
            permisos,
        })
    }

    /// Claims of the authenticated caller
    pub fn whoami(&self, ctx: &RequestContext) -> Result<Claims, InternalError> {
        ctx.claims
            .clone()
            .ok_or_else(|| AuthorizationError::Unauthenticated.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::NewUser;
    use crate::test::utils::{grant_permissions, setup_test_app_data};
    use crate::types::internal::{Permission, UserStatus};
    use crate::stores::UserChanges;

    async fn setup_with_user(password: &str) -> (Arc<AppData>, AuthCoordinator, user::Model) {
        let app_data = setup_test_app_data().await;
        let hash = app_data.crypto_provider.hash_password(password).unwrap();
        let user = app_data
            .user_store
            .create(
                &app_data.connections.main,
                NewUser {
                    nombre: "Ana".to_string(),
                    email: "ana@example.mx".to_string(),
                    password_hash: hash,
                    area_id: None,
                },
            )
            .await
            .unwrap();
        let coordinator = AuthCoordinator::new(app_data.clone());
        (app_data, coordinator, user)
    }

    #[tokio::test]
    async fn test_login_embeds_effective_permissions() {
        let (app_data, coordinator, user) = setup_with_user("correct horse").await;
        grant_permissions(&app_data.connections.main, &user.id, &[Permission::OrdersCreate]).await;

        let outcome = coordinator
            .login(&RequestContext::new(), "ana@example.mx", "correct horse")
            .await
            .unwrap();

        assert_eq!(outcome.user.id, user.id);
        assert_eq!(outcome.permisos, vec!["ordenes.crear".to_string()]);

        let claims = app_data.token_provider.validate_jwt(&outcome.token.token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert!(claims.has_permission(Permission::OrdersCreate));
        assert!(!claims.has_permission(Permission::OrdersApprove));

        let events = app_data
            .audit_store
            .find_by_event_type("login_success")
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_the_same() {
        let (app_data, coordinator, _user) = setup_with_user("correct horse").await;
        let ctx = RequestContext::new();

        let wrong = coordinator.login(&ctx, "ana@example.mx", "nope").await;
        let unknown = coordinator.login(&ctx, "nadie@example.mx", "nope").await;

        assert!(matches!(
            wrong,
            Err(InternalError::Credential(CredentialError::InvalidCredentials))
        ));
        assert!(matches!(
            unknown,
            Err(InternalError::Credential(CredentialError::InvalidCredentials))
        ));

        let failures = app_data
            .audit_store
            .find_by_event_type("login_failure")
            .await
            .unwrap();
        assert_eq!(failures.len(), 2);
    }

    #[tokio::test]
    async fn test_inactive_user_cannot_login() {
        let (app_data, coordinator, user) = setup_with_user("correct horse").await;
        app_data
            .user_store
            .update(
                &app_data.connections.main,
                user,
                UserChanges {
                    estado: Some(UserStatus::Inactivo),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let result = coordinator
            .login(&RequestContext::new(), "ana@example.mx", "correct horse")
            .await;

        assert!(matches!(
            result,
            Err(InternalError::Credential(CredentialError::UserInactive { .. }))
        ));
    }

    #[tokio::test]
    async fn test_whoami_requires_claims() {
        let (_app_data, coordinator, _user) = setup_with_user("correct horse").await;

        assert!(coordinator.whoami(&RequestContext::new()).is_err());
    }
}
