use crate::errors::InternalError;
use crate::errors::internal::AuthorizationError;
use crate::types::internal::Permission;
use crate::types::internal::context::RequestContext;

/// Permission checks against the claims carried by a request context
#[derive(Debug, Default, Clone, Copy)]
pub struct AuthorizationProvider;

impl AuthorizationProvider {
    pub fn new() -> Self {
        Self
    }

    /// Id of the authenticated caller
    pub fn authenticated_user<'a>(&self, ctx: &'a RequestContext) -> Result<&'a str, InternalError> {
        match ctx.user_id() {
            Some(id) if ctx.authenticated => Ok(id),
            _ => Err(AuthorizationError::Unauthenticated.into()),
        }
    }

    /// Id of the authenticated caller, provided they hold `permission`
    ///
    /// # Arguments
    /// * `ctx` - The request context built from the bearer token
    /// * `permission` - The permission the operation needs
    ///
    /// # Returns
    /// * `Ok(&str)` - The caller's user id
    /// * `Err(InternalError)` - `AuthorizationError::Unauthenticated` or `MissingPermission`
    pub fn require<'a>(
        &self,
        ctx: &'a RequestContext,
        permission: Permission,
    ) -> Result<&'a str, InternalError> {
        let user_id = self.authenticated_user(ctx)?;

        if !ctx.has_permission(permission) {
            tracing::debug!("User {} lacks permission {}", user_id, permission);
            return Err(AuthorizationError::MissingPermission {
                permission: permission.key().to_string(),
            }
            .into());
        }

        Ok(user_id)
    }
}
