use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, SecurityScheme, Tags, auth::Bearer, payload::Json};

use crate::app_data::AppData;
use crate::api::helpers;
use crate::coordinators::AuthCoordinator;
use crate::errors::AuthError;
use crate::types::dto::auth::{LoginRequest, TokenResponse, WhoAmIResponse};
use crate::types::internal::context::RequestContext;

/// Authentication API endpoints
pub struct AuthApi {
    auth_coordinator: AuthCoordinator,
}

impl AuthApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            auth_coordinator: AuthCoordinator::new(app_data),
        }
    }
}

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(
    ty = "bearer",
    key_name = "Authorization",
    key_in = "header",
    bearer_format = "JWT"
)]
pub struct BearerAuth(pub Bearer);

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Authenticate with e-mail and password
    ///
    /// Returns an access token (JWT) carrying the user's effective permissions.
    /// Access tokens expire after 15 minutes.
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(&self, req: &Request, body: Json<LoginRequest>) -> Result<Json<TokenResponse>, AuthError> {
        let ctx = helpers::anonymous_context(req);

        let outcome = self
            .auth_coordinator
            .login(&ctx, &body.email, &body.password)
            .await
            .map_err(AuthError::from_internal_error)?;

        Ok(Json(outcome.into()))
    }

    /// Get current token information
    #[oai(path = "/whoami", method = "get", tag = "AuthTags::Authentication")]
    async fn whoami(&self, req: &Request, auth: BearerAuth) -> Result<Json<WhoAmIResponse>, AuthError> {
        let token_provider = self.auth_coordinator.token_provider();
        let ctx = RequestContext::from_request(req, &auth.0, &token_provider)
            .map_err(AuthError::from_internal_error)?;

        let claims = self
            .auth_coordinator
            .whoami(&ctx)
            .map_err(AuthError::from_internal_error)?;

        Ok(Json(claims.into()))
    }
}
