use poem::Request;

use crate::api::auth::BearerAuth;
use crate::errors::ApiError;
use crate::providers::TokenProvider;
use crate::types::internal::context::RequestContext;

/// Validate the bearer token and build the context every coordinator call takes
///
/// # Errors
/// Returns `ApiError::Unauthorized` when the JWT is invalid or expired
pub fn authenticated_context(
    req: &Request,
    auth: &BearerAuth,
    token_provider: &TokenProvider,
) -> Result<RequestContext, ApiError> {
    RequestContext::from_request(req, &auth.0, token_provider).map_err(ApiError::from_internal_error)
}

/// Context for endpoints reachable without a token (login)
pub fn anonymous_context(req: &Request) -> RequestContext {
    let mut ctx = RequestContext::new();
    ctx.ip_address = RequestContext::extract_ip_address(req);
    ctx
}
