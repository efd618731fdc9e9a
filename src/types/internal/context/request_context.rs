use std::net::IpAddr;

use crate::errors::InternalError;
use crate::providers::TokenProvider;
use crate::types::internal::{Permission, auth::Claims};
use poem::Request;
use poem_openapi::auth::Bearer;

use super::{request_id::RequestId, request_source::RequestSource};

/// Request context that flows through all layers
///
/// Contains contextual information about the current request that is needed
/// for authorization, logging and auditing across API, coordinator and store layers.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// IP address of the client making the request
    pub ip_address: Option<IpAddr>,

    /// Unique identifier for this request (for tracing across layers)
    pub request_id: RequestId,

    /// Whether the request is authenticated (JWT validated successfully)
    pub authenticated: bool,

    /// Full JWT claims if authenticated
    pub claims: Option<Claims>,

    /// Source of the request (API, CLI, or System)
    pub source: RequestSource,

    /// Actor who initiated the operation
    pub actor_id: String,
}

impl RequestContext {
    /// Unauthenticated API context
    pub fn new() -> Self {
        Self {
            ip_address: None,
            request_id: RequestId::new(),
            authenticated: false,
            claims: None,
            source: RequestSource::API,
            actor_id: "unknown".to_string(),
        }
    }

    /// Create a RequestContext for CLI operations
    pub fn for_cli(command_name: &str) -> Self {
        Self {
            source: RequestSource::CLI,
            actor_id: format!("cli:{}", command_name),
            ..Self::new()
        }
    }

    /// Create a RequestContext for system operations
    pub fn for_system(operation_name: &str) -> Self {
        Self {
            source: RequestSource::System,
            actor_id: format!("system:{}", operation_name),
            ..Self::new()
        }
    }

    /// Build an authenticated context from an HTTP request and its bearer token
    ///
    /// # Errors
    /// Returns `InternalError::Credential` when the JWT is invalid or expired
    pub fn from_request(
        req: &Request,
        bearer: &Bearer,
        token_provider: &TokenProvider,
    ) -> Result<Self, InternalError> {
        let claims = token_provider.validate_jwt(&bearer.token)?;

        let mut ctx = Self::new().with_actor_id(claims.sub.clone()).with_auth(claims);
        ctx.ip_address = Self::extract_ip_address(req);

        tracing::trace!("Request context created: {:?}", ctx);

        Ok(ctx)
    }

    /// Extract IP address from request headers
    ///
    /// Checks X-Forwarded-For, X-Real-IP, and falls back to remote address.
    pub fn extract_ip_address(req: &Request) -> Option<IpAddr> {
        if let Some(forwarded) = req.header("X-Forwarded-For") {
            if let Some(ip) = forwarded.split(',').next() {
                return ip.trim().parse().ok();
            }
        }

        if let Some(real_ip) = req.header("X-Real-IP") {
            return real_ip.parse().ok();
        }

        req.remote_addr().as_socket_addr().map(|addr| addr.ip())
    }

    /// Set the ip_address
    pub fn with_ip_address(mut self, ip_address: IpAddr) -> Self {
        self.ip_address = Some(ip_address);
        self
    }

    /// Set authentication state with claims
    pub fn with_auth(mut self, claims: Claims) -> Self {
        self.authenticated = true;
        self.claims = Some(claims);
        self
    }

    /// Set the actor_id
    pub fn with_actor_id(mut self, actor_id: impl Into<String>) -> Self {
        self.actor_id = actor_id.into();
        self
    }

    /// Authenticated user id, if any
    pub fn user_id(&self) -> Option<&str> {
        self.claims.as_ref().map(|c| c.sub.as_str())
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.claims
            .as_ref()
            .is_some_and(|c| c.has_permission(permission))
    }

    pub fn jwt_id(&self) -> Option<&str> {
        self.claims.as_ref().map(|c| c.jti.as_str())
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
