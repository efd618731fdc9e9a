use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::coordinators::LoginOutcome;
use crate::types::dto::user::UserResponse;
use crate::types::internal::auth::Claims;

/// Request model for user login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    /// E-mail of the account
    #[oai(validator(min_length = 3, max_length = 254))]
    pub email: String,

    /// Password for authentication
    pub password: String,
}

/// Response model containing the access token
#[derive(Object, Debug)]
pub struct TokenResponse {
    /// JWT access token for API authentication
    pub access_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Number of seconds until the access token expires
    pub expires_in: i64,

    /// The authenticated user
    pub user: UserResponse,

    /// Effective permission keys embedded in the token
    pub permisos: Vec<String>,
}

impl From<LoginOutcome> for TokenResponse {
    fn from(outcome: LoginOutcome) -> Self {
        Self {
            access_token: outcome.token.token,
            token_type: "Bearer".to_string(),
            expires_in: outcome.token.expires_in,
            user: outcome.user.into(),
            permisos: outcome.permisos,
        }
    }
}

/// Response model for whoami endpoint
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct WhoAmIResponse {
    /// User ID (UUID)
    pub user_id: String,

    pub email: String,

    pub permisos: Vec<String>,

    /// Token issue time (Unix timestamp)
    pub issued_at: i64,

    /// Token expiration time (Unix timestamp)
    pub expires_at: i64,

    /// JWT ID
    pub jti: String,
}

impl From<Claims> for WhoAmIResponse {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            permisos: claims.permisos,
            issued_at: claims.iat,
            expires_at: claims.exp,
            jti: claims.jti,
        }
    }
}
