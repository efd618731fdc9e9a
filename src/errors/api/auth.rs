use crate::errors::internal::{CredentialError, InternalError};
use poem_openapi::{ApiResponse, Object, payload::Json};
use std::fmt;

/// Error body for the login and token endpoints
#[derive(Object, Debug)]
pub struct AuthErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// Errors returned by `/auth/*`
///
/// Kept apart from `ApiError` so login failures never leak whether the
/// e-mail exists.
#[derive(ApiResponse, Debug)]
pub enum AuthError {
    /// Malformed login request
    #[oai(status = 400)]
    BadRequest(Json<AuthErrorResponse>),

    /// Invalid e-mail or password
    #[oai(status = 401)]
    InvalidCredentials(Json<AuthErrorResponse>),

    /// Account has been deactivated
    #[oai(status = 403)]
    UserInactive(Json<AuthErrorResponse>),

    /// Invalid, malformed or expired JWT
    #[oai(status = 401)]
    InvalidToken(Json<AuthErrorResponse>),

    #[oai(status = 500)]
    InternalError(Json<AuthErrorResponse>),
}

fn body(error: &str, message: impl Into<String>, status_code: u16) -> Json<AuthErrorResponse> {
    Json(AuthErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code,
    })
}

impl AuthError {
    pub fn invalid_credentials() -> Self {
        AuthError::InvalidCredentials(body("invalid_credentials", "Invalid e-mail or password", 401))
    }

    pub fn user_inactive() -> Self {
        AuthError::UserInactive(body("user_inactive", "User account is inactive", 403))
    }

    /// Convert InternalError to AuthError
    ///
    /// Internal details are logged, never returned.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Validation { .. } => {
                AuthError::BadRequest(body("validation_error", err.to_string(), 400))
            }

            InternalError::Credential(CredentialError::InvalidCredentials) => {
                tracing::debug!("Invalid credentials attempt");
                Self::invalid_credentials()
            }
            InternalError::Credential(CredentialError::UserInactive { user_id }) => {
                tracing::info!("Login attempt for inactive user {}", user_id);
                Self::user_inactive()
            }
            InternalError::Credential(CredentialError::InvalidToken { token_type, reason }) => {
                tracing::debug!("Invalid token: {} - {}", token_type, reason);
                AuthError::InvalidToken(body("invalid_token", "Invalid or malformed JWT", 401))
            }
            InternalError::Credential(CredentialError::ExpiredToken(token_type)) => {
                tracing::debug!("Expired token: {}", token_type);
                AuthError::InvalidToken(body("expired_token", "JWT has expired", 401))
            }

            _ => {
                tracing::error!("Unexpected error in auth operation: {}", err);
                AuthError::InternalError(body("internal_error", "An internal error occurred", 500))
            }
        }
    }

    fn response(&self) -> &AuthErrorResponse {
        match self {
            AuthError::BadRequest(json)
            | AuthError::InvalidCredentials(json)
            | AuthError::UserInactive(json)
            | AuthError::InvalidToken(json)
            | AuthError::InternalError(json) => &json.0,
        }
    }

    /// Machine-readable error code
    pub fn code(&self) -> &str {
        &self.response().error
    }

    pub fn message(&self) -> &str {
        &self.response().message
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
