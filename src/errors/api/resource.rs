use crate::errors::internal::{
    AuthorizationError, BudgetError, CatalogError, CredentialError, InternalError, OrderError,
    UserError,
};
use poem_openapi::{ApiResponse, Object, payload::Json};
use std::fmt;

/// Standardized error response for resource endpoints
#[derive(Object, Debug)]
pub struct ApiErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// Error responses shared by every resource endpoint group
#[derive(ApiResponse, Debug)]
pub enum ApiError {
    /// Request body or parameters are invalid
    #[oai(status = 400)]
    BadRequest(Json<ApiErrorResponse>),

    /// Missing, invalid or expired bearer token
    #[oai(status = 401)]
    Unauthorized(Json<ApiErrorResponse>),

    /// Caller lacks the permission or ownership required
    #[oai(status = 403)]
    Forbidden(Json<ApiErrorResponse>),

    /// Resource does not exist
    #[oai(status = 404)]
    NotFound(Json<ApiErrorResponse>),

    /// Request conflicts with current state (duplicates, invalid transitions, references)
    #[oai(status = 409)]
    Conflict(Json<ApiErrorResponse>),

    /// Business rule rejected the operation (budget checks)
    #[oai(status = 422)]
    Unprocessable(Json<ApiErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ApiErrorResponse>),
}

fn body(error: &str, message: String, status_code: u16) -> Json<ApiErrorResponse> {
    Json(ApiErrorResponse {
        error: error.to_string(),
        message,
        status_code,
    })
}

impl ApiError {
    pub fn bad_request(error: &str, message: impl Into<String>) -> Self {
        ApiError::BadRequest(body(error, message.into(), 400))
    }

    pub fn unauthorized(error: &str, message: impl Into<String>) -> Self {
        ApiError::Unauthorized(body(error, message.into(), 401))
    }

    pub fn forbidden(error: &str, message: impl Into<String>) -> Self {
        ApiError::Forbidden(body(error, message.into(), 403))
    }

    pub fn not_found(error: &str, message: impl Into<String>) -> Self {
        ApiError::NotFound(body(error, message.into(), 404))
    }

    pub fn conflict(error: &str, message: impl Into<String>) -> Self {
        ApiError::Conflict(body(error, message.into(), 409))
    }

    pub fn unprocessable(error: &str, message: impl Into<String>) -> Self {
        ApiError::Unprocessable(body(error, message.into(), 422))
    }

    /// Convert InternalError to ApiError
    ///
    /// Domain errors carry user-safe messages and are passed through.
    /// Infrastructure errors are logged and replaced by a generic message.
    pub fn from_internal_error(err: InternalError) -> Self {
        let message = err.to_string();
        match &err {
            InternalError::Database(db_err) if db_err.is_unique_violation() => {
                tracing::warn!("Unique constraint violated: {}", db_err);
                Self::conflict("duplicate", "A record with the same key already exists")
            }
            InternalError::Database(db_err) => {
                tracing::error!("Database error: {}", db_err);
                Self::internal_server_error()
            }
            InternalError::Parse { value_type, .. } => {
                tracing::error!("Parse error for {}: {}", value_type, err);
                Self::internal_server_error()
            }
            InternalError::Crypto { operation, .. } => {
                tracing::error!("Crypto error in {}: {}", operation, err);
                Self::internal_server_error()
            }
            InternalError::Audit(audit_err) => {
                tracing::error!("Audit error surfaced to API: {}", audit_err);
                Self::internal_server_error()
            }

            InternalError::Validation { .. } => Self::bad_request("validation_error", message),

            InternalError::Credential(CredentialError::ExpiredToken(_)) => {
                Self::unauthorized("expired_token", "JWT has expired")
            }
            InternalError::Credential(CredentialError::InvalidToken { token_type, reason }) => {
                tracing::debug!("Invalid token: {} - {}", token_type, reason);
                Self::unauthorized("invalid_token", "Invalid or malformed JWT")
            }
            InternalError::Credential(CredentialError::UserInactive { .. }) => {
                Self::forbidden("user_inactive", "User account is inactive")
            }
            InternalError::Credential(CredentialError::InvalidCredentials) => {
                Self::unauthorized("invalid_credentials", "Invalid e-mail or password")
            }
            InternalError::Credential(CredentialError::PasswordHashingFailed(reason)) => {
                tracing::error!("Password hashing failed: {}", reason);
                Self::internal_server_error()
            }

            InternalError::Authorization(AuthorizationError::Unauthenticated) => {
                Self::unauthorized("unauthenticated", message)
            }
            InternalError::Authorization(AuthorizationError::MissingPermission { permission }) => {
                tracing::debug!("Permission denied: {}", permission);
                Self::forbidden("missing_permission", message)
            }
            InternalError::Authorization(AuthorizationError::NotRequester { .. }) => {
                Self::forbidden("not_requester", message)
            }
            InternalError::Authorization(AuthorizationError::SelfReview { .. }) => {
                Self::forbidden("self_review", message)
            }
            InternalError::Authorization(AuthorizationError::BudgetCodeNotAssigned { .. }) => {
                Self::forbidden("budget_code_not_assigned", message)
            }

            InternalError::User(
                UserError::UserNotFound { .. }
                | UserError::RoleNotFound { .. }
                | UserError::PermissionNotFound { .. },
            ) => Self::not_found("not_found", message),
            InternalError::User(
                UserError::DuplicateEmail { .. } | UserError::DuplicateRoleName { .. },
            ) => Self::conflict("duplicate", message),
            InternalError::User(UserError::RoleInUse { .. }) => Self::conflict("in_use", message),

            InternalError::Catalog(CatalogError::NotFound { .. }) => {
                Self::not_found("not_found", message)
            }
            InternalError::Catalog(CatalogError::Duplicate { .. }) => {
                Self::conflict("duplicate", message)
            }
            InternalError::Catalog(CatalogError::InUse { .. }) => Self::conflict("in_use", message),

            InternalError::Budget(BudgetError::NotFound { .. }) => {
                Self::not_found("not_found", message)
            }
            InternalError::Budget(BudgetError::DuplicateCode { .. }) => {
                Self::conflict("duplicate", message)
            }
            InternalError::Budget(BudgetError::InUse { .. }) => Self::conflict("in_use", message),
            InternalError::Budget(BudgetError::InsufficientFunds { .. }) => {
                Self::unprocessable("insufficient_budget", message)
            }
            InternalError::Budget(BudgetError::NotInForce { .. }) => {
                Self::unprocessable("budget_code_not_in_force", message)
            }
            InternalError::Budget(BudgetError::BelowCommitted { .. }) => {
                Self::unprocessable("budget_below_committed", message)
            }

            InternalError::Order(OrderError::NotFound { .. }) => {
                Self::not_found("not_found", message)
            }
            InternalError::Order(OrderError::InvalidTransition { .. }) => {
                Self::conflict("invalid_transition", message)
            }
            InternalError::Order(OrderError::NotEditable { .. }) => {
                Self::conflict("not_editable", message)
            }
            InternalError::Order(OrderError::ConcurrentModification { .. }) => {
                Self::conflict("concurrent_modification", message)
            }
            InternalError::Order(OrderError::FolioTaken { .. }) => {
                Self::conflict("folio_taken", message)
            }
            InternalError::Order(OrderError::MissingRejectionReason) => {
                Self::bad_request("missing_rejection_reason", message)
            }
        }
    }

    /// Generic internal server error, never exposes internal details
    fn internal_server_error() -> Self {
        ApiError::InternalError(body(
            "internal_error",
            "An internal error occurred".to_string(),
            500,
        ))
    }

    fn response(&self) -> &ApiErrorResponse {
        match self {
            ApiError::BadRequest(json)
            | ApiError::Unauthorized(json)
            | ApiError::Forbidden(json)
            | ApiError::NotFound(json)
            | ApiError::Conflict(json)
            | ApiError::Unprocessable(json)
            | ApiError::InternalError(json) => &json.0,
        }
    }

    /// Machine-readable error code
    pub fn code(&self) -> &str {
        &self.response().error
    }

    pub fn status_code(&self) -> u16 {
        self.response().status_code
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        self.response().message.clone()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
