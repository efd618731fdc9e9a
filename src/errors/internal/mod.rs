use thiserror::Error;

pub mod audit;
pub mod authorization;
pub mod budget;
pub mod catalog;
pub mod credential;
pub mod database;
pub mod order;
pub mod user;

pub use audit::AuditError;
pub use authorization::AuthorizationError;
pub use budget::BudgetError;
pub use catalog::CatalogError;
pub use credential::CredentialError;
pub use database::DatabaseError;
pub use order::OrderError;
pub use user::UserError;

/// Internal error type for store, provider and coordinator operations
///
/// Infrastructure errors (database, parse, crypto) are shared; domain errors
/// are grouped per area. Not exposed via API - endpoints must convert to
/// AuthError or ApiError.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse {
        value_type: String,
        message: String,
    },

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto {
        operation: String,
        message: String,
    },

    #[error("Validation error: {field}: {message}")]
    Validation {
        field: String,
        message: String,
    },

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Budget(#[from] BudgetError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Audit(#[from] AuditError),
}

impl InternalError {
    /// Create a database error with context
    pub fn database(operation: &str, source: sea_orm::DbErr) -> Self {
        Self::Database(DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        })
    }

    /// Create a parse error with context
    pub fn parse(value_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            value_type: value_type.into(),
            message: message.into(),
        }
    }

    /// Create a crypto error with context
    pub fn crypto(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Crypto {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create an input validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::Database(db) if db.is_unique_violation())
    }
}
