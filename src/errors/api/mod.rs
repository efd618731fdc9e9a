// API-facing error types
pub mod auth;
pub mod resource;

// Re-exports for convenience
pub use auth::AuthError;
pub use resource::{ApiError, ApiErrorResponse};
