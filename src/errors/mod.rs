// Errors layer - Error type definitions
pub mod api;
pub mod internal;

// Re-exports for convenience
pub use api::{ApiError, AuthError};
pub use internal::InternalError;

#[cfg(test)]
mod api_test;

#[cfg(test)]
mod internal_test;
