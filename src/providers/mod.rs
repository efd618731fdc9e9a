// Providers layer - Work performers and business logic
//
// Providers contain business rules and composable operations that
// coordinators orchestrate. They never open transactions themselves.

pub mod authorization_provider;
pub mod crypto_provider;
pub mod notification_provider;
pub mod order_workflow_provider;
pub mod token_provider;

pub use authorization_provider::AuthorizationProvider;
pub use crypto_provider::CryptoProvider;
pub use notification_provider::{NotificationDraft, NotificationEvent, NotificationProvider, Recipients};
pub use order_workflow_provider::OrderWorkflowProvider;
pub use token_provider::{IssuedToken, TokenProvider};

#[cfg(test)]
mod order_workflow_provider_test;
