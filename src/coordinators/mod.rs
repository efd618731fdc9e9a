// Coordinators layer - Workflow orchestration
//
// Coordinators compose store and provider operations for specific API endpoints.
// They own transaction boundaries and audit emission; business rules live in providers.

pub mod auth_coordinator;
pub mod budget_coordinator;
pub mod catalog_coordinator;
pub mod dashboard_coordinator;
pub mod notification_coordinator;
pub mod order_coordinator;
pub mod role_coordinator;
pub mod user_coordinator;
pub(crate) mod validation;

#[cfg(test)]
mod order_coordinator_test;

pub use auth_coordinator::{AuthCoordinator, LoginOutcome};
pub use budget_coordinator::{BudgetBalance, BudgetCoordinator};
pub use catalog_coordinator::CatalogCoordinator;
pub use dashboard_coordinator::{DashboardCoordinator, DashboardSummary};
pub use notification_coordinator::NotificationCoordinator;
pub use order_coordinator::{OrderCoordinator, OrderDetail, OrderInput, OrderQuery};
pub use role_coordinator::{RoleCoordinator, RoleDetail};
pub use user_coordinator::{CreateUserInput, CreatedUser, UserCoordinator, UserDetail};
