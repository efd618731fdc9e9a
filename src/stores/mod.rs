// Stores layer - Data access over SeaORM entities
//
// Stores other than AuditStore hold no connection; every method takes the
// connection or transaction to run on so coordinators control atomicity.

pub mod area_store;
pub mod audit_store;
pub mod budget_code_store;
pub mod notification_store;
pub mod product_store;
pub mod purchase_order_store;
pub mod role_store;
pub mod supplier_store;
pub mod user_store;

pub use area_store::{AreaChanges, AreaStore};
pub use audit_store::AuditStore;
pub use budget_code_store::{BudgetCodeChanges, BudgetCodeStore, NewBudgetCode};
pub use notification_store::NotificationStore;
pub use product_store::{NewProduct, ProductChanges, ProductStore};
pub use purchase_order_store::{NewOrder, OrderFilter, PurchaseOrderStore};
pub use role_store::RoleStore;
pub use supplier_store::{CatalogFilter, NewSupplier, SupplierChanges, SupplierStore};
pub use user_store::{NewUser, UserChanges, UserFilter, UserStore};

/// Current time as Unix seconds
pub fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}
