// Database entities - SeaORM models
pub mod area;
pub mod audit_event;
pub mod budget_code;
pub mod notification;
pub mod permission;
pub mod product;
pub mod purchase_order;
pub mod purchase_order_item;
pub mod role;
pub mod role_permission;
pub mod supplier;
pub mod user;
pub mod user_budget_code;
pub mod user_role;
