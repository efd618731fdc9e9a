// Internal types - not exposed over the API
pub mod amount;
pub mod audit;
pub mod auth;
pub mod context;
pub mod order_draft;
pub mod order_status;
pub mod permission;
pub mod status_totals;
pub mod user_status;

pub use amount::{MAX_AMOUNT, checked_total};
pub use order_draft::{OrderItemDraft, PricedItem, PricedOrder};
pub use order_status::{OrderAction, OrderStatus};
pub use permission::Permission;
pub use status_totals::{StatusTotals, totals_by_status};
pub use user_status::UserStatus;
