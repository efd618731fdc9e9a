use thiserror::Error;

use crate::types::internal::{OrderAction, OrderStatus};

#[derive(Error, Debug)]
pub enum OrderError {
    #[error("Purchase order not found: {order_id}")]
    NotFound { order_id: String },

    #[error("Cannot {action} order {order_id} in state {from}")]
    InvalidTransition {
        order_id: String,
        from: OrderStatus,
        action: OrderAction,
    },

    #[error("Order {order_id} cannot be modified in state {estado}")]
    NotEditable { order_id: String, estado: OrderStatus },

    #[error("Order {order_id} was modified concurrently")]
    ConcurrentModification { order_id: String },

    #[error("Folio {folio} was taken by a concurrent order; retry the request")]
    FolioTaken { folio: String },

    #[error("Rejecting an order requires a reason")]
    MissingRejectionReason,
}
