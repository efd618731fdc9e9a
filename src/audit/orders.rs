use super::AuditLogger;
use crate::types::db::purchase_order;
use crate::types::internal::audit::EventType;
use crate::types::internal::context::RequestContext;
use crate::types::internal::{OrderAction, OrderStatus};

pub const ORDER_ENTITY: &str = "orden_compra";

impl AuditLogger {
    /// Order created, updated or deleted by its requester
    pub async fn log_order_change(
        &self,
        ctx: &RequestContext,
        event_type: EventType,
        order: &purchase_order::Model,
    ) {
        self.entity_event(ctx, event_type, ORDER_ENTITY, &order.id)
            .add_field("folio", &order.folio)
            .add_field("cp_id", &order.cp_id)
            .add_field("monto", order.monto)
            .emit()
            .await;
    }

    /// State change of an order, including the budget debit on approval
    pub async fn log_order_transition(
        &self,
        ctx: &RequestContext,
        order: &purchase_order::Model,
        action: OrderAction,
        from: OrderStatus,
        debited: Option<i64>,
    ) {
        self.entity_event(ctx, EventType::OrderTransition, ORDER_ENTITY, &order.id)
            .add_field("folio", &order.folio)
            .add_field("action", action.as_str())
            .add_field("from", from.as_str())
            .add_field("to", order.estado.as_str())
            .add_field("debited", debited)
            .add_field("motivo_rechazo", &order.motivo_rechazo)
            .emit()
            .await;
    }
}
