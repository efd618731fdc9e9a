use crate::types::db::purchase_order;
use crate::types::internal::{OrderAction, Permission};

/// Workflow events that generate notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationEvent {
    OrdenEnviada,
    OrdenAprobada,
    OrdenRechazada,
    CierreSolicitado,
    OrdenCerrada,
}

/// Who receives a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipients {
    /// The user who created the order
    Requester,
    /// Every active user holding the permission
    Holders(Permission),
}

impl NotificationEvent {
    pub fn for_action(action: OrderAction) -> Self {
        match action {
            OrderAction::Submit => Self::OrdenEnviada,
            OrderAction::Approve => Self::OrdenAprobada,
            OrderAction::Reject => Self::OrdenRechazada,
            OrderAction::RequestClose => Self::CierreSolicitado,
            OrderAction::Close => Self::OrdenCerrada,
        }
    }

    /// Value stored in `notificaciones.tipo_evento`
    pub fn tipo_evento(&self) -> &'static str {
        match self {
            Self::OrdenEnviada => "orden_enviada",
            Self::OrdenAprobada => "orden_aprobada",
            Self::OrdenRechazada => "orden_rechazada",
            Self::CierreSolicitado => "cierre_solicitado",
            Self::OrdenCerrada => "orden_cerrada",
        }
    }

    pub fn recipients(&self) -> Recipients {
        match self {
            Self::OrdenEnviada => Recipients::Holders(Permission::OrdersApprove),
            Self::CierreSolicitado => Recipients::Holders(Permission::OrdersClose),
            Self::OrdenAprobada | Self::OrdenRechazada | Self::OrdenCerrada => {
                Recipients::Requester
            }
        }
    }
}

/// Notification content before it is addressed to users
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    pub tipo_evento: String,
    pub mensaje: String,
    pub url_relacionada: String,
}

/// Composes notification text for workflow events
#[derive(Debug, Default, Clone, Copy)]
pub struct NotificationProvider;

impl NotificationProvider {
    pub fn new() -> Self {
        Self
    }

    /// Spanish message and link for `event` on `order`
    ///
    /// A rejection message carries the stored reason when there is one.
    pub fn compose(
        &self,
        event: NotificationEvent,
        order: &purchase_order::Model,
    ) -> NotificationDraft {
        let folio = &order.folio;
        let mensaje = match event {
            NotificationEvent::OrdenEnviada => {
                format!("La orden {} fue enviada a revisión", folio)
            }
            NotificationEvent::OrdenAprobada => format!("La orden {} fue aprobada", folio),
            NotificationEvent::OrdenRechazada => match &order.motivo_rechazo {
                Some(motivo) => format!("La orden {} fue rechazada: {}", folio, motivo),
                None => format!("La orden {} fue rechazada", folio),
            },
            NotificationEvent::CierreSolicitado => {
                format!("Se solicitó el cierre de la orden {}", folio)
            }
            NotificationEvent::OrdenCerrada => format!("La orden {} fue cerrada", folio),
        };

        NotificationDraft {
            tipo_evento: event.tipo_evento().to_string(),
            mensaje,
            url_relacionada: format!("/ordenes/{}", order.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::sample_order;
    use crate::types::internal::OrderStatus;

    #[test]
    fn test_recipients_per_event() {
        assert_eq!(
            NotificationEvent::for_action(OrderAction::Submit).recipients(),
            Recipients::Holders(Permission::OrdersApprove)
        );
        assert_eq!(
            NotificationEvent::for_action(OrderAction::RequestClose).recipients(),
            Recipients::Holders(Permission::OrdersClose)
        );
        for action in [OrderAction::Approve, OrderAction::Reject, OrderAction::Close] {
            assert_eq!(
                NotificationEvent::for_action(action).recipients(),
                Recipients::Requester
            );
        }
    }

    #[test]
    fn test_compose_links_to_order() {
        let order = sample_order("u-1", OrderStatus::EnRevision, 100);
        let draft = NotificationProvider::new().compose(NotificationEvent::OrdenEnviada, &order);

        assert_eq!(draft.tipo_evento, "orden_enviada");
        assert_eq!(draft.url_relacionada, format!("/ordenes/{}", order.id));
        assert!(draft.mensaje.contains(&order.folio));
    }

    #[test]
    fn test_rejection_message_includes_reason() {
        let mut order = sample_order("u-1", OrderStatus::Rechazada, 100);
        order.motivo_rechazo = Some("sin cotización".to_string());

        let draft = NotificationProvider::new().compose(NotificationEvent::OrdenRechazada, &order);
        assert!(draft.mensaje.ends_with("sin cotización"));
    }
}
