use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a purchase order
///
/// Stored as its Spanish name in `ordenes_compra.estado`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    poem_openapi::Enum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[oai(rename_all = "PascalCase")]
pub enum OrderStatus {
    #[sea_orm(string_value = "Nueva")]
    Nueva,
    #[sea_orm(string_value = "EnRevision")]
    EnRevision,
    #[sea_orm(string_value = "Aprobada")]
    Aprobada,
    #[sea_orm(string_value = "Rechazada")]
    Rechazada,
    #[sea_orm(string_value = "CierreSolicitado")]
    CierreSolicitado,
    #[sea_orm(string_value = "Cerrada")]
    Cerrada,
}

/// Workflow actions that move an order between states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    Submit,
    Approve,
    Reject,
    RequestClose,
    Close,
}

impl OrderStatus {
    /// Every state, in workflow order
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Nueva,
        OrderStatus::EnRevision,
        OrderStatus::Aprobada,
        OrderStatus::Rechazada,
        OrderStatus::CierreSolicitado,
        OrderStatus::Cerrada,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nueva => "Nueva",
            Self::EnRevision => "EnRevision",
            Self::Aprobada => "Aprobada",
            Self::Rechazada => "Rechazada",
            Self::CierreSolicitado => "CierreSolicitado",
            Self::Cerrada => "Cerrada",
        }
    }

    /// Resulting state of applying `action`, or `None` if the graph has no such edge
    pub fn apply(self, action: OrderAction) -> Option<OrderStatus> {
        match (self, action) {
            (Self::Nueva, OrderAction::Submit) => Some(Self::EnRevision),
            (Self::EnRevision, OrderAction::Approve) => Some(Self::Aprobada),
            (Self::EnRevision, OrderAction::Reject) => Some(Self::Rechazada),
            (Self::Aprobada, OrderAction::RequestClose) => Some(Self::CierreSolicitado),
            (Self::CierreSolicitado, OrderAction::Close) => Some(Self::Cerrada),
            _ => None,
        }
    }

    /// Only new orders can have their contents changed or be deleted
    pub fn is_editable(self) -> bool {
        self == Self::Nueva
    }

    /// No workflow action leaves these states
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Rechazada | Self::Cerrada)
    }

    /// States whose amount has been debited from the budget code
    ///
    /// Entering one of these from an uncommitted state is what debits the budget.
    pub fn is_committed(self) -> bool {
        matches!(self, Self::Aprobada | Self::CierreSolicitado | Self::Cerrada)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl OrderAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::RequestClose => "request_close",
            Self::Close => "close",
        }
    }
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
