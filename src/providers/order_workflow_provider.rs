use std::collections::HashMap;

use crate::errors::InternalError;
use crate::errors::internal::{AuthorizationError, BudgetError, CatalogError, OrderError};
use crate::types::db::{budget_code, product, purchase_order};
use crate::types::internal::context::RequestContext;
use crate::types::internal::{
    MAX_AMOUNT, OrderAction, OrderItemDraft, OrderStatus, Permission, PricedItem, PricedOrder,
};

/// Business rules of the purchase order lifecycle
///
/// Pure checks only; persistence and transactions belong to the coordinator.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrderWorkflowProvider;

impl OrderWorkflowProvider {
    pub fn new() -> Self {
        Self
    }

    /// Resolve descriptions and prices, then compute every `importe` and the order total
    ///
    /// A draft naming a product takes the catalog price and name unless it
    /// overrides them.
    ///
    /// # Arguments
    /// * `drafts` - Items as submitted, in order; indexes appear in error fields
    /// * `products` - Catalog rows referenced by the drafts, keyed by id
    ///
    /// # Returns
    /// * `Ok(PricedOrder)` - Items with `importe = cantidad * precio_unitario` and their sum
    /// * `Err(InternalError)` - `CatalogError::NotFound` for a missing or inactive product,
    ///   or a validation error for an empty order, a non-positive quantity, a
    ///   negative price, a blank description, arithmetic overflow, or a total
    ///   outside `1..=MAX_AMOUNT`
    pub fn price_items(
        &self,
        drafts: &[OrderItemDraft],
        products: &HashMap<String, product::Model>,
    ) -> Result<PricedOrder, InternalError> {
        if drafts.is_empty() {
            return Err(InternalError::validation("items", "an order needs at least one item"));
        }

        let mut items = Vec::with_capacity(drafts.len());
        let mut monto: i64 = 0;

        for (index, draft) in drafts.iter().enumerate() {
            let product = match &draft.producto_id {
                Some(id) => match products.get(id) {
                    Some(p) if p.activo => Some(p),
                    _ => return Err(CatalogError::not_found("Product", id.clone()).into()),
                },
                None => None,
            };

            if draft.cantidad <= 0 {
                return Err(InternalError::validation(
                    format!("items[{}].cantidad", index),
                    "must be greater than zero",
                ));
            }

            let precio_unitario = draft
                .precio_unitario
                .or_else(|| product.map(|p| p.precio_unitario))
                .ok_or_else(|| {
                    InternalError::validation(
                        format!("items[{}].precio_unitario", index),
                        "required when no product is given",
                    )
                })?;
            if precio_unitario < 0 {
                return Err(InternalError::validation(
                    format!("items[{}].precio_unitario", index),
                    "cannot be negative",
                ));
            }

            let descripcion = draft
                .descripcion
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string)
                .or_else(|| product.map(|p| p.nombre.clone()))
                .ok_or_else(|| {
                    InternalError::validation(
                        format!("items[{}].descripcion", index),
                        "required when no product is given",
                    )
                })?;

            let importe = draft
                .cantidad
                .checked_mul(precio_unitario)
                .ok_or_else(|| InternalError::validation(format!("items[{}]", index), "amount overflow"))?;
            monto = monto
                .checked_add(importe)
                .ok_or_else(|| InternalError::validation("monto", "amount overflow"))?;

            items.push(PricedItem {
                producto_id: draft.producto_id.clone(),
                descripcion,
                cantidad: draft.cantidad,
                precio_unitario,
                importe,
            });
        }

        if monto <= 0 {
            return Err(InternalError::validation("monto", "order total must be greater than zero"));
        }
        if monto > MAX_AMOUNT {
            return Err(InternalError::validation(
                "monto",
                format!("order total cannot exceed {}", MAX_AMOUNT),
            ));
        }

        Ok(PricedOrder { items, monto })
    }

    /// Orders can only be charged to codes whose validity window covers `now`
    pub fn ensure_in_force(&self, cp: &budget_code::Model, now: i64) -> Result<(), InternalError> {
        if cp.is_in_force(now) {
            Ok(())
        } else {
            Err(BudgetError::NotInForce { cp_id: cp.id.clone() }.into())
        }
    }

    /// Advisory balance check; the authoritative one is the conditional debit at approval
    pub fn ensure_affordable(
        &self,
        cp: &budget_code::Model,
        monto: i64,
    ) -> Result<(), InternalError> {
        if monto > cp.monto_disponible {
            return Err(BudgetError::InsufficientFunds {
                cp_id: cp.id.clone(),
                requested: monto,
                available: cp.monto_disponible,
            }
            .into());
        }
        Ok(())
    }

    /// Only the requester may change or delete an order, and only while it is `Nueva`
    ///
    /// # Arguments
    /// * `ctx` - The caller
    /// * `order` - The stored order
    /// * `action` - Name used in the error, such as `"edit"` or `"delete"`
    ///
    /// # Returns
    /// * `Ok(())` - The caller may edit
    /// * `Err(InternalError)` - `AuthorizationError::NotRequester` or `OrderError::NotEditable`
    pub fn ensure_editable(
        &self,
        ctx: &RequestContext,
        order: &purchase_order::Model,
        action: &str,
    ) -> Result<(), InternalError> {
        if ctx.user_id() != Some(order.usuario_id.as_str()) {
            return Err(AuthorizationError::NotRequester {
                order_id: order.id.clone(),
                action: action.to_string(),
            }
            .into());
        }
        if !order.estado.is_editable() {
            return Err(OrderError::NotEditable {
                order_id: order.id.clone(),
                estado: order.estado,
            }
            .into());
        }
        Ok(())
    }

    /// Target state of `action`, after checking the caller may perform it
    ///
    /// Finished orders (`Rechazada`, `Cerrada`) refuse every action before any
    /// caller check.
    ///
    /// # Arguments
    /// * `ctx` - The caller
    /// * `order` - The order as currently stored
    /// * `action` - The requested workflow step
    ///
    /// # Returns
    /// * `Ok(OrderStatus)` - The state the order moves to
    /// * `Err(InternalError)` - Unauthenticated, missing permission, wrong actor,
    ///   or no edge for `action` from the current state
    pub fn authorize_transition(
        &self,
        ctx: &RequestContext,
        order: &purchase_order::Model,
        action: OrderAction,
    ) -> Result<OrderStatus, InternalError> {
        let user_id = ctx.user_id().ok_or(AuthorizationError::Unauthenticated)?;
        let invalid = || -> InternalError {
            OrderError::InvalidTransition {
                order_id: order.id.clone(),
                from: order.estado,
                action,
            }
            .into()
        };

        if order.estado.is_terminal() {
            return Err(invalid());
        }

        match action {
            OrderAction::Submit | OrderAction::RequestClose => {
                if user_id != order.usuario_id {
                    return Err(AuthorizationError::NotRequester {
                        order_id: order.id.clone(),
                        action: action.to_string(),
                    }
                    .into());
                }
            }
            OrderAction::Approve | OrderAction::Reject => {
                Self::require_permission(ctx, Permission::OrdersApprove)?;
                if user_id == order.usuario_id {
                    return Err(AuthorizationError::SelfReview {
                        user_id: user_id.to_string(),
                        order_id: order.id.clone(),
                    }
                    .into());
                }
            }
            OrderAction::Close => Self::require_permission(ctx, Permission::OrdersClose)?,
        }

        order.estado.apply(action).ok_or_else(invalid)
    }

    fn require_permission(ctx: &RequestContext, permission: Permission) -> Result<(), InternalError> {
        if ctx.has_permission(permission) {
            Ok(())
        } else {
            Err(AuthorizationError::MissingPermission {
                permission: permission.key().to_string(),
            }
            .into())
        }
    }

    /// Trimmed rejection reason; blank reasons are refused
    pub fn rejection_reason(&self, motivo: Option<&str>) -> Result<String, InternalError> {
        motivo
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .ok_or_else(|| OrderError::MissingRejectionReason.into())
    }
}
