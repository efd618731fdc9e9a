use std::collections::BTreeSet;
use std::sync::Arc;

use sea_orm::{ConnectionTrait, DatabaseConnection};

use crate::app_data::AppData;
use crate::audit::AuditLogger;
use crate::config::{begin_transaction, commit_transaction};
use crate::coordinators::validation;
use crate::errors::InternalError;
use crate::errors::internal::{AuthorizationError, BudgetError, CatalogError, OrderError};
use crate::providers::{
    AuthorizationProvider, NotificationEvent, NotificationProvider, OrderWorkflowProvider,
    Recipients,
};
use crate::stores::{
    BudgetCodeStore, NewOrder, NotificationStore, OrderFilter, ProductStore, PurchaseOrderStore,
    RoleStore, SupplierStore, UserStore, unix_now,
};
use crate::types::db::{purchase_order, purchase_order_item};
use crate::types::internal::audit::EventType;
use crate::types::internal::context::RequestContext;
use crate::types::internal::{OrderAction, OrderItemDraft, OrderStatus, Permission, PricedOrder};

/// Contents of an order as submitted by its requester
#[derive(Debug, Clone)]
pub struct OrderInput {
    pub cp_id: String,
    pub proveedor_id: Option<String>,
    pub descripcion: String,
    pub items: Vec<OrderItemDraft>,
}

/// Listing filters accepted from the API
#[derive(Debug, Clone, Default)]
pub struct OrderQuery {
    pub estado: Option<OrderStatus>,
    pub cp_id: Option<String>,
    pub proveedor_id: Option<String>,
    /// Restrict to the caller's own orders even when they may see all
    pub mine: bool,
}

/// An order with its items
#[derive(Debug, Clone)]
pub struct OrderDetail {
    pub order: purchase_order::Model,
    pub items: Vec<purchase_order_item::Model>,
}

/// Order coordinator: purchase orders and their approval workflow
///
/// Every write runs in one main-database transaction. Workflow notifications
/// are written inside that transaction; audit events are written after commit.
pub struct OrderCoordinator {
    db: DatabaseConnection,
    purchase_order_store: Arc<PurchaseOrderStore>,
    budget_code_store: Arc<BudgetCodeStore>,
    supplier_store: Arc<SupplierStore>,
    product_store: Arc<ProductStore>,
    user_store: Arc<UserStore>,
    role_store: Arc<RoleStore>,
    notification_store: Arc<NotificationStore>,
    authorization_provider: AuthorizationProvider,
    workflow_provider: OrderWorkflowProvider,
    notification_provider: NotificationProvider,
    audit_logger: Arc<AuditLogger>,
}

impl OrderCoordinator {
    /// Create OrderCoordinator from AppData
    ///
    /// # Arguments
    /// * `app_data` - Application data containing all stores and configuration
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.connections.main.clone(),
            purchase_order_store: app_data.purchase_order_store.clone(),
            budget_code_store: app_data.budget_code_store.clone(),
            supplier_store: app_data.supplier_store.clone(),
            product_store: app_data.product_store.clone(),
            user_store: app_data.user_store.clone(),
            role_store: app_data.role_store.clone(),
            notification_store: app_data.notification_store.clone(),
            authorization_provider: AuthorizationProvider::new(),
            workflow_provider: OrderWorkflowProvider::new(),
            notification_provider: NotificationProvider::new(),
            audit_logger: app_data.audit_logger.clone(),
        }
    }

    /// Create a `Nueva` order with the next folio
    ///
    /// 1. Check `ordenes.crear`
    /// 2. Check the budget code is in force and assigned to the caller
    /// 3. Price items and compute the total
    /// 4. Insert header and items
    ///
    /// A folio claimed by a concurrent create is retried once in a fresh
    /// transaction; a second collision reaches the caller as `FolioTaken`.
    ///
    /// # Authorization
    /// Requires `ordenes.crear`
    ///
    /// # Arguments
    /// * `ctx` - RequestContext with authenticated user info
    /// * `input` - Budget code, optional supplier, description and item drafts
    ///
    /// # Returns
    /// * `Ok(OrderDetail)` - The stored order and its items
    /// * `Err(InternalError)` - Missing permission, validation or pricing errors,
    ///   a code not assigned or not in force, or `FolioTaken`
    pub async fn create_order(
        &self,
        ctx: &RequestContext,
        input: OrderInput,
    ) -> Result<OrderDetail, InternalError> {
        let user_id = self
            .authorization_provider
            .require(ctx, Permission::OrdersCreate)?
            .to_string();

        let (order, items) = match self.insert_order(ctx, &user_id, input.clone()).await {
            Err(InternalError::Order(OrderError::FolioTaken { folio })) => {
                tracing::warn!("Folio {} taken concurrently, retrying once", folio);
                self.insert_order(ctx, &user_id, input).await?
            }
            other => other?,
        };

        self.audit_logger
            .log_order_change(ctx, EventType::OrderCreated, &order)
            .await;

        tracing::info!("Order {} created by {}", order.folio, user_id);

        Ok(OrderDetail { order, items })
    }

    async fn insert_order(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        input: OrderInput,
    ) -> Result<(purchase_order::Model, Vec<purchase_order_item::Model>), InternalError> {
        let txn = begin_transaction(&self.db).await?;

        let (new_order, priced) = self.prepare(&txn, ctx, user_id, input).await?;
        let order = self
            .purchase_order_store
            .create(&txn, new_order, &priced.items)
            .await?;
        let items = self.purchase_order_store.items(&txn, &order.id).await?;

        commit_transaction(txn).await?;

        Ok((order, items))
    }

    /// Replace the contents of a `Nueva` order; requester only
    ///
    /// Items are re-priced from the current catalog, and the budget code checks
    /// of `create_order` apply again.
    ///
    /// # Arguments
    /// * `ctx` - RequestContext with authenticated user info
    /// * `order_id` - Order to edit
    /// * `input` - The full new contents
    ///
    /// # Returns
    /// * `Ok(OrderDetail)` - The updated order and its items
    /// * `Err(InternalError)` - `NotRequester`, `NotEditable`, or the same errors as `create_order`
    pub async fn update_order(
        &self,
        ctx: &RequestContext,
        order_id: &str,
        input: OrderInput,
    ) -> Result<OrderDetail, InternalError> {
        let user_id = self.authorization_provider.authenticated_user(ctx)?.to_string();

        let txn = begin_transaction(&self.db).await?;

        let current = self.purchase_order_store.get(&txn, order_id).await?;
        self.workflow_provider.ensure_editable(ctx, &current, "update")?;
        let (changes, priced) = self.prepare(&txn, ctx, &user_id, input).await?;
        let order = self
            .purchase_order_store
            .update_contents(&txn, current, changes, &priced.items)
            .await?;
        let items = self.purchase_order_store.items(&txn, &order.id).await?;

        commit_transaction(txn).await?;

        self.audit_logger
            .log_order_change(ctx, EventType::OrderUpdated, &order)
            .await;

        Ok(OrderDetail { order, items })
    }

    /// Delete a `Nueva` order; requester only
    pub async fn delete_order(&self, ctx: &RequestContext, order_id: &str) -> Result<(), InternalError> {
        self.authorization_provider.authenticated_user(ctx)?;

        let txn = begin_transaction(&self.db).await?;

        let order = self.purchase_order_store.get(&txn, order_id).await?;
        self.workflow_provider.ensure_editable(ctx, &order, "delete")?;
        self.purchase_order_store.delete(&txn, order_id).await?;

        commit_transaction(txn).await?;

        self.audit_logger
            .log_order_change(ctx, EventType::OrderDeleted, &order)
            .await;

        Ok(())
    }

    /// Newest first; callers without `ordenes.ver_todas` only get their own orders
    pub async fn list_orders(
        &self,
        ctx: &RequestContext,
        query: OrderQuery,
    ) -> Result<Vec<purchase_order::Model>, InternalError> {
        let user_id = self.authorization_provider.authenticated_user(ctx)?;

        let usuario_id = if query.mine || !ctx.has_permission(Permission::OrdersViewAll) {
            Some(user_id.to_string())
        } else {
            None
        };
        let filter = OrderFilter {
            estado: query.estado,
            cp_id: query.cp_id,
            usuario_id,
            proveedor_id: query.proveedor_id,
        };

        self.purchase_order_store.list(&self.db, &filter).await
    }

    /// Order with items, if the caller may see it
    ///
    /// Visible to its requester and to holders of `ordenes.ver_todas`,
    /// `ordenes.aprobar` or `ordenes.cerrar`. Hidden orders are reported as missing.
    pub async fn get_order(
        &self,
        ctx: &RequestContext,
        order_id: &str,
    ) -> Result<OrderDetail, InternalError> {
        let user_id = self.authorization_provider.authenticated_user(ctx)?;

        let order = self.purchase_order_store.get(&self.db, order_id).await?;
        let reviewer = [
            Permission::OrdersViewAll,
            Permission::OrdersApprove,
            Permission::OrdersClose,
        ]
        .into_iter()
        .any(|p| ctx.has_permission(p));
        if order.usuario_id != user_id && !reviewer {
            return Err(OrderError::NotFound {
                order_id: order_id.to_string(),
            }
            .into());
        }

        self.detail(&self.db, order).await
    }

    pub async fn submit(&self, ctx: &RequestContext, order_id: &str) -> Result<OrderDetail, InternalError> {
        self.transition(ctx, order_id, OrderAction::Submit, None).await
    }

    pub async fn approve(&self, ctx: &RequestContext, order_id: &str) -> Result<OrderDetail, InternalError> {
        self.transition(ctx, order_id, OrderAction::Approve, None).await
    }

    /// Reject an order under review; `motivo` must not be blank
    pub async fn reject(
        &self,
        ctx: &RequestContext,
        order_id: &str,
        motivo: Option<String>,
    ) -> Result<OrderDetail, InternalError> {
        self.transition(ctx, order_id, OrderAction::Reject, motivo).await
    }

    pub async fn request_close(
        &self,
        ctx: &RequestContext,
        order_id: &str,
    ) -> Result<OrderDetail, InternalError> {
        self.transition(ctx, order_id, OrderAction::RequestClose, None).await
    }

    pub async fn close(&self, ctx: &RequestContext, order_id: &str) -> Result<OrderDetail, InternalError> {
        self.transition(ctx, order_id, OrderAction::Close, None).await
    }

    /// Orchestrate one workflow step in a single transaction
    ///
    /// 1. Authorize the action and resolve the target state
    /// 2. Action-specific checks (advisory balance on submit, reason on reject)
    /// 3. Conditional state update; zero rows means a concurrent change
    /// 4. On entering a committed state, conditional debit; zero rows means insufficient budget
    /// 5. Notifications, commit, then audit
    ///
    /// Any failure drops the transaction, undoing the state change and debit together.
    ///
    /// # Arguments
    /// * `ctx` - RequestContext with authenticated user info
    /// * `order_id` - Order to move
    /// * `action` - The workflow step
    /// * `motivo` - Rejection reason; ignored for other actions
    ///
    /// # Returns
    /// * `Ok(OrderDetail)` - The order in its new state
    /// * `Err(InternalError)` - Authorization, `InvalidTransition`, `ConcurrentModification`,
    ///   `InsufficientFunds`, or a code out of its validity window
    pub async fn transition(
        &self,
        ctx: &RequestContext,
        order_id: &str,
        action: OrderAction,
        motivo: Option<String>,
    ) -> Result<OrderDetail, InternalError> {
        let actor_id = self.authorization_provider.authenticated_user(ctx)?.to_string();

        let txn = begin_transaction(&self.db).await?;

        let order = self.purchase_order_store.get(&txn, order_id).await?;
        let from = order.estado;
        let to = self.workflow_provider.authorize_transition(ctx, &order, action)?;

        let motivo_rechazo = match action {
            OrderAction::Reject => Some(self.workflow_provider.rejection_reason(motivo.as_deref())?),
            _ => None,
        };

        if matches!(action, OrderAction::Submit | OrderAction::Approve) {
            let cp = self.budget_code_store.get(&txn, &order.cp_id).await?;
            self.workflow_provider.ensure_in_force(&cp, unix_now())?;
            if action == OrderAction::Submit {
                self.workflow_provider.ensure_affordable(&cp, order.monto)?;
            }
        }

        let moved = self
            .purchase_order_store
            .transition(&txn, order_id, from, to, &actor_id, motivo_rechazo)
            .await?;
        if !moved {
            return Err(OrderError::ConcurrentModification {
                order_id: order_id.to_string(),
            }
            .into());
        }

        let mut debited = None;
        if to.is_committed() && !from.is_committed() {
            if !self
                .budget_code_store
                .debit(&txn, &order.cp_id, order.monto)
                .await?
            {
                let cp = self.budget_code_store.get(&txn, &order.cp_id).await?;
                tracing::warn!(
                    "Approval of order {} refused: budget {} has {} available, needs {}",
                    order.folio,
                    cp.codigo,
                    cp.monto_disponible,
                    order.monto
                );
                return Err(BudgetError::InsufficientFunds {
                    cp_id: cp.id,
                    requested: order.monto,
                    available: cp.monto_disponible,
                }
                .into());
            }
            debited = Some(order.monto);
        }

        let updated = self.purchase_order_store.get(&txn, order_id).await?;
        let notified = self.notify(&txn, &updated, action, &actor_id).await?;
        let detail = self.detail(&txn, updated).await?;

        commit_transaction(txn).await?;

        self.audit_logger
            .log_order_transition(ctx, &detail.order, action, from, debited)
            .await;

        tracing::info!(
            "Order {} moved {} -> {} by {} ({} notification(s))",
            detail.order.folio,
            from,
            to,
            actor_id,
            notified
        );

        Ok(detail)
    }

    /// Validate input and price it for `user_id`
    async fn prepare<C: ConnectionTrait>(
        &self,
        conn: &C,
        ctx: &RequestContext,
        user_id: &str,
        input: OrderInput,
    ) -> Result<(NewOrder, PricedOrder), InternalError> {
        let descripcion = validation::required_text("descripcion", &input.descripcion)?;

        let cp = self.budget_code_store.get(conn, &input.cp_id).await?;
        self.workflow_provider.ensure_in_force(&cp, unix_now())?;
        if !ctx.has_permission(Permission::BudgetAdmin)
            && !self
                .user_store
                .is_assigned_to_budget_code(conn, user_id, &cp.id)
                .await?
        {
            return Err(AuthorizationError::BudgetCodeNotAssigned {
                user_id: user_id.to_string(),
                cp_id: cp.id,
            }
            .into());
        }

        let proveedor_id = validation::optional_text(input.proveedor_id);
        if let Some(proveedor_id) = &proveedor_id {
            let supplier = self.supplier_store.get(conn, proveedor_id).await?;
            if !supplier.activo {
                return Err(CatalogError::not_found("Supplier", proveedor_id.clone()).into());
            }
        }

        let product_ids: BTreeSet<String> = input
            .items
            .iter()
            .filter_map(|item| item.producto_id.clone())
            .collect();
        let products = self
            .product_store
            .find_many(conn, product_ids.into_iter().collect())
            .await?;
        let priced = self.workflow_provider.price_items(&input.items, &products)?;

        let new_order = NewOrder {
            usuario_id: user_id.to_string(),
            cp_id: cp.id,
            proveedor_id,
            descripcion,
            monto: priced.monto,
        };

        Ok((new_order, priced))
    }

    /// Write the notifications of `action` for `order`; the actor is never notified
    async fn notify<C: ConnectionTrait>(
        &self,
        conn: &C,
        order: &purchase_order::Model,
        action: OrderAction,
        actor_id: &str,
    ) -> Result<u64, InternalError> {
        let event = NotificationEvent::for_action(action);
        let recipients = match event.recipients() {
            Recipients::Requester => vec![order.usuario_id.clone()],
            Recipients::Holders(permission) => {
                let holders = self
                    .role_store
                    .holders_of_permission(conn, permission.key())
                    .await?;
                self.user_store.active_ids(conn, holders).await?
            }
        };
        let recipients: Vec<String> = recipients
            .into_iter()
            .filter(|id| id != actor_id)
            .collect();

        let draft = self.notification_provider.compose(event, order);
        self.notification_store
            .create_for(conn, &recipients, &draft)
            .await
    }

    async fn detail<C: ConnectionTrait>(
        &self,
        conn: &C,
        order: purchase_order::Model,
    ) -> Result<OrderDetail, InternalError> {
        let items = self.purchase_order_store.items(conn, &order.id).await?;
        Ok(OrderDetail { order, items })
    }
}
