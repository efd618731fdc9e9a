use std::sync::Arc;

use sea_orm::{ConnectionTrait, DatabaseConnection};

use crate::app_data::AppData;
use crate::audit::AuditLogger;
use crate::config::{begin_transaction, commit_transaction};
use crate::coordinators::validation;
use crate::errors::InternalError;
use crate::errors::internal::{AuthorizationError, BudgetError};
use crate::providers::AuthorizationProvider;
use crate::stores::{
    AreaStore, BudgetCodeChanges, BudgetCodeStore, NewBudgetCode, OrderFilter,
    PurchaseOrderStore, UserStore,
};
use crate::types::db::budget_code;
use crate::types::internal::audit::EventType;
use crate::types::internal::context::RequestContext;
use crate::types::internal::{Permission, StatusTotals, totals_by_status};

const BUDGET_ENTITY: &str = "codigo_presupuestal";

/// Balance of a budget code with its orders grouped by state
#[derive(Debug, Clone)]
pub struct BudgetBalance {
    pub code: budget_code::Model,
    pub monto_comprometido: i64,
    pub ordenes_por_estado: Vec<StatusTotals>,
}

/// Budget coordinator: budget codes and their balances
///
/// Holders of `presupuesto.administrar` see and manage every code; other
/// users only see the codes assigned to them.
pub struct BudgetCoordinator {
    db: DatabaseConnection,
    budget_code_store: Arc<BudgetCodeStore>,
    purchase_order_store: Arc<PurchaseOrderStore>,
    user_store: Arc<UserStore>,
    area_store: Arc<AreaStore>,
    authorization_provider: AuthorizationProvider,
    audit_logger: Arc<AuditLogger>,
}

impl BudgetCoordinator {
    /// Create BudgetCoordinator from AppData
    ///
    /// # Arguments
    /// * `app_data` - Application data containing all stores and configuration
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.connections.main.clone(),
            budget_code_store: app_data.budget_code_store.clone(),
            purchase_order_store: app_data.purchase_order_store.clone(),
            user_store: app_data.user_store.clone(),
            area_store: app_data.area_store.clone(),
            authorization_provider: AuthorizationProvider::new(),
            audit_logger: app_data.audit_logger.clone(),
        }
    }

    /// Create a code whose available amount starts at the full budget
    ///
    /// # Authorization
    /// Requires `presupuesto.administrar`
    ///
    /// # Arguments
    /// * `ctx` - RequestContext with authenticated user info
    /// * `new_code` - Raw input; `codigo` is trimmed and uppercased
    ///
    /// # Returns
    /// * `Ok(budget_code::Model)` - The stored code
    /// * `Err(InternalError)` - Missing permission, blank fields, an amount outside
    ///   `0..=MAX_AMOUNT`, an inverted validity window, unknown area, or duplicate `codigo`
    pub async fn create_budget_code(
        &self,
        ctx: &RequestContext,
        new_code: NewBudgetCode,
    ) -> Result<budget_code::Model, InternalError> {
        self.authorization_provider.require(ctx, Permission::BudgetAdmin)?;
        let new_code = NewBudgetCode {
            codigo: validation::required_text("codigo", &new_code.codigo)?.to_uppercase(),
            nombre: validation::required_text("nombre", &new_code.nombre)?,
            area_id: validation::optional_text(new_code.area_id),
            monto_presupuesto: validation::amount("monto_presupuesto", new_code.monto_presupuesto)?,
            vigencia_inicio: new_code.vigencia_inicio,
            vigencia_fin: new_code.vigencia_fin,
        };
        validation::validity_window(new_code.vigencia_inicio, new_code.vigencia_fin)?;

        let txn = begin_transaction(&self.db).await?;
        if let Some(area_id) = &new_code.area_id {
            self.area_store.get(&txn, area_id).await?;
        }
        let code = self.budget_code_store.create(&txn, new_code).await?;
        commit_transaction(txn).await?;

        self.audit_logger
            .entity_event(ctx, EventType::BudgetCodeCreated, BUDGET_ENTITY, &code.id)
            .add_field("codigo", &code.codigo)
            .add_field("monto_presupuesto", code.monto_presupuesto)
            .emit()
            .await;

        Ok(code)
    }

    /// Every code for budget admins, otherwise only the caller's assigned codes
    pub async fn list_budget_codes(
        &self,
        ctx: &RequestContext,
        area_id: Option<String>,
    ) -> Result<Vec<budget_code::Model>, InternalError> {
        let ids = self.visible_ids(&self.db, ctx).await?;

        self.budget_code_store
            .list(&self.db, ids, area_id.as_deref())
            .await
    }

    pub async fn get_budget_code(
        &self,
        ctx: &RequestContext,
        cp_id: &str,
    ) -> Result<budget_code::Model, InternalError> {
        self.ensure_visible(ctx, cp_id).await?;

        self.budget_code_store.get(&self.db, cp_id).await
    }

    /// Apply changes to a budget code
    ///
    /// A new `monto_presupuesto` moves the available amount by the same delta and
    /// is refused when it would drop below what approved orders already committed.
    ///
    /// # Authorization
    /// Requires `presupuesto.administrar`
    ///
    /// # Arguments
    /// * `ctx` - RequestContext with authenticated user info
    /// * `cp_id` - Code to change
    /// * `changes` - Fields to overwrite
    ///
    /// # Returns
    /// * `Ok(budget_code::Model)` - The updated code
    /// * `Err(InternalError)` - Validation, `BudgetError::NotFound`, or `BudgetError::BelowCommitted`
    pub async fn update_budget_code(
        &self,
        ctx: &RequestContext,
        cp_id: &str,
        changes: BudgetCodeChanges,
    ) -> Result<budget_code::Model, InternalError> {
        self.authorization_provider.require(ctx, Permission::BudgetAdmin)?;
        let changes = BudgetCodeChanges {
            nombre: changes
                .nombre
                .map(|n| validation::required_text("nombre", &n))
                .transpose()?,
            area_id: changes.area_id.map(validation::optional_text),
            monto_presupuesto: changes
                .monto_presupuesto
                .map(|m| validation::amount("monto_presupuesto", m))
                .transpose()?,
            vigencia_inicio: changes.vigencia_inicio,
            vigencia_fin: changes.vigencia_fin,
        };

        let txn = begin_transaction(&self.db).await?;

        let current = self.budget_code_store.get(&txn, cp_id).await?;
        validation::validity_window(
            changes.vigencia_inicio.unwrap_or(current.vigencia_inicio),
            changes.vigencia_fin.unwrap_or(current.vigencia_fin),
        )?;
        if let Some(Some(area_id)) = &changes.area_id {
            self.area_store.get(&txn, area_id).await?;
        }
        let previous_presupuesto = current.monto_presupuesto;
        let code = self.budget_code_store.update(&txn, current, changes).await?;

        commit_transaction(txn).await?;

        self.audit_logger
            .entity_event(ctx, EventType::BudgetCodeUpdated, BUDGET_ENTITY, &code.id)
            .add_field("monto_presupuesto_anterior", previous_presupuesto)
            .add_field("monto_presupuesto", code.monto_presupuesto)
            .add_field("monto_disponible", code.monto_disponible)
            .emit()
            .await;

        Ok(code)
    }

    /// Delete a code no order references
    pub async fn delete_budget_code(&self, ctx: &RequestContext, cp_id: &str) -> Result<(), InternalError> {
        self.authorization_provider.require(ctx, Permission::BudgetAdmin)?;

        let txn = begin_transaction(&self.db).await?;

        let code = self.budget_code_store.get(&txn, cp_id).await?;
        let orders = self
            .purchase_order_store
            .count_for_budget_code(&txn, cp_id)
            .await?;
        if orders > 0 {
            return Err(BudgetError::InUse {
                cp_id: cp_id.to_string(),
                orders,
            }
            .into());
        }
        self.budget_code_store.delete(&txn, cp_id).await?;

        commit_transaction(txn).await?;

        self.audit_logger
            .entity_event(ctx, EventType::BudgetCodeDeleted, BUDGET_ENTITY, cp_id)
            .add_field("codigo", &code.codigo)
            .emit()
            .await;

        Ok(())
    }

    /// Committed amount and per-state order totals of one code
    ///
    /// # Arguments
    /// * `ctx` - RequestContext; the code must be visible to the caller
    /// * `cp_id` - Code to report on
    ///
    /// # Returns
    /// * `Ok(BudgetBalance)` - The code, its committed amount and one entry per state
    /// * `Err(InternalError)` - Not visible, not found, or a state total that overflows
    pub async fn budget_code_balance(
        &self,
        ctx: &RequestContext,
        cp_id: &str,
    ) -> Result<BudgetBalance, InternalError> {
        self.ensure_visible(ctx, cp_id).await?;

        let code = self.budget_code_store.get(&self.db, cp_id).await?;
        let orders = self
            .purchase_order_store
            .list(
                &self.db,
                &OrderFilter {
                    cp_id: Some(cp_id.to_string()),
                    ..Default::default()
                },
            )
            .await?;

        Ok(BudgetBalance {
            monto_comprometido: code.monto_comprometido(),
            ordenes_por_estado: totals_by_status(&orders)?,
            code,
        })
    }

    /// `None` means every code
    pub(crate) async fn visible_ids<C: ConnectionTrait>(
        &self,
        conn: &C,
        ctx: &RequestContext,
    ) -> Result<Option<Vec<String>>, InternalError> {
        let user_id = self.authorization_provider.authenticated_user(ctx)?;
        if ctx.has_permission(Permission::BudgetAdmin) {
            return Ok(None);
        }
        Ok(Some(self.user_store.budget_code_ids(conn, user_id).await?))
    }

    async fn ensure_visible(&self, ctx: &RequestContext, cp_id: &str) -> Result<(), InternalError> {
        let user_id = self.authorization_provider.authenticated_user(ctx)?;
        if ctx.has_permission(Permission::BudgetAdmin) {
            return Ok(());
        }
        if self
            .user_store
            .is_assigned_to_budget_code(&self.db, user_id, cp_id)
            .await?
        {
            return Ok(());
        }
        Err(AuthorizationError::BudgetCodeNotAssigned {
            user_id: user_id.to_string(),
            cp_id: cp_id.to_string(),
        }
        .into())
    }
}
