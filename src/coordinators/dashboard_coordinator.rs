use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::providers::AuthorizationProvider;
use crate::stores::{
    BudgetCodeStore, NotificationStore, OrderFilter, PurchaseOrderStore, UserStore,
};
use crate::types::internal::context::RequestContext;
use crate::types::internal::{Permission, StatusTotals, checked_total, totals_by_status};

/// Figures shown on the caller's landing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub ordenes_por_estado: Vec<StatusTotals>,
    pub total_ordenes: u64,
    pub presupuesto_total: i64,
    pub disponible_total: i64,
    pub comprometido_total: i64,
    pub notificaciones_no_leidas: u64,
}

/// Dashboard coordinator: read-only aggregates over what the caller may see
///
/// Orders follow the listing rule (own orders unless `ordenes.ver_todas`);
/// budget figures follow budget code visibility (assigned codes unless
/// `presupuesto.administrar`).
pub struct DashboardCoordinator {
    db: DatabaseConnection,
    purchase_order_store: Arc<PurchaseOrderStore>,
    budget_code_store: Arc<BudgetCodeStore>,
    user_store: Arc<UserStore>,
    notification_store: Arc<NotificationStore>,
    authorization_provider: AuthorizationProvider,
}

impl DashboardCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.connections.main.clone(),
            purchase_order_store: app_data.purchase_order_store.clone(),
            budget_code_store: app_data.budget_code_store.clone(),
            user_store: app_data.user_store.clone(),
            notification_store: app_data.notification_store.clone(),
            authorization_provider: AuthorizationProvider::new(),
        }
    }

    /// Landing page figures for the caller
    ///
    /// # Returns
    /// * `Ok(DashboardSummary)` - Order counts per state, budget totals and unread notifications
    /// * `Err(InternalError)` - Unauthenticated, or a total that does not fit in `i64`
    pub async fn summary(&self, ctx: &RequestContext) -> Result<DashboardSummary, InternalError> {
        let user_id = self.authorization_provider.authenticated_user(ctx)?;

        let filter = OrderFilter {
            usuario_id: (!ctx.has_permission(Permission::OrdersViewAll))
                .then(|| user_id.to_string()),
            ..OrderFilter::default()
        };
        let orders = self.purchase_order_store.list(&self.db, &filter).await?;

        let cp_ids = if ctx.has_permission(Permission::BudgetAdmin) {
            None
        } else {
            Some(self.user_store.budget_code_ids(&self.db, user_id).await?)
        };
        let codes = self.budget_code_store.list(&self.db, cp_ids, None).await?;

        let presupuesto_total =
            checked_total("presupuesto_total", codes.iter().map(|c| c.monto_presupuesto))?;
        let disponible_total =
            checked_total("disponible_total", codes.iter().map(|c| c.monto_disponible))?;
        let ordenes_por_estado = totals_by_status(&orders)?;

        let notificaciones_no_leidas = self.notification_store.unread_count(&self.db, user_id).await?;

        Ok(DashboardSummary {
            ordenes_por_estado,
            total_ordenes: orders.len() as u64,
            presupuesto_total,
            disponible_total,
            comprometido_total: presupuesto_total - disponible_total,
            notificaciones_no_leidas,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{
        ctx_with_permissions, insert_budget_code, insert_user, setup_test_app_data,
    };
    use crate::types::internal::OrderStatus;

    #[tokio::test]
    async fn test_summary_only_counts_visible_codes() {
        let app_data = setup_test_app_data().await;
        let db = &app_data.connections.main;
        let ana = insert_user(db, "ana@example.mx").await;
        let assigned = insert_budget_code(db, "CP-A", 5_000).await;
        insert_budget_code(db, "CP-B", 7_000).await;
        app_data
            .budget_code_store
            .debit(db, &assigned.id, 1_500)
            .await
            .unwrap();
        app_data
            .user_store
            .set_budget_codes(db, &ana.id, &[assigned.id.clone()])
            .await
            .unwrap();
        let coordinator = DashboardCoordinator::new(app_data.clone());

        let own = coordinator.summary(&ctx_with_permissions(&ana.id, &[])).await.unwrap();
        assert_eq!(own.presupuesto_total, 5_000);
        assert_eq!(own.disponible_total, 3_500);
        assert_eq!(own.comprometido_total, 1_500);
        assert_eq!(own.total_ordenes, 0);
        assert_eq!(own.ordenes_por_estado.len(), OrderStatus::ALL.len());
        assert_eq!(own.notificaciones_no_leidas, 0);

        let admin = coordinator
            .summary(&ctx_with_permissions(&ana.id, &[Permission::BudgetAdmin]))
            .await
            .unwrap();
        assert_eq!(admin.presupuesto_total, 12_000);
        assert_eq!(admin.disponible_total, 10_500);
    }

    #[tokio::test]
    async fn test_summary_reports_overflowing_totals() {
        let app_data = setup_test_app_data().await;
        let db = &app_data.connections.main;
        let ana = insert_user(db, "ana@example.mx").await;
        insert_budget_code(db, "CP-A", i64::MAX).await;
        insert_budget_code(db, "CP-B", i64::MAX).await;
        let coordinator = DashboardCoordinator::new(app_data.clone());

        let result = coordinator
            .summary(&ctx_with_permissions(&ana.id, &[Permission::BudgetAdmin]))
            .await;

        assert!(matches!(result, Err(InternalError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_summary_requires_authentication() {
        let app_data = setup_test_app_data().await;
        let coordinator = DashboardCoordinator::new(app_data);

        assert!(coordinator.summary(&RequestContext::new()).await.is_err());
    }
}
