#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::app_data::AppData;
    use crate::coordinators::{OrderCoordinator, OrderInput, OrderQuery};
    use crate::errors::InternalError;
    use crate::errors::internal::{AuthorizationError, BudgetError, OrderError};
    use crate::stores::{NewBudgetCode, unix_now};
    use crate::test::utils::{
        ctx_with_permissions, grant_permissions, insert_budget_code, insert_user,
        setup_test_app_data,
    };
    use crate::types::db::{budget_code, user};
    use crate::types::internal::context::RequestContext;
    use crate::types::internal::{OrderItemDraft, OrderStatus, Permission};

    struct Fixture {
        app_data: Arc<AppData>,
        coordinator: OrderCoordinator,
        requester: user::Model,
        approver: user::Model,
        closer: user::Model,
        cp: budget_code::Model,
    }

    impl Fixture {
        async fn new(presupuesto: i64) -> Self {
            let app_data = setup_test_app_data().await;
            let db = &app_data.connections.main;

            let requester = insert_user(db, "solicitante@example.mx").await;
            let approver = insert_user(db, "aprobador@example.mx").await;
            let closer = insert_user(db, "cierre@example.mx").await;
            grant_permissions(db, &requester.id, &[Permission::OrdersCreate]).await;
            grant_permissions(db, &approver.id, &[Permission::OrdersApprove]).await;
            grant_permissions(db, &closer.id, &[Permission::OrdersClose]).await;

            let cp = insert_budget_code(db, "CP-ORD", presupuesto).await;
            app_data
                .user_store
                .set_budget_codes(db, &requester.id, &[cp.id.clone()])
                .await
                .unwrap();

            Self {
                coordinator: OrderCoordinator::new(app_data.clone()),
                app_data,
                requester,
                approver,
                closer,
                cp,
            }
        }

        fn requester_ctx(&self) -> RequestContext {
            ctx_with_permissions(&self.requester.id, &[Permission::OrdersCreate])
        }

        fn approver_ctx(&self) -> RequestContext {
            ctx_with_permissions(&self.approver.id, &[Permission::OrdersApprove])
        }

        fn closer_ctx(&self) -> RequestContext {
            ctx_with_permissions(&self.closer.id, &[Permission::OrdersClose])
        }

        fn input(&self, cantidad: i64, precio: i64) -> OrderInput {
            OrderInput {
                cp_id: self.cp.id.clone(),
                proveedor_id: None,
                descripcion: "Material de limpieza".to_string(),
                items: vec![OrderItemDraft {
                    producto_id: None,
                    descripcion: Some("Jabón".to_string()),
                    cantidad,
                    precio_unitario: Some(precio),
                }],
            }
        }

        async fn disponible(&self) -> i64 {
            self.app_data
                .budget_code_store
                .get(&self.app_data.connections.main, &self.cp.id)
                .await
                .unwrap()
                .monto_disponible
        }

        async fn unread(&self, user_id: &str) -> u64 {
            self.app_data
                .notification_store
                .unread_count(&self.app_data.connections.main, user_id)
                .await
                .unwrap()
        }
    }

    #[tokio::test]
    async fn test_create_computes_total_and_sequential_folios() {
        let f = Fixture::new(100_000).await;

        let first = f.coordinator.create_order(&f.requester_ctx(), f.input(3, 250)).await.unwrap();
        let second = f.coordinator.create_order(&f.requester_ctx(), f.input(1, 10)).await.unwrap();

        assert_eq!(first.order.monto, 750);
        assert_eq!(first.order.estado, OrderStatus::Nueva);
        assert_eq!(first.order.folio, "OC-000001");
        assert_eq!(second.order.folio, "OC-000002");
        assert_eq!(first.items.len(), 1);
        assert_eq!(first.items[0].importe, 750);
    }

    #[tokio::test]
    async fn test_create_requires_assigned_budget_code() {
        let f = Fixture::new(100_000).await;
        let other = insert_budget_code(&f.app_data.connections.main, "CP-OTRO", 1_000).await;
        let mut input = f.input(1, 10);
        input.cp_id = other.id;

        let result = f.coordinator.create_order(&f.requester_ctx(), input).await;

        assert!(matches!(
            result,
            Err(InternalError::Authorization(AuthorizationError::BudgetCodeNotAssigned { .. }))
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_expired_budget_code() {
        let f = Fixture::new(100_000).await;
        let db = &f.app_data.connections.main;
        let now = unix_now();
        let expired = f
            .app_data
            .budget_code_store
            .create(
                db,
                NewBudgetCode {
                    codigo: "CP-2020".to_string(),
                    nombre: "Ejercicio anterior".to_string(),
                    area_id: None,
                    monto_presupuesto: 1_000,
                    vigencia_inicio: now - 2_000,
                    vigencia_fin: now - 1_000,
                },
            )
            .await
            .unwrap();
        let ctx = ctx_with_permissions(
            &f.requester.id,
            &[Permission::OrdersCreate, Permission::BudgetAdmin],
        );
        let mut input = f.input(1, 10);
        input.cp_id = expired.id;

        let result = f.coordinator.create_order(&ctx, input).await;

        assert!(matches!(
            result,
            Err(InternalError::Budget(BudgetError::NotInForce { .. }))
        ));
    }

    #[tokio::test]
    async fn test_full_workflow_debits_budget_and_notifies() {
        let f = Fixture::new(10_000).await;
        let created = f.coordinator.create_order(&f.requester_ctx(), f.input(4, 1_000)).await.unwrap();
        let id = created.order.id.clone();

        let submitted = f.coordinator.submit(&f.requester_ctx(), &id).await.unwrap();
        assert_eq!(submitted.order.estado, OrderStatus::EnRevision);
        assert_eq!(f.unread(&f.approver.id).await, 1);
        assert_eq!(f.unread(&f.closer.id).await, 0);

        let approved = f.coordinator.approve(&f.approver_ctx(), &id).await.unwrap();
        assert_eq!(approved.order.estado, OrderStatus::Aprobada);
        assert_eq!(approved.order.usuario_actualizacion_id, f.approver.id);
        assert_eq!(f.disponible().await, 6_000);
        assert_eq!(f.unread(&f.requester.id).await, 1);

        f.coordinator.request_close(&f.requester_ctx(), &id).await.unwrap();
        assert_eq!(f.unread(&f.closer.id).await, 1);

        let closed = f.coordinator.close(&f.closer_ctx(), &id).await.unwrap();
        assert_eq!(closed.order.estado, OrderStatus::Cerrada);
        assert_eq!(f.unread(&f.requester.id).await, 2);
        assert_eq!(f.disponible().await, 6_000);

        let trail = f
            .app_data
            .audit_store
            .find_by_entity("orden_compra", &id)
            .await
            .unwrap();
        let event_types: Vec<&str> = trail.iter().map(|e| e.event_type.as_str()).collect();
        assert_eq!(
            event_types,
            vec![
                "order_created",
                "order_transition",
                "order_transition",
                "order_transition",
                "order_transition"
            ]
        );
    }

    #[tokio::test]
    async fn test_requester_cannot_approve_own_order() {
        let f = Fixture::new(10_000).await;
        let created = f.coordinator.create_order(&f.requester_ctx(), f.input(1, 100)).await.unwrap();
        f.coordinator.submit(&f.requester_ctx(), &created.order.id).await.unwrap();
        let ctx = ctx_with_permissions(
            &f.requester.id,
            &[Permission::OrdersCreate, Permission::OrdersApprove],
        );

        let result = f.coordinator.approve(&ctx, &created.order.id).await;

        assert!(matches!(
            result,
            Err(InternalError::Authorization(AuthorizationError::SelfReview { .. }))
        ));
    }

    #[tokio::test]
    async fn test_insufficient_budget_rolls_back_approval() {
        let f = Fixture::new(1_000).await;
        let db = &f.app_data.connections.main;
        let created = f.coordinator.create_order(&f.requester_ctx(), f.input(8, 100)).await.unwrap();
        let id = created.order.id.clone();
        f.coordinator.submit(&f.requester_ctx(), &id).await.unwrap();

        // Another approval consumes the budget in the meantime
        assert!(f.app_data.budget_code_store.debit(db, &f.cp.id, 500).await.unwrap());

        let result = f.coordinator.approve(&f.approver_ctx(), &id).await;
        assert!(matches!(
            result,
            Err(InternalError::Budget(BudgetError::InsufficientFunds {
                requested: 800,
                available: 500,
                ..
            }))
        ));

        let order = f.app_data.purchase_order_store.get(db, &id).await.unwrap();
        assert_eq!(order.estado, OrderStatus::EnRevision);
        assert_eq!(f.disponible().await, 500);
        assert_eq!(f.unread(&f.requester.id).await, 0);
    }

    #[tokio::test]
    async fn test_submit_checks_balance_early() {
        let f = Fixture::new(100).await;
        let created = f.coordinator.create_order(&f.requester_ctx(), f.input(2, 100)).await.unwrap();

        let result = f.coordinator.submit(&f.requester_ctx(), &created.order.id).await;

        assert!(matches!(
            result,
            Err(InternalError::Budget(BudgetError::InsufficientFunds { .. }))
        ));
    }

    #[tokio::test]
    async fn test_reject_needs_reason_and_is_terminal() {
        let f = Fixture::new(10_000).await;
        let created = f.coordinator.create_order(&f.requester_ctx(), f.input(1, 100)).await.unwrap();
        let id = created.order.id.clone();
        f.coordinator.submit(&f.requester_ctx(), &id).await.unwrap();

        let blank = f.coordinator.reject(&f.approver_ctx(), &id, Some("  ".to_string())).await;
        assert!(matches!(
            blank,
            Err(InternalError::Order(OrderError::MissingRejectionReason))
        ));

        let rejected = f
            .coordinator
            .reject(&f.approver_ctx(), &id, Some("Proveedor no autorizado".to_string()))
            .await
            .unwrap();
        assert_eq!(rejected.order.estado, OrderStatus::Rechazada);
        assert_eq!(
            rejected.order.motivo_rechazo.as_deref(),
            Some("Proveedor no autorizado")
        );
        assert_eq!(f.disponible().await, 10_000);

        let resubmit = f.coordinator.submit(&f.requester_ctx(), &id).await;
        assert!(matches!(
            resubmit,
            Err(InternalError::Order(OrderError::InvalidTransition { .. }))
        ));
    }

    #[tokio::test]
    async fn test_only_nueva_orders_are_editable() {
        let f = Fixture::new(10_000).await;
        let created = f.coordinator.create_order(&f.requester_ctx(), f.input(1, 100)).await.unwrap();
        let id = created.order.id.clone();

        let by_other = f.coordinator.update_order(&f.approver_ctx(), &id, f.input(2, 100)).await;
        assert!(matches!(
            by_other,
            Err(InternalError::Authorization(AuthorizationError::NotRequester { .. }))
        ));

        let updated = f
            .coordinator
            .update_order(&f.requester_ctx(), &id, f.input(2, 100))
            .await
            .unwrap();
        assert_eq!(updated.order.monto, 200);
        assert_eq!(updated.items.len(), 1);

        f.coordinator.submit(&f.requester_ctx(), &id).await.unwrap();
        let after_submit = f.coordinator.delete_order(&f.requester_ctx(), &id).await;
        assert!(matches!(
            after_submit,
            Err(InternalError::Order(OrderError::NotEditable { .. }))
        ));
    }

    #[tokio::test]
    async fn test_list_is_limited_to_own_orders_without_view_all() {
        let f = Fixture::new(10_000).await;
        f.coordinator.create_order(&f.requester_ctx(), f.input(1, 100)).await.unwrap();

        let own = f.coordinator.list_orders(&f.requester_ctx(), OrderQuery::default()).await.unwrap();
        assert_eq!(own.len(), 1);

        let others = f.coordinator.list_orders(&f.closer_ctx(), OrderQuery::default()).await.unwrap();
        assert!(others.is_empty());

        let viewer = ctx_with_permissions(&f.closer.id, &[Permission::OrdersViewAll]);
        let all = f.coordinator.list_orders(&viewer, OrderQuery::default()).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_hidden_order_reads_as_missing() {
        let f = Fixture::new(10_000).await;
        let created = f.coordinator.create_order(&f.requester_ctx(), f.input(1, 100)).await.unwrap();
        let stranger = ctx_with_permissions("stranger", &[]);

        let result = f.coordinator.get_order(&stranger, &created.order.id).await;

        assert!(matches!(result, Err(InternalError::Order(OrderError::NotFound { .. }))));
        assert!(f.coordinator.get_order(&f.approver_ctx(), &created.order.id).await.is_ok());
    }
}
