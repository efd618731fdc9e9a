#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::errors::InternalError;
    use crate::errors::internal::{AuthorizationError, BudgetError, CatalogError, OrderError};
    use crate::providers::OrderWorkflowProvider;
    use crate::test::utils::{ctx_with_permissions, sample_budget_code, sample_order};
    use crate::types::db::product;
    use crate::types::internal::{MAX_AMOUNT, OrderAction, OrderItemDraft, OrderStatus, Permission};

    fn draft(cantidad: i64, precio: Option<i64>) -> OrderItemDraft {
        OrderItemDraft {
            producto_id: None,
            descripcion: Some("Papel bond".to_string()),
            cantidad,
            precio_unitario: precio,
        }
    }

    fn catalog_product(id: &str, precio: i64, activo: bool) -> product::Model {
        product::Model {
            id: id.to_string(),
            nombre: "Tóner".to_string(),
            descripcion: None,
            unidad: "pieza".to_string(),
            precio_unitario: precio,
            proveedor_id: None,
            activo,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_monto_is_sum_of_importes() {
        let workflow = OrderWorkflowProvider::new();
        let priced = workflow
            .price_items(&[draft(3, Some(1250)), draft(2, Some(500))], &HashMap::new())
            .unwrap();

        assert_eq!(priced.items[0].importe, 3750);
        assert_eq!(priced.items[1].importe, 1000);
        assert_eq!(priced.monto, 4750);
    }

    #[test]
    fn test_empty_order_is_rejected() {
        let workflow = OrderWorkflowProvider::new();
        assert!(matches!(
            workflow.price_items(&[], &HashMap::new()),
            Err(InternalError::Validation { .. })
        ));
    }

    #[test]
    fn test_zero_quantity_and_zero_total_are_rejected() {
        let workflow = OrderWorkflowProvider::new();
        assert!(workflow.price_items(&[draft(0, Some(100))], &HashMap::new()).is_err());
        assert!(workflow.price_items(&[draft(5, Some(0))], &HashMap::new()).is_err());
        assert!(workflow.price_items(&[draft(1, Some(-10))], &HashMap::new()).is_err());
    }

    #[test]
    fn test_overflow_is_a_validation_error() {
        let workflow = OrderWorkflowProvider::new();
        assert!(matches!(
            workflow.price_items(&[draft(i64::MAX, Some(2))], &HashMap::new()),
            Err(InternalError::Validation { .. })
        ));
    }

    #[test]
    fn test_total_above_cap_is_rejected() {
        let workflow = OrderWorkflowProvider::new();
        assert!(workflow.price_items(&[draft(1, Some(MAX_AMOUNT))], &HashMap::new()).is_ok());
        assert!(matches!(
            workflow.price_items(&[draft(1, Some(MAX_AMOUNT)), draft(1, Some(1))], &HashMap::new()),
            Err(InternalError::Validation { .. })
        ));
    }

    #[test]
    fn test_product_supplies_price_and_description() {
        let workflow = OrderWorkflowProvider::new();
        let products = HashMap::from([("p-1".to_string(), catalog_product("p-1", 800, true))]);
        let item = OrderItemDraft {
            producto_id: Some("p-1".to_string()),
            descripcion: None,
            cantidad: 2,
            precio_unitario: None,
        };

        let priced = workflow.price_items(&[item], &products).unwrap();
        assert_eq!(priced.items[0].descripcion, "Tóner");
        assert_eq!(priced.monto, 1600);
    }

    #[test]
    fn test_inactive_product_is_rejected() {
        let workflow = OrderWorkflowProvider::new();
        let products = HashMap::from([("p-1".to_string(), catalog_product("p-1", 800, false))]);
        let item = OrderItemDraft {
            producto_id: Some("p-1".to_string()),
            descripcion: None,
            cantidad: 1,
            precio_unitario: None,
        };

        assert!(matches!(
            workflow.price_items(&[item], &products),
            Err(InternalError::Catalog(CatalogError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_requester_cannot_approve_own_order() {
        let workflow = OrderWorkflowProvider::new();
        let order = sample_order("requester", OrderStatus::EnRevision, 1000);
        let ctx = ctx_with_permissions("requester", &[Permission::OrdersApprove]);

        assert!(matches!(
            workflow.authorize_transition(&ctx, &order, OrderAction::Approve),
            Err(InternalError::Authorization(AuthorizationError::SelfReview { .. }))
        ));
        assert!(matches!(
            workflow.authorize_transition(&ctx, &order, OrderAction::Reject),
            Err(InternalError::Authorization(AuthorizationError::SelfReview { .. }))
        ));
    }

    #[test]
    fn test_approver_needs_permission() {
        let workflow = OrderWorkflowProvider::new();
        let order = sample_order("requester", OrderStatus::EnRevision, 1000);

        let without = ctx_with_permissions("approver", &[Permission::OrdersCreate]);
        assert!(matches!(
            workflow.authorize_transition(&without, &order, OrderAction::Approve),
            Err(InternalError::Authorization(AuthorizationError::MissingPermission { .. }))
        ));

        let with = ctx_with_permissions("approver", &[Permission::OrdersApprove]);
        assert_eq!(
            workflow.authorize_transition(&with, &order, OrderAction::Approve).unwrap(),
            OrderStatus::Aprobada
        );
    }

    #[test]
    fn test_only_requester_submits() {
        let workflow = OrderWorkflowProvider::new();
        let order = sample_order("requester", OrderStatus::Nueva, 1000);
        let other = ctx_with_permissions("someone-else", &Permission::ALL);

        assert!(matches!(
            workflow.authorize_transition(&other, &order, OrderAction::Submit),
            Err(InternalError::Authorization(AuthorizationError::NotRequester { .. }))
        ));
    }

    #[test]
    fn test_transition_outside_graph_is_rejected() {
        let workflow = OrderWorkflowProvider::new();
        let order = sample_order("requester", OrderStatus::Rechazada, 1000);
        let ctx = ctx_with_permissions("requester", &[]);

        assert!(matches!(
            workflow.authorize_transition(&ctx, &order, OrderAction::Submit),
            Err(InternalError::Order(OrderError::InvalidTransition { .. }))
        ));
    }

    #[test]
    fn test_finished_order_refuses_any_caller() {
        let workflow = OrderWorkflowProvider::new();
        let order = sample_order("requester", OrderStatus::Cerrada, 1000);
        let outsider = ctx_with_permissions("outsider", &[]);

        for action in [OrderAction::Approve, OrderAction::Close, OrderAction::Submit] {
            assert!(matches!(
                workflow.authorize_transition(&outsider, &order, action),
                Err(InternalError::Order(OrderError::InvalidTransition { .. }))
            ));
        }
    }

    #[test]
    fn test_close_requires_close_permission() {
        let workflow = OrderWorkflowProvider::new();
        let order = sample_order("requester", OrderStatus::CierreSolicitado, 1000);

        let ctx = ctx_with_permissions("requester", &[Permission::OrdersClose]);
        assert_eq!(
            workflow.authorize_transition(&ctx, &order, OrderAction::Close).unwrap(),
            OrderStatus::Cerrada
        );
    }

    #[test]
    fn test_edit_only_in_nueva_by_requester() {
        let workflow = OrderWorkflowProvider::new();
        let ctx = ctx_with_permissions("requester", &[Permission::OrdersCreate]);

        let nueva = sample_order("requester", OrderStatus::Nueva, 1000);
        assert!(workflow.ensure_editable(&ctx, &nueva, "update").is_ok());

        let submitted = sample_order("requester", OrderStatus::EnRevision, 1000);
        assert!(matches!(
            workflow.ensure_editable(&ctx, &submitted, "update"),
            Err(InternalError::Order(OrderError::NotEditable { .. }))
        ));

        let other = ctx_with_permissions("other", &Permission::ALL);
        assert!(workflow.ensure_editable(&other, &nueva, "delete").is_err());
    }

    #[test]
    fn test_budget_code_validity_and_balance() {
        let workflow = OrderWorkflowProvider::new();
        let cp = sample_budget_code(10_000, 2_500);

        assert!(workflow.ensure_in_force(&cp, cp.vigencia_inicio).is_ok());
        assert!(workflow.ensure_in_force(&cp, cp.vigencia_fin).is_ok());
        assert!(matches!(
            workflow.ensure_in_force(&cp, cp.vigencia_fin + 1),
            Err(InternalError::Budget(BudgetError::NotInForce { .. }))
        ));

        assert!(workflow.ensure_affordable(&cp, 2_500).is_ok());
        assert!(matches!(
            workflow.ensure_affordable(&cp, 2_501),
            Err(InternalError::Budget(BudgetError::InsufficientFunds { .. }))
        ));
    }

    #[test]
    fn test_rejection_reason_must_not_be_blank() {
        let workflow = OrderWorkflowProvider::new();
        assert_eq!(
            workflow.rejection_reason(Some("  precio fuera de mercado ")).unwrap(),
            "precio fuera de mercado"
        );
        assert!(workflow.rejection_reason(Some("   ")).is_err());
        assert!(workflow.rejection_reason(None).is_err());
    }
}
