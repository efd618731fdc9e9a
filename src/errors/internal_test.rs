#[cfg(test)]
mod tests {
    use crate::errors::internal::{
        AuditError, AuthorizationError, BudgetError, CatalogError, CredentialError, InternalError,
        OrderError,
    };
    use crate::types::internal::{OrderAction, OrderStatus};
    use sea_orm::DbErr;

    #[test]
    fn test_database_error_includes_operation() {
        let db_err = DbErr::RecordNotFound("test record".to_string());
        let error = InternalError::database("create_order", db_err);

        let error_string = error.to_string();
        assert!(error_string.contains("create_order"));
        assert!(error_string.contains("Database error"));
        assert!(!error.is_unique_violation());
    }

    #[test]
    fn test_parse_error_includes_value_type() {
        let error = InternalError::parse("preferences", "expected object");

        let error_string = error.to_string();
        assert!(error_string.contains("preferences"));
        assert!(error_string.contains("expected object"));
        assert!(error_string.contains("Parse error"));
    }

    #[test]
    fn test_crypto_error_includes_operation() {
        let error = InternalError::crypto("argon2_init", "invalid secret length");

        let error_string = error.to_string();
        assert!(error_string.contains("argon2_init"));
        assert!(error_string.contains("Crypto error"));
    }

    #[test]
    fn test_validation_error_names_field() {
        let error = InternalError::validation("items", "at least one item is required");
        assert_eq!(
            error.to_string(),
            "Validation error: items: at least one item is required"
        );
    }

    #[test]
    fn test_credential_error_invalid_token() {
        let error = CredentialError::invalid_token("jwt", "signature invalid");
        assert_eq!(error.to_string(), "Invalid token: jwt - signature invalid");
    }

    #[test]
    fn test_insufficient_funds_reports_amounts() {
        let error = BudgetError::InsufficientFunds {
            cp_id: "cp-1".to_string(),
            requested: 5000,
            available: 1200,
        };
        let error_string = error.to_string();
        assert!(error_string.contains("5000"));
        assert!(error_string.contains("1200"));
    }

    #[test]
    fn test_invalid_transition_names_state_and_action() {
        let error = OrderError::InvalidTransition {
            order_id: "o-1".to_string(),
            from: OrderStatus::Cerrada,
            action: OrderAction::Approve,
        };
        assert_eq!(error.to_string(), "Cannot approve order o-1 in state Cerrada");
    }

    #[test]
    fn test_catalog_helpers() {
        let error = CatalogError::not_found("Supplier", "s-1");
        assert_eq!(error.to_string(), "Supplier not found: s-1");

        let error = CatalogError::duplicate("Supplier", "XAXX010101000");
        assert_eq!(error.to_string(), "Supplier already exists: XAXX010101000");
    }

    #[test]
    fn test_domain_errors_convert_transparently() {
        let error: InternalError = AuthorizationError::MissingPermission {
            permission: "ordenes.aprobar".to_string(),
        }
        .into();
        assert_eq!(error.to_string(), "Missing permission: ordenes.aprobar");

        let error: InternalError = AuditError::UnserializableData {
            event_type: "order_created".to_string(),
            message: "key must be a string".to_string(),
        }
        .into();
        assert_eq!(
            error.to_string(),
            "Audit data for order_created could not be serialized: key must be a string"
        );
    }
}
