#[cfg(test)]
mod tests {
    use crate::errors::internal::{
        AuthorizationError, BudgetError, CatalogError, CredentialError, InternalError, OrderError,
    };
    use crate::errors::{ApiError, AuthError};
    use crate::types::internal::{OrderAction, OrderStatus};
    use sea_orm::DbErr;

    #[test]
    fn test_invalid_credentials_maps_to_401() {
        let err = AuthError::from_internal_error(CredentialError::InvalidCredentials.into());
        assert!(matches!(err, AuthError::InvalidCredentials(_)));
    }

    #[test]
    fn test_inactive_user_maps_to_403() {
        let err = AuthError::from_internal_error(
            CredentialError::UserInactive {
                user_id: "u-1".to_string(),
            }
            .into(),
        );
        assert!(matches!(err, AuthError::UserInactive(_)));
    }

    #[test]
    fn test_expired_token_keeps_its_own_code() {
        let err = AuthError::from_internal_error(CredentialError::ExpiredToken("jwt".to_string()).into());
        assert!(matches!(err, AuthError::InvalidToken(_)));
        assert_eq!(err.code(), "expired_token");
    }

    #[test]
    fn test_blank_login_field_is_bad_request() {
        let err = AuthError::from_internal_error(InternalError::validation("email", "required"));
        assert!(matches!(err, AuthError::BadRequest(_)));
    }

    #[test]
    fn test_auth_database_error_is_generic() {
        let err = AuthError::from_internal_error(InternalError::database(
            "find_user",
            DbErr::Custom("connection reset".to_string()),
        ));
        assert!(matches!(err, AuthError::InternalError(_)));
        assert!(!err.message().contains("connection reset"));
    }

    #[test]
    fn test_missing_permission_maps_to_forbidden() {
        let err = ApiError::from_internal_error(
            AuthorizationError::MissingPermission {
                permission: "ordenes.cerrar".to_string(),
            }
            .into(),
        );
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.code(), "missing_permission");
    }

    #[test]
    fn test_self_review_maps_to_forbidden() {
        let err = ApiError::from_internal_error(
            AuthorizationError::SelfReview {
                user_id: "u-1".to_string(),
                order_id: "o-1".to_string(),
            }
            .into(),
        );
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn test_invalid_transition_maps_to_conflict() {
        let err = ApiError::from_internal_error(
            OrderError::InvalidTransition {
                order_id: "o-1".to_string(),
                from: OrderStatus::Nueva,
                action: OrderAction::Close,
            }
            .into(),
        );
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.code(), "invalid_transition");
    }

    #[test]
    fn test_folio_taken_maps_to_conflict() {
        let err = ApiError::from_internal_error(
            OrderError::FolioTaken {
                folio: "OC-000007".to_string(),
            }
            .into(),
        );
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.code(), "folio_taken");
    }

    #[test]
    fn test_insufficient_budget_maps_to_422() {
        let err = ApiError::from_internal_error(
            BudgetError::InsufficientFunds {
                cp_id: "cp-1".to_string(),
                requested: 10,
                available: 5,
            }
            .into(),
        );
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.code(), "insufficient_budget");
    }

    #[test]
    fn test_not_found_and_in_use() {
        let err = ApiError::from_internal_error(CatalogError::not_found("Area", "a-1").into());
        assert_eq!(err.status_code(), 404);

        let err = ApiError::from_internal_error(
            BudgetError::InUse {
                cp_id: "cp-1".to_string(),
                orders: 2,
            }
            .into(),
        );
        assert_eq!(err.status_code(), 409);
    }

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = ApiError::from_internal_error(InternalError::validation("motivo", "required"));
        assert_eq!(err.status_code(), 400);
        assert!(err.message().contains("motivo"));
    }

    #[test]
    fn test_database_error_details_not_exposed() {
        let err = ApiError::from_internal_error(InternalError::database(
            "debit_budget",
            DbErr::Custom("secret detail".to_string()),
        ));
        assert_eq!(err.status_code(), 500);
        assert!(!err.to_string().contains("secret detail"));
    }
}
