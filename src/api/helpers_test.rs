#[cfg(test)]
mod tests {
    use std::net::IpAddr;

    use poem::Request;
    use poem_openapi::auth::Bearer;

    use crate::api::BearerAuth;
    use crate::api::helpers::{anonymous_context, authenticated_context};
    use crate::providers::TokenProvider;
    use crate::test::utils::test_secret_manager;
    use crate::types::internal::Permission;

    fn token_provider() -> TokenProvider {
        TokenProvider::new(test_secret_manager())
    }

    #[test]
    fn test_anonymous_context_takes_forwarded_ip() {
        let req = Request::builder()
            .header("X-Forwarded-For", "192.168.1.1, 10.0.0.1")
            .finish();

        let ctx = anonymous_context(&req);

        assert!(!ctx.authenticated);
        assert_eq!(ctx.ip_address, Some("192.168.1.1".parse::<IpAddr>().unwrap()));
        assert_eq!(ctx.actor_id, "unknown");
    }

    #[test]
    fn test_anonymous_context_falls_back_to_real_ip() {
        let req = Request::builder().header("X-Real-IP", "192.168.1.2").finish();

        let ctx = anonymous_context(&req);

        assert_eq!(ctx.ip_address, Some("192.168.1.2".parse::<IpAddr>().unwrap()));
    }

    #[test]
    fn test_authenticated_context_with_valid_jwt() {
        let provider = token_provider();
        let issued = provider
            .generate_jwt(
                "user-1",
                "ana@example.mx",
                vec![Permission::OrdersCreate.key().to_string()],
            )
            .unwrap();
        let req = Request::builder().finish();
        let auth = BearerAuth(Bearer { token: issued.token });

        let ctx = authenticated_context(&req, &auth, &provider).unwrap();

        assert!(ctx.authenticated);
        assert_eq!(ctx.actor_id, "user-1");
        assert_eq!(ctx.user_id(), Some("user-1"));
        assert_eq!(ctx.jwt_id(), Some(issued.jti.as_str()));
        assert!(ctx.has_permission(Permission::OrdersCreate));
        assert!(!ctx.has_permission(Permission::OrdersApprove));
    }

    #[test]
    fn test_authenticated_context_rejects_invalid_jwt() {
        let req = Request::builder().finish();
        let auth = BearerAuth(Bearer {
            token: "invalid-jwt-token".to_string(),
        });

        let err = authenticated_context(&req, &auth, &token_provider()).unwrap_err();

        assert_eq!(err.status_code(), 401);
        assert_eq!(err.code(), "invalid_token");
    }
}
