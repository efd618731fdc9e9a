use super::AuditLogger;
use crate::types::internal::audit::EventType;
use crate::types::internal::context::RequestContext;

impl AuditLogger {
    /// Successful login of `target_user_id`
    pub async fn log_login_success(&self, ctx: &RequestContext, target_user_id: &str, jwt_id: &str) {
        self.builder(EventType::LoginSuccess)
            .with_context(ctx)
            .user_id(target_user_id)
            .entity("usuario", target_user_id)
            .add_field("issued_jwt_id", jwt_id)
            .emit()
            .await;
    }

    /// Failed login; `reason` never includes the submitted password
    pub async fn log_login_failure(&self, ctx: &RequestContext, email: &str, reason: &str) {
        self.builder(EventType::LoginFailure)
            .with_context(ctx)
            .add_field("email", email)
            .add_field("reason", reason)
            .emit()
            .await;
    }
}
