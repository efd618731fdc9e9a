use std::sync::Arc;

use crate::audit::AuditBuilder;
use crate::stores::AuditStore;
use crate::types::internal::audit::EventType;
use crate::types::internal::context::RequestContext;

/// Entry point for writing audit events
///
/// Event-specific helpers live next to the domain they describe
/// (`login.rs`, `orders.rs`); everything else goes through `builder()`.
pub struct AuditLogger {
    pub audit_store: Arc<AuditStore>,
}

impl AuditLogger {
    pub fn new(audit_store: Arc<AuditStore>) -> Self {
        Self { audit_store }
    }

    /// Create an AuditBuilder for any event type
    pub fn builder(&self, event_type: impl Into<EventType>) -> AuditBuilder {
        AuditBuilder::new(self.audit_store.clone(), event_type)
    }

    /// Builder pre-filled with the request context and the affected row
    pub fn entity_event(
        &self,
        ctx: &RequestContext,
        event_type: EventType,
        entity_type: &str,
        entity_id: &str,
    ) -> AuditBuilder {
        self.builder(event_type)
            .with_context(ctx)
            .entity(entity_type, entity_id)
    }

    pub async fn log_cli_session_start(&self, ctx: &RequestContext, command_name: &str) {
        self.builder(EventType::CliSessionStart)
            .with_context(ctx)
            .add_field("command_name", command_name)
            .emit()
            .await;
    }

    pub async fn log_cli_session_end(
        &self,
        ctx: &RequestContext,
        command_name: &str,
        success: bool,
        error_message: Option<String>,
    ) {
        self.builder(EventType::CliSessionEnd)
            .with_context(ctx)
            .add_field("command_name", command_name)
            .add_field("success", success)
            .add_field("error_message", error_message)
            .emit()
            .await;
    }
}
