use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::InternalError;
use crate::stores::AuditStore;
use crate::types::internal::audit::{AuditEvent, EventType};
use crate::types::internal::context::RequestContext;

/// Fluent builder for audit events
///
/// ```ignore
/// audit_logger
///     .builder(EventType::BudgetCodeUpdated)
///     .with_context(ctx)
///     .entity("codigo_presupuestal", &cp.id)
///     .add_field("monto_presupuesto", cp.monto_presupuesto)
///     .emit()
///     .await;
/// ```
pub struct AuditBuilder {
    event_type: EventType,
    user_id: Option<String>,
    ip_address: Option<String>,
    jwt_id: Option<String>,
    entity_type: Option<String>,
    entity_id: Option<String>,
    data: HashMap<String, serde_json::Value>,
    store: Arc<AuditStore>,
}

impl AuditBuilder {
    pub fn new(store: Arc<AuditStore>, event_type: impl Into<EventType>) -> Self {
        Self {
            event_type: event_type.into(),
            user_id: None,
            ip_address: None,
            jwt_id: None,
            entity_type: None,
            entity_id: None,
            data: HashMap::new(),
            store,
        }
    }

    /// Populate builder fields from RequestContext
    ///
    /// - `actor_id` -> `user_id` (actor who performed the action)
    /// - `ip_address` -> `ip_address`
    /// - `jti` from claims -> `jwt_id`
    /// - request_id, source and authenticated -> `data`
    pub fn with_context(mut self, ctx: &RequestContext) -> Self {
        self.user_id = Some(ctx.actor_id.clone());
        self.ip_address = ctx.ip_address.map(|ip| ip.to_string());
        self.jwt_id = ctx.jwt_id().map(str::to_string);

        self.data.insert("request_id".to_string(), json!(ctx.request_id.to_string()));
        self.data.insert("source".to_string(), json!(ctx.source.to_string()));
        self.data.insert("authenticated".to_string(), json!(ctx.authenticated));

        self
    }

    pub fn user_id(mut self, id: impl Into<String>) -> Self {
        self.user_id = Some(id.into());
        self
    }

    /// Record which row the event is about
    pub fn entity(mut self, entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Add an arbitrary JSON-serializable field
    pub fn add_field(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.data.insert(key.into(), json_value);
        }
        self
    }

    pub fn build(self) -> AuditEvent {
        AuditEvent {
            event_type: self.event_type,
            user_id: self.user_id,
            ip_address: self.ip_address,
            jwt_id: self.jwt_id,
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            data: self.data,
        }
    }

    /// Write the event to the audit database
    pub async fn write(self) -> Result<(), InternalError> {
        let store = self.store.clone();
        store.write_event(self.build()).await
    }

    /// Write the event, logging instead of returning a failure
    ///
    /// Used after a business transaction has committed; a broken audit sink
    /// must not turn a completed operation into an error response.
    pub async fn emit(self) {
        let event_type = self.event_type.to_string();
        if let Err(audit_err) = self.write().await {
            tracing::error!("Failed to write audit event {}: {:?}", event_type, audit_err);
        }
    }
}
