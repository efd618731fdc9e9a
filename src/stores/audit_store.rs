use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::errors::InternalError;
use crate::errors::internal::AuditError;
use crate::types::db::audit_event;
use crate::types::internal::audit::AuditEvent;

/// Repository for audit event storage operations
///
/// Writes go straight to the audit database, outside any business transaction.
pub struct AuditStore {
    db: DatabaseConnection,
}

impl AuditStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Serialize the event data to JSON and insert it into `audit_events`
    pub async fn write_event(&self, event: AuditEvent) -> Result<(), InternalError> {
        let data_json = serde_json::to_string(&event.data)
            .map_err(|e| AuditError::UnserializableData {
                event_type: event.event_type.to_string(),
                message: e.to_string(),
            })?;

        let audit_event = audit_event::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            timestamp: Set(Utc::now().to_rfc3339()),
            event_type: Set(event.event_type.to_string()),
            user_id: Set(event.user_id.unwrap_or_else(|| "unknown".to_string())),
            ip_address: Set(event.ip_address),
            jwt_id: Set(event.jwt_id),
            entity_type: Set(event.entity_type),
            entity_id: Set(event.entity_id),
            data: Set(data_json),
        };

        audit_event
            .insert(&self.db)
            .await
            .map_err(|e| InternalError::database("write_audit_event", e))?;

        Ok(())
    }

    /// Events recorded for one entity, oldest first
    pub async fn find_by_entity(
        &self,
        entity_type: &str,
        entity_id: &str,
    ) -> Result<Vec<audit_event::Model>, InternalError> {
        audit_event::Entity::find()
            .filter(audit_event::Column::EntityType.eq(entity_type))
            .filter(audit_event::Column::EntityId.eq(entity_id))
            .order_by_asc(audit_event::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("find_audit_events_by_entity", e))
    }

    pub async fn find_by_event_type(
        &self,
        event_type: &str,
    ) -> Result<Vec<audit_event::Model>, InternalError> {
        audit_event::Entity::find()
            .filter(audit_event::Column::EventType.eq(event_type))
            .order_by_asc(audit_event::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("find_audit_events_by_type", e))
    }
}
