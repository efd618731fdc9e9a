use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::CatalogError;
use crate::providers::NotificationDraft;
use crate::stores::unix_now;
use crate::types::db::notification;

/// Data access for `notificaciones`
#[derive(Debug, Default)]
pub struct NotificationStore;

impl NotificationStore {
    pub fn new() -> Self {
        Self
    }

    /// One unread notification per recipient
    ///
    /// # Arguments
    /// * `conn` - The transaction that made the change being announced
    /// * `recipients` - User ids; an empty slice inserts nothing
    /// * `draft` - Event type, message and link shared by every row
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of rows inserted
    /// * `Err(InternalError)` - Database error
    pub async fn create_for<C: ConnectionTrait>(
        &self,
        conn: &C,
        recipients: &[String],
        draft: &NotificationDraft,
    ) -> Result<u64, InternalError> {
        if recipients.is_empty() {
            return Ok(0);
        }

        let now = unix_now();
        let rows = recipients.iter().map(|usuario_id| notification::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            usuario_id: Set(usuario_id.clone()),
            tipo_evento: Set(draft.tipo_evento.clone()),
            mensaje: Set(draft.mensaje.clone()),
            leida: Set(false),
            url_relacionada: Set(Some(draft.url_relacionada.clone())),
            created_at: Set(now),
        });

        notification::Entity::insert_many(rows)
            .exec_without_returning(conn)
            .await
            .map_err(|e| InternalError::database("create_notifications", e))
    }

    /// Newest first
    pub async fn list<C: ConnectionTrait>(
        &self,
        conn: &C,
        usuario_id: &str,
        only_unread: bool,
    ) -> Result<Vec<notification::Model>, InternalError> {
        let mut query = notification::Entity::find()
            .filter(notification::Column::UsuarioId.eq(usuario_id))
            .order_by_desc(notification::Column::CreatedAt);
        if only_unread {
            query = query.filter(notification::Column::Leida.eq(false));
        }

        query
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_notifications", e))
    }

    /// Mark one of the user's notifications read; other users' rows count as missing
    pub async fn mark_read<C: ConnectionTrait>(
        &self,
        conn: &C,
        usuario_id: &str,
        notification_id: &str,
    ) -> Result<(), InternalError> {
        let result = notification::Entity::update_many()
            .col_expr(notification::Column::Leida, Expr::value(true))
            .filter(notification::Column::Id.eq(notification_id))
            .filter(notification::Column::UsuarioId.eq(usuario_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("mark_notification_read", e))?;

        if result.rows_affected == 0 {
            return Err(CatalogError::not_found("Notification", notification_id).into());
        }
        Ok(())
    }

    /// Mark every unread notification of the user read
    ///
    /// # Returns
    /// * `Ok(u64)` - How many were unread before the call
    pub async fn mark_all_read<C: ConnectionTrait>(
        &self,
        conn: &C,
        usuario_id: &str,
    ) -> Result<u64, InternalError> {
        let result = notification::Entity::update_many()
            .col_expr(notification::Column::Leida, Expr::value(true))
            .filter(notification::Column::UsuarioId.eq(usuario_id))
            .filter(notification::Column::Leida.eq(false))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("mark_all_notifications_read", e))?;

        Ok(result.rows_affected)
    }

    pub async fn unread_count<C: ConnectionTrait>(
        &self,
        conn: &C,
        usuario_id: &str,
    ) -> Result<u64, InternalError> {
        notification::Entity::find()
            .filter(notification::Column::UsuarioId.eq(usuario_id))
            .filter(notification::Column::Leida.eq(false))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_unread_notifications", e))
    }
}
