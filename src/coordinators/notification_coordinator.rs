use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::providers::AuthorizationProvider;
use crate::stores::NotificationStore;
use crate::types::db::notification;
use crate::types::internal::context::RequestContext;

/// Notification coordinator: the caller's own inbox
///
/// Notifications are written by the order workflow; this only reads and
/// acknowledges them. Every operation is scoped to the authenticated user.
pub struct NotificationCoordinator {
    db: DatabaseConnection,
    notification_store: Arc<NotificationStore>,
    authorization_provider: AuthorizationProvider,
}

impl NotificationCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.connections.main.clone(),
            notification_store: app_data.notification_store.clone(),
            authorization_provider: AuthorizationProvider::new(),
        }
    }

    /// Newest first
    pub async fn list_notifications(
        &self,
        ctx: &RequestContext,
        only_unread: bool,
    ) -> Result<Vec<notification::Model>, InternalError> {
        let user_id = self.authorization_provider.authenticated_user(ctx)?;

        self.notification_store
            .list(&self.db, user_id, only_unread)
            .await
    }

    /// Mark one of the caller's notifications read
    ///
    /// # Returns
    /// * `Ok(())` - Marked (or already read)
    /// * `Err(InternalError)` - Not found; another user's notification also counts as not found
    pub async fn mark_read(
        &self,
        ctx: &RequestContext,
        notification_id: &str,
    ) -> Result<(), InternalError> {
        let user_id = self.authorization_provider.authenticated_user(ctx)?;

        self.notification_store
            .mark_read(&self.db, user_id, notification_id)
            .await
    }

    /// Returns how many notifications changed
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> Result<u64, InternalError> {
        let user_id = self.authorization_provider.authenticated_user(ctx)?;

        let updated = self.notification_store.mark_all_read(&self.db, user_id).await?;
        tracing::debug!("Marked {} notification(s) read for {}", updated, user_id);

        Ok(updated)
    }

    pub async fn unread_count(&self, ctx: &RequestContext) -> Result<u64, InternalError> {
        let user_id = self.authorization_provider.authenticated_user(ctx)?;

        self.notification_store.unread_count(&self.db, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::internal::{AuthorizationError, CatalogError};
    use crate::providers::NotificationDraft;
    use crate::test::utils::{ctx_with_permissions, insert_user, setup_test_app_data};
    use crate::types::internal::context::RequestContext;

    fn draft(mensaje: &str) -> NotificationDraft {
        NotificationDraft {
            tipo_evento: "orden_enviada".to_string(),
            mensaje: mensaje.to_string(),
            url_relacionada: "/ordenes/o-1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_inbox_is_scoped_to_caller() {
        let app_data = setup_test_app_data().await;
        let db = &app_data.connections.main;
        let ana = insert_user(db, "ana@example.mx").await;
        let luis = insert_user(db, "luis@example.mx").await;
        app_data
            .notification_store
            .create_for(db, &[ana.id.clone()], &draft("OC-000001 enviada"))
            .await
            .unwrap();
        let coordinator = NotificationCoordinator::new(app_data.clone());

        let ana_ctx = ctx_with_permissions(&ana.id, &[]);
        let luis_ctx = ctx_with_permissions(&luis.id, &[]);

        let inbox = coordinator.list_notifications(&ana_ctx, false).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert!(coordinator.list_notifications(&luis_ctx, false).await.unwrap().is_empty());

        let stolen = coordinator.mark_read(&luis_ctx, &inbox[0].id).await;
        assert!(matches!(
            stolen,
            Err(InternalError::Catalog(CatalogError::NotFound { .. }))
        ));
        assert_eq!(coordinator.unread_count(&ana_ctx).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_mark_read_and_mark_all_read() {
        let app_data = setup_test_app_data().await;
        let db = &app_data.connections.main;
        let ana = insert_user(db, "ana@example.mx").await;
        for mensaje in ["OC-000001 enviada", "OC-000002 enviada", "OC-000003 enviada"] {
            app_data
                .notification_store
                .create_for(db, &[ana.id.clone()], &draft(mensaje))
                .await
                .unwrap();
        }
        let coordinator = NotificationCoordinator::new(app_data.clone());
        let ctx = ctx_with_permissions(&ana.id, &[]);

        let inbox = coordinator.list_notifications(&ctx, true).await.unwrap();
        coordinator.mark_read(&ctx, &inbox[0].id).await.unwrap();
        assert_eq!(coordinator.unread_count(&ctx).await.unwrap(), 2);
        assert_eq!(coordinator.list_notifications(&ctx, true).await.unwrap().len(), 2);

        assert_eq!(coordinator.mark_all_read(&ctx).await.unwrap(), 2);
        assert_eq!(coordinator.unread_count(&ctx).await.unwrap(), 0);
        assert_eq!(coordinator.list_notifications(&ctx, false).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_requires_authentication() {
        let app_data = setup_test_app_data().await;
        let coordinator = NotificationCoordinator::new(app_data);

        let result = coordinator.unread_count(&RequestContext::new()).await;

        assert!(matches!(
            result,
            Err(InternalError::Authorization(AuthorizationError::Unauthenticated))
        ));
    }
}
