use std::sync::Arc;

use poem::Request;
use poem_openapi::param::{Path, Query};
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::api::auth::BearerAuth;
use crate::api::helpers;
use crate::app_data::AppData;
use crate::coordinators::NotificationCoordinator;
use crate::errors::ApiError;
use crate::providers::TokenProvider;
use crate::types::dto::common::{CountResponse, MessageResponse};
use crate::types::dto::notification::NotificationResponse;

/// The caller's notification inbox
pub struct NotificationsApi {
    notification_coordinator: NotificationCoordinator,
    token_provider: Arc<TokenProvider>,
}

impl NotificationsApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            token_provider: app_data.token_provider.clone(),
            notification_coordinator: NotificationCoordinator::new(app_data),
        }
    }
}

#[derive(Tags)]
enum NotificationTags {
    /// Workflow notifications
    Notifications,
}

#[OpenApi(tag = "NotificationTags::Notifications")]
impl NotificationsApi {
    /// The caller's notifications, newest first
    #[oai(path = "/notifications", method = "get")]
    async fn list_notifications(
        &self,
        req: &Request,
        auth: BearerAuth,
        #[oai(default)] only_unread: Query<bool>,
    ) -> Result<Json<Vec<NotificationResponse>>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let notifications = self
            .notification_coordinator
            .list_notifications(&ctx, only_unread.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(notifications.into_iter().map(Into::into).collect()))
    }

    /// Number of unread notifications for the caller
    #[oai(path = "/notifications/unread-count", method = "get")]
    async fn unread_count(&self, req: &Request, auth: BearerAuth) -> Result<Json<CountResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let count = self
            .notification_coordinator
            .unread_count(&ctx)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(CountResponse { count }))
    }

    /// Returns how many notifications were marked
    #[oai(path = "/notifications/read-all", method = "post")]
    async fn mark_all_read(&self, req: &Request, auth: BearerAuth) -> Result<Json<CountResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let count = self
            .notification_coordinator
            .mark_all_read(&ctx)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(CountResponse { count }))
    }

    /// Mark one of the caller's notifications read
    #[oai(path = "/notifications/:id/read", method = "post")]
    async fn mark_read(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<MessageResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        self.notification_coordinator
            .mark_read(&ctx, &id.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(MessageResponse::new("Notification marked as read")))
    }
}
