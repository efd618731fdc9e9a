use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::api::auth::BearerAuth;
use crate::api::helpers;
use crate::app_data::AppData;
use crate::coordinators::DashboardCoordinator;
use crate::errors::ApiError;
use crate::providers::TokenProvider;
use crate::types::dto::dashboard::DashboardResponse;

pub struct DashboardApi {
    dashboard_coordinator: DashboardCoordinator,
    token_provider: Arc<TokenProvider>,
}

impl DashboardApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            token_provider: app_data.token_provider.clone(),
            dashboard_coordinator: DashboardCoordinator::new(app_data),
        }
    }
}

#[derive(Tags)]
enum DashboardTags {
    /// Landing page figures
    Dashboard,
}

#[OpenApi]
impl DashboardApi {
    /// Order totals by estado, budget totals and unread notifications for the caller
    #[oai(path = "/dashboard", method = "get", tag = "DashboardTags::Dashboard")]
    async fn summary(&self, req: &Request, auth: BearerAuth) -> Result<Json<DashboardResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let summary = self
            .dashboard_coordinator
            .summary(&ctx)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(summary.into()))
    }
}
