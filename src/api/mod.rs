// API layer - HTTP endpoints
pub mod auth;
pub mod budget;
pub mod catalog;
pub mod dashboard;
pub mod health;
pub mod helpers;
pub mod notifications;
pub mod orders;
pub mod roles;
pub mod users;

#[cfg(test)]
mod helpers_test;

use std::sync::Arc;

use poem::Route;
use poem_openapi::OpenApiService;

use crate::app_data::AppData;

pub use auth::{AuthApi, BearerAuth};
pub use budget::BudgetApi;
pub use catalog::CatalogApi;
pub use dashboard::DashboardApi;
pub use health::HealthApi;
pub use notifications::NotificationsApi;
pub use orders::OrdersApi;
pub use roles::RolesApi;
pub use users::UsersApi;

/// Compose routes: API services under /api and Swagger UI under /swagger
pub fn routes(app_data: Arc<AppData>, public_url: &str) -> Route {
    let apis = (
        HealthApi::new(app_data.clone()),
        AuthApi::new(app_data.clone()),
        UsersApi::new(app_data.clone()),
        RolesApi::new(app_data.clone()),
        CatalogApi::new(app_data.clone()),
        BudgetApi::new(app_data.clone()),
        OrdersApi::new(app_data.clone()),
        NotificationsApi::new(app_data.clone()),
        DashboardApi::new(app_data),
    );

    let api_service = OpenApiService::new(apis, "Procurement API", env!("CARGO_PKG_VERSION"))
        .server(format!("{}/api", public_url.trim_end_matches('/')));
    let ui = api_service.swagger_ui();

    Route::new().nest("/api", api_service).nest("/swagger", ui)
}
