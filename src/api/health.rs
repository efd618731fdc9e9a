use std::sync::Arc;

use chrono::Utc;
use poem_openapi::{OpenApi, Tags, payload::Json};
use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::types::dto::common::HealthResponse;

/// Liveness plus a main database ping
pub struct HealthApi {
    db: DatabaseConnection,
}

impl HealthApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.connections.main.clone(),
        }
    }
}

#[derive(Tags)]
enum ApiTags {
    /// Service status
    Health,
}

#[OpenApi]
impl HealthApi {
    /// Unauthenticated; reports `degraded` when the database does not answer
    #[oai(path = "/health", method = "get", tag = "ApiTags::Health")]
    async fn health(&self) -> Json<HealthResponse> {
        let database = match self.db.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Health check database ping failed: {}", e);
                false
            }
        };

        Json(HealthResponse {
            status: if database { "healthy" } else { "degraded" }.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database,
            timestamp: Utc::now().to_rfc3339(),
        })
    }
}
