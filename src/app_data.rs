use std::sync::Arc;

use crate::audit::AuditLogger;
use crate::config::{DatabaseConnections, SecretManager};
use crate::errors::InternalError;
use crate::providers::{CryptoProvider, TokenProvider};
use crate::stores::{
    AreaStore, AuditStore, BudgetCodeStore, NotificationStore, ProductStore, PurchaseOrderStore,
    RoleStore, SupplierStore, UserStore,
};

/// Centralized application data following the main-owned stores pattern
///
/// All dependencies are created once at startup and shared across coordinators.
///
/// ```text
/// main.rs
///   ↓
/// AppData::init()
///   ↓ creates once
///   ├─ connections (main + audit)
///   ├─ secret_manager
///   ├─ audit_store → audit_logger
///   ├─ token_provider, crypto_provider
///   └─ one store per table group
///   ↓ wrapped in Arc<AppData>
///   ↓ passed to coordinators
///   └─ XCoordinator::new(app_data) → extracts what it needs
/// ```
pub struct AppData {
    pub connections: DatabaseConnections,
    pub secret_manager: Arc<SecretManager>,
    pub audit_store: Arc<AuditStore>,
    pub audit_logger: Arc<AuditLogger>,
    pub token_provider: Arc<TokenProvider>,
    pub crypto_provider: Arc<CryptoProvider>,
    pub user_store: Arc<UserStore>,
    pub role_store: Arc<RoleStore>,
    pub area_store: Arc<AreaStore>,
    pub supplier_store: Arc<SupplierStore>,
    pub product_store: Arc<ProductStore>,
    pub budget_code_store: Arc<BudgetCodeStore>,
    pub purchase_order_store: Arc<PurchaseOrderStore>,
    pub notification_store: Arc<NotificationStore>,
}

impl AppData {
    /// Initialize all application data from the process environment
    ///
    /// Database connections should be connected and migrated before calling this.
    ///
    /// # Errors
    ///
    /// Returns `InternalError` when secret manager initialization fails
    pub async fn init(connections: DatabaseConnections) -> Result<Self, InternalError> {
        tracing::info!("Initializing AppData...");

        tracing::debug!("Initializing secret manager...");
        let secret_manager = Arc::new(SecretManager::init().map_err(|e| {
            InternalError::parse("secret_manager", format!("Secret manager init failed: {}", e))
        })?);
        tracing::debug!("Secret manager initialized");

        let app_data = Self::with_secrets(connections, secret_manager);

        tracing::info!("AppData initialization complete");

        Ok(app_data)
    }

    /// Build application data around already-loaded secrets
    pub fn with_secrets(connections: DatabaseConnections, secret_manager: Arc<SecretManager>) -> Self {
        let audit_store = Arc::new(AuditStore::new(connections.audit.clone()));
        let audit_logger = Arc::new(AuditLogger::new(audit_store.clone()));

        let token_provider = Arc::new(TokenProvider::new(secret_manager.clone()));
        let crypto_provider = Arc::new(CryptoProvider::new(secret_manager.pepper()));

        Self {
            connections,
            secret_manager,
            audit_store,
            audit_logger,
            token_provider,
            crypto_provider,
            user_store: Arc::new(UserStore::new()),
            role_store: Arc::new(RoleStore::new()),
            area_store: Arc::new(AreaStore::new()),
            supplier_store: Arc::new(SupplierStore::new()),
            product_store: Arc::new(ProductStore::new()),
            budget_code_store: Arc::new(BudgetCodeStore::new()),
            purchase_order_store: Arc::new(PurchaseOrderStore::new()),
            notification_store: Arc::new(NotificationStore::new()),
        }
    }
}
