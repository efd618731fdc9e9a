use migration::{AuditMigrator, MainMigrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::config::BootstrapSettings;
use crate::errors::InternalError;
use crate::errors::internal::DatabaseError;

/// Main and audit database connections
///
/// Audit events live in their own database so that a rolled back business
/// transaction never takes its audit trail with it.
#[derive(Clone)]
pub struct DatabaseConnections {
    pub main: DatabaseConnection,
    pub audit: DatabaseConnection,
}

impl DatabaseConnections {
    /// Connect both databases. Does NOT run migrations - call `migrate()` separately.
    pub async fn connect(bootstrap_settings: &BootstrapSettings) -> Result<Self, InternalError> {
        let main = Self::connect_url(bootstrap_settings.database_url(), "connect_database").await?;
        let audit = Self::connect_url(
            bootstrap_settings.audit_database_url(),
            "connect_audit_database",
        )
        .await?;

        Ok(Self { main, audit })
    }

    async fn connect_url(url: &str, operation: &str) -> Result<DatabaseConnection, InternalError> {
        let db = Database::connect(url)
            .await
            .map_err(|e| InternalError::database(operation, e))?;

        tracing::debug!("Connected to database: {}", url);

        Ok(db)
    }

    pub async fn migrate(&self) -> Result<(), InternalError> {
        migrate_main_database(&self.main).await?;
        migrate_audit_database(&self.audit).await?;

        Ok(())
    }

    pub async fn begin_main_transaction(&self) -> Result<DatabaseTransaction, InternalError> {
        begin_transaction(&self.main).await
    }
}

pub async fn begin_transaction(
    db: &DatabaseConnection,
) -> Result<DatabaseTransaction, InternalError> {
    db.begin()
        .await
        .map_err(|source| DatabaseError::TransactionBegin { source }.into())
}

pub async fn commit_transaction(txn: DatabaseTransaction) -> Result<(), InternalError> {
    txn.commit()
        .await
        .map_err(|source| DatabaseError::TransactionCommit { source }.into())
}

/// Run all pending migrations on the main database
pub async fn migrate_main_database(db: &DatabaseConnection) -> Result<(), InternalError> {
    MainMigrator::up(db, None)
        .await
        .map_err(|e| InternalError::database("run_migrations", e))?;

    tracing::debug!("Main database migrations completed");

    Ok(())
}

/// Run all pending migrations on the audit database
pub async fn migrate_audit_database(audit_db: &DatabaseConnection) -> Result<(), InternalError> {
    AuditMigrator::up(audit_db, None)
        .await
        .map_err(|e| InternalError::database("run_audit_migrations", e))?;

    tracing::debug!("Audit database migrations completed");

    Ok(())
}
