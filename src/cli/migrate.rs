use crate::config::DatabaseConnections;
use crate::errors::InternalError;

/// Run pending migrations for the main and audit databases
///
/// Both migrators are idempotent, so running this against an up-to-date
/// deployment does nothing.
pub async fn run_migrations(connections: &DatabaseConnections) -> Result<(), InternalError> {
    tracing::info!("Running database migrations...");

    connections.migrate().await?;

    tracing::info!("All migrations completed successfully");
    println!("✓ Migrations applied");

    Ok(())
}
