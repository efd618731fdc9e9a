pub use sea_orm_migration::prelude::*;

mod m20250310_000001_create_org_schema;
mod m20250310_000002_create_budget_schema;
mod m20250310_000003_create_catalog_schema;
mod m20250310_000004_create_orders_schema;
mod m20250310_000005_create_notifications;
mod m20250310_000006_seed_permissions;
mod m20250310_000101_create_audit_events;

pub mod permissions;

/// Migrator for the procurement database
pub struct MainMigrator;

#[async_trait::async_trait]
impl MigratorTrait for MainMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250310_000001_create_org_schema::Migration),
            Box::new(m20250310_000002_create_budget_schema::Migration),
            Box::new(m20250310_000003_create_catalog_schema::Migration),
            Box::new(m20250310_000004_create_orders_schema::Migration),
            Box::new(m20250310_000005_create_notifications::Migration),
            Box::new(m20250310_000006_seed_permissions::Migration),
        ]
    }
}

/// Migrator for the audit database
pub struct AuditMigrator;

#[async_trait::async_trait]
impl MigratorTrait for AuditMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250310_000101_create_audit_events::Migration),
        ]
    }
}
