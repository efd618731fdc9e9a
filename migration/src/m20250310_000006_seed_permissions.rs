use sea_orm_migration::prelude::*;

use crate::m20250310_000001_create_org_schema::Permisos;
use crate::permissions::PERMISSION_CATALOG;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Permission ids are the keys themselves so they stay stable across databases
        let mut insert = Query::insert()
            .into_table(Permisos::Table)
            .columns([Permisos::Id, Permisos::Clave, Permisos::Descripcion])
            .to_owned();

        for (clave, descripcion) in PERMISSION_CATALOG {
            insert.values_panic([(*clave).into(), (*clave).into(), (*descripcion).into()]);
        }

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let claves: Vec<&str> = PERMISSION_CATALOG.iter().map(|(clave, _)| *clave).collect();

        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Permisos::Table)
                    .and_where(Expr::col(Permisos::Clave).is_in(claves))
                    .to_owned(),
            )
            .await
    }
}
