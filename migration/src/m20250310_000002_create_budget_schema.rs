use sea_orm_migration::prelude::*;

use crate::m20250310_000001_create_org_schema::{Areas, Usuarios};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Amounts are integer centavos
        manager
            .create_table(
                Table::create()
                    .table(CodigosPresupuestales::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CodigosPresupuestales::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(CodigosPresupuestales::Codigo).string().not_null().unique_key())
                    .col(ColumnDef::new(CodigosPresupuestales::Nombre).string().not_null())
                    .col(ColumnDef::new(CodigosPresupuestales::AreaId).string().null())
                    .col(ColumnDef::new(CodigosPresupuestales::MontoPresupuesto).big_integer().not_null())
                    .col(ColumnDef::new(CodigosPresupuestales::MontoDisponible).big_integer().not_null())
                    .col(ColumnDef::new(CodigosPresupuestales::VigenciaInicio).big_integer().not_null())
                    .col(ColumnDef::new(CodigosPresupuestales::VigenciaFin).big_integer().not_null())
                    .col(ColumnDef::new(CodigosPresupuestales::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(CodigosPresupuestales::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_codigos_presupuestales_area_id")
                            .from(CodigosPresupuestales::Table, CodigosPresupuestales::AreaId)
                            .to(Areas::Table, Areas::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UsuarioCodigosPresupuestales::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UsuarioCodigosPresupuestales::UsuarioId).string().not_null())
                    .col(ColumnDef::new(UsuarioCodigosPresupuestales::CpId).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(UsuarioCodigosPresupuestales::UsuarioId)
                            .col(UsuarioCodigosPresupuestales::CpId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_usuario_cp_usuario_id")
                            .from(UsuarioCodigosPresupuestales::Table, UsuarioCodigosPresupuestales::UsuarioId)
                            .to(Usuarios::Table, Usuarios::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_usuario_cp_cp_id")
                            .from(UsuarioCodigosPresupuestales::Table, UsuarioCodigosPresupuestales::CpId)
                            .to(CodigosPresupuestales::Table, CodigosPresupuestales::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_usuario_cp_cp_id")
                    .table(UsuarioCodigosPresupuestales::Table)
                    .col(UsuarioCodigosPresupuestales::CpId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UsuarioCodigosPresupuestales::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CodigosPresupuestales::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum CodigosPresupuestales {
    Table,
    Id,
    Codigo,
    Nombre,
    AreaId,
    MontoPresupuesto,
    MontoDisponible,
    VigenciaInicio,
    VigenciaFin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UsuarioCodigosPresupuestales {
    Table,
    UsuarioId,
    CpId,
}
