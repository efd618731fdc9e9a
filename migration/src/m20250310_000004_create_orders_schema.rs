use sea_orm_migration::prelude::*;

use crate::m20250310_000001_create_org_schema::Usuarios;
use crate::m20250310_000002_create_budget_schema::CodigosPresupuestales;
use crate::m20250310_000003_create_catalog_schema::{Productos, Proveedores};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrdenesCompra::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(OrdenesCompra::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(OrdenesCompra::Numero).big_integer().not_null().unique_key())
                    .col(ColumnDef::new(OrdenesCompra::Folio).string().not_null().unique_key())
                    .col(ColumnDef::new(OrdenesCompra::UsuarioId).string().not_null())
                    .col(ColumnDef::new(OrdenesCompra::CpId).string().not_null())
                    .col(ColumnDef::new(OrdenesCompra::ProveedorId).string().null())
                    .col(ColumnDef::new(OrdenesCompra::Descripcion).string().not_null())
                    .col(ColumnDef::new(OrdenesCompra::Monto).big_integer().not_null())
                    .col(ColumnDef::new(OrdenesCompra::Estado).string_len(32).not_null())
                    .col(ColumnDef::new(OrdenesCompra::MotivoRechazo).string().null())
                    .col(ColumnDef::new(OrdenesCompra::UsuarioActualizacionId).string().not_null())
                    .col(ColumnDef::new(OrdenesCompra::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(OrdenesCompra::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ordenes_compra_usuario_id")
                            .from(OrdenesCompra::Table, OrdenesCompra::UsuarioId)
                            .to(Usuarios::Table, Usuarios::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ordenes_compra_cp_id")
                            .from(OrdenesCompra::Table, OrdenesCompra::CpId)
                            .to(CodigosPresupuestales::Table, CodigosPresupuestales::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ordenes_compra_proveedor_id")
                            .from(OrdenesCompra::Table, OrdenesCompra::ProveedorId)
                            .to(Proveedores::Table, Proveedores::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_ordenes_compra_usuario_id")
                    .table(OrdenesCompra::Table)
                    .col(OrdenesCompra::UsuarioId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_ordenes_compra_cp_id")
                    .table(OrdenesCompra::Table)
                    .col(OrdenesCompra::CpId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_ordenes_compra_estado")
                    .table(OrdenesCompra::Table)
                    .col(OrdenesCompra::Estado)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrdenCompraItems::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(OrdenCompraItems::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(OrdenCompraItems::OrdenId).string().not_null())
                    .col(ColumnDef::new(OrdenCompraItems::ProductoId).string().null())
                    .col(ColumnDef::new(OrdenCompraItems::Descripcion).string().not_null())
                    .col(ColumnDef::new(OrdenCompraItems::Cantidad).big_integer().not_null())
                    .col(ColumnDef::new(OrdenCompraItems::PrecioUnitario).big_integer().not_null())
                    .col(ColumnDef::new(OrdenCompraItems::Importe).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orden_compra_items_orden_id")
                            .from(OrdenCompraItems::Table, OrdenCompraItems::OrdenId)
                            .to(OrdenesCompra::Table, OrdenesCompra::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orden_compra_items_producto_id")
                            .from(OrdenCompraItems::Table, OrdenCompraItems::ProductoId)
                            .to(Productos::Table, Productos::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_orden_compra_items_orden_id")
                    .table(OrdenCompraItems::Table)
                    .col(OrdenCompraItems::OrdenId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrdenCompraItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OrdenesCompra::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum OrdenesCompra {
    Table,
    Id,
    Numero,
    Folio,
    UsuarioId,
    CpId,
    ProveedorId,
    Descripcion,
    Monto,
    Estado,
    MotivoRechazo,
    UsuarioActualizacionId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum OrdenCompraItems {
    Table,
    Id,
    OrdenId,
    ProductoId,
    Descripcion,
    Cantidad,
    PrecioUnitario,
    Importe,
}
