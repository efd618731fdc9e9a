use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Proveedores::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Proveedores::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Proveedores::Nombre).string().not_null())
                    .col(ColumnDef::new(Proveedores::Rfc).string().not_null().unique_key())
                    .col(ColumnDef::new(Proveedores::Email).string().null())
                    .col(ColumnDef::new(Proveedores::Telefono).string().null())
                    .col(ColumnDef::new(Proveedores::Activo).boolean().not_null().default(true))
                    .col(ColumnDef::new(Proveedores::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Proveedores::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Productos::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Productos::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Productos::Nombre).string().not_null())
                    .col(ColumnDef::new(Productos::Descripcion).string().null())
                    .col(ColumnDef::new(Productos::Unidad).string().not_null())
                    .col(ColumnDef::new(Productos::PrecioUnitario).big_integer().not_null())
                    .col(ColumnDef::new(Productos::ProveedorId).string().null())
                    .col(ColumnDef::new(Productos::Activo).boolean().not_null().default(true))
                    .col(ColumnDef::new(Productos::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Productos::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_productos_proveedor_id")
                            .from(Productos::Table, Productos::ProveedorId)
                            .to(Proveedores::Table, Proveedores::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_productos_proveedor_id")
                    .table(Productos::Table)
                    .col(Productos::ProveedorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Productos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Proveedores::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Proveedores {
    Table,
    Id,
    Nombre,
    Rfc,
    Email,
    Telefono,
    Activo,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Productos {
    Table,
    Id,
    Nombre,
    Descripcion,
    Unidad,
    PrecioUnitario,
    ProveedorId,
    Activo,
    CreatedAt,
    UpdatedAt,
}
