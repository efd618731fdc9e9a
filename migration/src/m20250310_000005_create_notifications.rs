use sea_orm_migration::prelude::*;

use crate::m20250310_000001_create_org_schema::Usuarios;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Notificaciones::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Notificaciones::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Notificaciones::UsuarioId).string().not_null())
                    .col(ColumnDef::new(Notificaciones::TipoEvento).string().not_null())
                    .col(ColumnDef::new(Notificaciones::Mensaje).string().not_null())
                    .col(ColumnDef::new(Notificaciones::Leida).boolean().not_null().default(false))
                    .col(ColumnDef::new(Notificaciones::UrlRelacionada).string().null())
                    .col(ColumnDef::new(Notificaciones::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notificaciones_usuario_id")
                            .from(Notificaciones::Table, Notificaciones::UsuarioId)
                            .to(Usuarios::Table, Usuarios::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unread lookups per user
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_notificaciones_usuario_leida")
                    .table(Notificaciones::Table)
                    .col(Notificaciones::UsuarioId)
                    .col(Notificaciones::Leida)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notificaciones::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Notificaciones {
    Table,
    Id,
    UsuarioId,
    TipoEvento,
    Mensaje,
    Leida,
    UrlRelacionada,
    CreatedAt,
}
