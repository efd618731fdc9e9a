use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Areas::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Areas::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Areas::Nombre).string().not_null().unique_key())
                    .col(ColumnDef::new(Areas::Descripcion).string().null())
                    .col(ColumnDef::new(Areas::Activa).boolean().not_null().default(true))
                    .col(ColumnDef::new(Areas::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Areas::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Usuarios::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Usuarios::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Usuarios::Nombre).string().not_null())
                    .col(ColumnDef::new(Usuarios::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Usuarios::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Usuarios::Estado).string_len(16).not_null().default("activo"))
                    .col(ColumnDef::new(Usuarios::AreaId).string().null())
                    .col(ColumnDef::new(Usuarios::Preferences).text().not_null().default("{}"))
                    .col(ColumnDef::new(Usuarios::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Usuarios::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_usuarios_area_id")
                            .from(Usuarios::Table, Usuarios::AreaId)
                            .to(Areas::Table, Areas::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_usuarios_area_id")
                    .table(Usuarios::Table)
                    .col(Usuarios::AreaId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Roles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Roles::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Roles::Nombre).string().not_null().unique_key())
                    .col(ColumnDef::new(Roles::Descripcion).string().null())
                    .col(ColumnDef::new(Roles::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Permisos::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Permisos::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Permisos::Clave).string().not_null().unique_key())
                    .col(ColumnDef::new(Permisos::Descripcion).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RolPermisos::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RolPermisos::RolId).string().not_null())
                    .col(ColumnDef::new(RolPermisos::PermisoId).string().not_null())
                    .col(ColumnDef::new(RolPermisos::Asignado).boolean().not_null().default(true))
                    .primary_key(
                        Index::create()
                            .col(RolPermisos::RolId)
                            .col(RolPermisos::PermisoId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rol_permisos_rol_id")
                            .from(RolPermisos::Table, RolPermisos::RolId)
                            .to(Roles::Table, Roles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rol_permisos_permiso_id")
                            .from(RolPermisos::Table, RolPermisos::PermisoId)
                            .to(Permisos::Table, Permisos::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UsuarioRoles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UsuarioRoles::UsuarioId).string().not_null())
                    .col(ColumnDef::new(UsuarioRoles::RolId).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(UsuarioRoles::UsuarioId)
                            .col(UsuarioRoles::RolId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_usuario_roles_usuario_id")
                            .from(UsuarioRoles::Table, UsuarioRoles::UsuarioId)
                            .to(Usuarios::Table, Usuarios::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_usuario_roles_rol_id")
                            .from(UsuarioRoles::Table, UsuarioRoles::RolId)
                            .to(Roles::Table, Roles::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UsuarioRoles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RolPermisos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Permisos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Roles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Usuarios::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Areas::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Areas {
    Table,
    Id,
    Nombre,
    Descripcion,
    Activa,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Usuarios {
    Table,
    Id,
    Nombre,
    Email,
    PasswordHash,
    Estado,
    AreaId,
    Preferences,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Roles {
    Table,
    Id,
    Nombre,
    Descripcion,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Permisos {
    Table,
    Id,
    Clave,
    Descripcion,
}

#[derive(DeriveIden)]
enum RolPermisos {
    Table,
    RolId,
    PermisoId,
    Asignado,
}

#[derive(DeriveIden)]
enum UsuarioRoles {
    Table,
    UsuarioId,
    RolId,
}
