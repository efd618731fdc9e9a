use std::collections::BTreeSet;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::UserError;
use crate::stores::unix_now;
use crate::types::db::{permission, role, role_permission, user_role};

/// Data access for roles, the permission catalog and their links
#[derive(Debug, Default)]
pub struct RoleStore;

impl RoleStore {
    pub fn new() -> Self {
        Self
    }

    /// The seeded permission catalog, sorted by clave
    pub async fn list_permissions<C: ConnectionTrait>(
        &self,
        conn: &C,
    ) -> Result<Vec<permission::Model>, InternalError> {
        permission::Entity::find()
            .order_by_asc(permission::Column::Clave)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_permissions", e))
    }

    /// Look a permission up by id or by clave
    ///
    /// # Arguments
    /// * `conn` - Connection or transaction to run on
    /// * `id_or_clave` - Either the row id or a key such as `ordenes.aprobar`
    ///
    /// # Returns
    /// * `Ok(permission::Model)` - The catalog entry
    /// * `Err(InternalError)` - `UserError::PermissionNotFound`, or a database error
    pub async fn get_permission<C: ConnectionTrait>(
        &self,
        conn: &C,
        id_or_clave: &str,
    ) -> Result<permission::Model, InternalError> {
        permission::Entity::find()
            .filter(
                permission::Column::Id
                    .eq(id_or_clave)
                    .or(permission::Column::Clave.eq(id_or_clave)),
            )
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_permission", e))?
            .ok_or_else(|| {
                UserError::PermissionNotFound {
                    permiso: id_or_clave.to_string(),
                }
                .into()
            })
    }

    /// Insert a role with no grants
    ///
    /// # Arguments
    /// * `conn` - Connection or transaction to run on
    /// * `nombre` - Unique role name
    /// * `descripcion` - Optional free text
    ///
    /// # Returns
    /// * `Ok(role::Model)` - The stored role
    /// * `Err(InternalError)` - `UserError::DuplicateRoleName`, or a database error
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        nombre: String,
        descripcion: Option<String>,
    ) -> Result<role::Model, InternalError> {
        if self.find_by_name(conn, &nombre).await?.is_some() {
            return Err(UserError::DuplicateRoleName { nombre }.into());
        }

        role::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            nombre: Set(nombre),
            descripcion: Set(descripcion),
            created_at: Set(unix_now()),
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("create_role", e))
    }

    pub async fn find_by_name<C: ConnectionTrait>(
        &self,
        conn: &C,
        nombre: &str,
    ) -> Result<Option<role::Model>, InternalError> {
        role::Entity::find()
            .filter(role::Column::Nombre.eq(nombre))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_role_by_name", e))
    }

    pub async fn list<C: ConnectionTrait>(&self, conn: &C) -> Result<Vec<role::Model>, InternalError> {
        role::Entity::find()
            .order_by_asc(role::Column::Nombre)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_roles", e))
    }

    pub async fn get<C: ConnectionTrait>(
        &self,
        conn: &C,
        role_id: &str,
    ) -> Result<role::Model, InternalError> {
        role::Entity::find_by_id(role_id.to_string())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_role", e))?
            .ok_or_else(|| {
                UserError::RoleNotFound {
                    role_id: role_id.to_string(),
                }
                .into()
            })
    }

    /// Check every id names a role
    ///
    /// # Errors
    /// `UserError::RoleNotFound` naming the first id that does not exist
    pub async fn ensure_exist<C: ConnectionTrait>(
        &self,
        conn: &C,
        role_ids: &[String],
    ) -> Result<(), InternalError> {
        for role_id in role_ids {
            self.get(conn, role_id).await?;
        }
        Ok(())
    }

    /// Number of users holding the role
    pub async fn count_holders<C: ConnectionTrait>(
        &self,
        conn: &C,
        role_id: &str,
    ) -> Result<u64, InternalError> {
        user_role::Entity::find()
            .filter(user_role::Column::RolId.eq(role_id))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_role_holders", e))
    }

    /// Delete a role nobody holds, together with its permission links
    ///
    /// # Arguments
    /// * `conn` - Connection or transaction to run on
    /// * `role_id` - The role to remove
    ///
    /// # Returns
    /// * `Ok(())` - Role and its grants removed
    /// * `Err(InternalError)` - `RoleNotFound`, `RoleInUse` with the holder count, or a database error
    pub async fn delete<C: ConnectionTrait>(&self, conn: &C, role_id: &str) -> Result<(), InternalError> {
        self.get(conn, role_id).await?;

        let users = self.count_holders(conn, role_id).await?;
        if users > 0 {
            return Err(UserError::RoleInUse {
                role_id: role_id.to_string(),
                users,
            }
            .into());
        }

        role_permission::Entity::delete_many()
            .filter(role_permission::Column::RolId.eq(role_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_role_permissions", e))?;

        role::Entity::delete_by_id(role_id.to_string())
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_role", e))?;

        Ok(())
    }

    /// Insert or update the grant of `permiso_id` to `role_id`
    ///
    /// Revoking keeps the row with `asignado = false` so the history of what a
    /// role could once do stays visible.
    ///
    /// # Arguments
    /// * `conn` - Connection or transaction to run on
    /// * `role_id` - Role being changed
    /// * `permiso_id` - Catalog row id (not the clave)
    /// * `asignado` - Grant (`true`) or soft revoke (`false`)
    ///
    /// # Returns
    /// * `Ok(role_permission::Model)` - The link as stored
    /// * `Err(InternalError)` - Database error
    pub async fn set_permission<C: ConnectionTrait>(
        &self,
        conn: &C,
        role_id: &str,
        permiso_id: &str,
        asignado: bool,
    ) -> Result<role_permission::Model, InternalError> {
        let existing = role_permission::Entity::find_by_id((role_id.to_string(), permiso_id.to_string()))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_role_permission", e))?;

        match existing {
            Some(link) => {
                let mut active = link.into_active_model();
                active.asignado = Set(asignado);
                active
                    .update(conn)
                    .await
                    .map_err(|e| InternalError::database("update_role_permission", e))
            }
            None => role_permission::ActiveModel {
                rol_id: Set(role_id.to_string()),
                permiso_id: Set(permiso_id.to_string()),
                asignado: Set(asignado),
            }
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_role_permission", e)),
        }
    }

    /// Permission keys granted (`asignado = true`) to any of `role_ids`, sorted
    pub async fn granted_keys<C: ConnectionTrait>(
        &self,
        conn: &C,
        role_ids: Vec<String>,
    ) -> Result<Vec<String>, InternalError> {
        if role_ids.is_empty() {
            return Ok(vec![]);
        }

        let grants = role_permission::Entity::find()
            .filter(role_permission::Column::RolId.is_in(role_ids))
            .filter(role_permission::Column::Asignado.eq(true))
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_role_grants", e))?;

        let permiso_ids: BTreeSet<String> = grants.into_iter().map(|g| g.permiso_id).collect();
        if permiso_ids.is_empty() {
            return Ok(vec![]);
        }

        let permisos = permission::Entity::find()
            .filter(permission::Column::Id.is_in(permiso_ids))
            .all(conn)
            .await
            .map_err(|e| InternalError::database("resolve_permission_keys", e))?;

        let keys: BTreeSet<String> = permisos.into_iter().map(|p| p.clave).collect();
        Ok(keys.into_iter().collect())
    }

    /// Union of the keys granted by every role the user holds
    pub async fn effective_permissions<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
    ) -> Result<Vec<String>, InternalError> {
        let role_ids = user_role::Entity::find()
            .filter(user_role::Column::UsuarioId.eq(user_id))
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_user_roles", e))?
            .into_iter()
            .map(|l| l.rol_id)
            .collect();

        self.granted_keys(conn, role_ids).await
    }

    /// Users holding a role that currently grants `clave`
    pub async fn holders_of_permission<C: ConnectionTrait>(
        &self,
        conn: &C,
        clave: &str,
    ) -> Result<Vec<String>, InternalError> {
        let permiso = match permission::Entity::find()
            .filter(permission::Column::Clave.eq(clave))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_permission", e))?
        {
            Some(p) => p,
            None => return Ok(vec![]),
        };

        let role_ids: Vec<String> = role_permission::Entity::find()
            .filter(role_permission::Column::PermisoId.eq(permiso.id))
            .filter(role_permission::Column::Asignado.eq(true))
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_permission_grants", e))?
            .into_iter()
            .map(|g| g.rol_id)
            .collect();
        if role_ids.is_empty() {
            return Ok(vec![]);
        }

        let user_ids: BTreeSet<String> = user_role::Entity::find()
            .filter(user_role::Column::RolId.is_in(role_ids))
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_role_holders", e))?
            .into_iter()
            .map(|l| l.usuario_id)
            .collect();

        Ok(user_ids.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::UserStore;
    use crate::test::utils::{insert_user, setup_test_databases};

    #[tokio::test]
    async fn test_effective_permissions_union_ignores_disabled_grants() {
        let (db, _audit_db) = setup_test_databases().await;
        let roles = RoleStore::new();

        let requester = roles.create(&db, "Solicitante".to_string(), None).await.unwrap();
        let reviewer = roles.create(&db, "Revisor".to_string(), None).await.unwrap();
        roles.set_permission(&db, &requester.id, "ordenes.crear", true).await.unwrap();
        roles.set_permission(&db, &reviewer.id, "ordenes.aprobar", true).await.unwrap();
        roles.set_permission(&db, &reviewer.id, "ordenes.cerrar", true).await.unwrap();
        roles.set_permission(&db, &reviewer.id, "ordenes.cerrar", false).await.unwrap();

        let user = insert_user(&db, "ana@example.mx").await;
        UserStore::new()
            .set_roles(&db, &user.id, &[requester.id.clone(), reviewer.id.clone()])
            .await
            .unwrap();

        let keys = roles.effective_permissions(&db, &user.id).await.unwrap();
        assert_eq!(keys, vec!["ordenes.aprobar".to_string(), "ordenes.crear".to_string()]);

        let holders = roles.holders_of_permission(&db, "ordenes.cerrar").await.unwrap();
        assert!(holders.is_empty());
    }

    #[tokio::test]
    async fn test_role_in_use_cannot_be_deleted() {
        let (db, _audit_db) = setup_test_databases().await;
        let roles = RoleStore::new();
        let role = roles.create(&db, "Aprobador".to_string(), None).await.unwrap();
        let user = insert_user(&db, "luis@example.mx").await;
        UserStore::new().set_roles(&db, &user.id, &[role.id.clone()]).await.unwrap();

        assert!(matches!(
            roles.delete(&db, &role.id).await,
            Err(InternalError::User(UserError::RoleInUse { users: 1, .. }))
        ));

        UserStore::new().set_roles(&db, &user.id, &[]).await.unwrap();
        roles.delete(&db, &role.id).await.unwrap();
        assert!(roles.get(&db, &role.id).await.is_err());
    }

    #[tokio::test]
    async fn test_duplicate_role_name_is_rejected() {
        let (db, _audit_db) = setup_test_databases().await;
        let roles = RoleStore::new();
        roles.create(&db, "Compras".to_string(), None).await.unwrap();

        assert!(matches!(
            roles.create(&db, "Compras".to_string(), None).await,
            Err(InternalError::User(UserError::DuplicateRoleName { .. }))
        ));
    }
}
