use std::collections::BTreeSet;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::UserError;
use crate::stores::unix_now;
use crate::types::db::{user, user_budget_code, user_role};
use crate::types::internal::UserStatus;

/// Fields needed to create a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub nombre: String,
    pub email: String,
    pub password_hash: String,
    pub area_id: Option<String>,
}

/// Partial update of a user; `None` leaves the field unchanged
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub nombre: Option<String>,
    pub email: Option<String>,
    /// `Some(None)` clears the area
    pub area_id: Option<Option<String>>,
    pub estado: Option<UserStatus>,
}

/// Narrowing applied by `list`; empty fields match everyone
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub estado: Option<UserStatus>,
    pub area_id: Option<String>,
    /// Matches nombre or email
    pub q: Option<String>,
}

/// Data access for `usuarios` and its link tables
#[derive(Debug, Default)]
pub struct UserStore;

impl UserStore {
    /// Create a new UserStore
    pub fn new() -> Self {
        Self
    }

    /// Insert an active user with empty preferences
    ///
    /// # Arguments
    /// * `conn` - Connection or transaction to run on
    /// * `new_user` - Normalized e-mail and an already hashed password
    ///
    /// # Returns
    /// * `Ok(user::Model)` - The stored user
    /// * `Err(InternalError)` - `UserError::DuplicateEmail` if the e-mail is taken, or a database error
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        new_user: NewUser,
    ) -> Result<user::Model, InternalError> {
        if self.find_by_email(conn, &new_user.email).await?.is_some() {
            return Err(UserError::DuplicateEmail {
                email: new_user.email,
            }
            .into());
        }

        let now = unix_now();
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            nombre: Set(new_user.nombre),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            estado: Set(UserStatus::Activo),
            area_id: Set(new_user.area_id),
            preferences: Set("{}".to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("create_user", e))
    }

    pub async fn find_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find_by_id(user_id.to_string())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_id", e))
    }

    /// Like `find_by_id`, but a missing user is `UserError::UserNotFound`
    pub async fn get<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
    ) -> Result<user::Model, InternalError> {
        self.find_by_id(conn, user_id).await?.ok_or_else(|| {
            UserError::UserNotFound {
                user_id: user_id.to_string(),
            }
            .into()
        })
    }

    /// Exact match on the stored (lowercased) e-mail
    pub async fn find_by_email<C: ConnectionTrait>(
        &self,
        conn: &C,
        email: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_email", e))
    }

    /// Users sorted by name
    ///
    /// # Arguments
    /// * `conn` - Connection or transaction to run on
    /// * `filter` - Status, area and free-text narrowing
    ///
    /// # Returns
    /// * `Ok(Vec<user::Model>)` - Matching users, possibly empty
    /// * `Err(InternalError)` - Database error
    pub async fn list<C: ConnectionTrait>(
        &self,
        conn: &C,
        filter: &UserFilter,
    ) -> Result<Vec<user::Model>, InternalError> {
        let mut query = user::Entity::find().order_by_asc(user::Column::Nombre);

        if let Some(estado) = filter.estado {
            query = query.filter(user::Column::Estado.eq(estado));
        }
        if let Some(area_id) = &filter.area_id {
            query = query.filter(user::Column::AreaId.eq(area_id.as_str()));
        }
        if let Some(q) = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            query = query.filter(
                user::Column::Nombre
                    .contains(q)
                    .or(user::Column::Email.contains(q)),
            );
        }

        query
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_users", e))
    }

    /// Apply `changes` to `current`
    ///
    /// # Arguments
    /// * `conn` - Connection or transaction to run on
    /// * `current` - The stored row
    /// * `changes` - Fields to overwrite; a changed e-mail is re-checked for uniqueness
    ///
    /// # Returns
    /// * `Ok(user::Model)` - The updated row
    /// * `Err(InternalError)` - `UserError::DuplicateEmail`, or a database error
    pub async fn update<C: ConnectionTrait>(
        &self,
        conn: &C,
        current: user::Model,
        changes: UserChanges,
    ) -> Result<user::Model, InternalError> {
        if let Some(email) = &changes.email {
            if email != &current.email && self.find_by_email(conn, email).await?.is_some() {
                return Err(UserError::DuplicateEmail {
                    email: email.clone(),
                }
                .into());
            }
        }

        let mut active = current.into_active_model();
        if let Some(nombre) = changes.nombre {
            active.nombre = Set(nombre);
        }
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(area_id) = changes.area_id {
            active.area_id = Set(area_id);
        }
        if let Some(estado) = changes.estado {
            active.estado = Set(estado);
        }
        active.updated_at = Set(unix_now());

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_user", e))
    }

    /// Store a new hash; the caller has already verified and hashed the password
    pub async fn set_password_hash<C: ConnectionTrait>(
        &self,
        conn: &C,
        current: user::Model,
        password_hash: String,
    ) -> Result<user::Model, InternalError> {
        let mut active = current.into_active_model();
        active.password_hash = Set(password_hash);
        active.updated_at = Set(unix_now());

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("set_password_hash", e))
    }

    pub async fn set_preferences<C: ConnectionTrait>(
        &self,
        conn: &C,
        current: user::Model,
        preferences: String,
    ) -> Result<user::Model, InternalError> {
        let mut active = current.into_active_model();
        active.preferences = Set(preferences);
        active.updated_at = Set(unix_now());

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("set_preferences", e))
    }

    /// Replace the user's roles with `role_ids`
    ///
    /// Existing links are dropped first; repeated ids are linked once.
    ///
    /// # Arguments
    /// * `conn` - Connection or transaction to run on
    /// * `user_id` - The user whose roles are replaced
    /// * `role_ids` - Roles to link, assumed to exist
    ///
    /// # Returns
    /// * `Ok(())` - Links replaced
    /// * `Err(InternalError)` - Database error
    pub async fn set_roles<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        role_ids: &[String],
    ) -> Result<(), InternalError> {
        user_role::Entity::delete_many()
            .filter(user_role::Column::UsuarioId.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("clear_user_roles", e))?;

        let role_ids: BTreeSet<&String> = role_ids.iter().collect();
        if role_ids.is_empty() {
            return Ok(());
        }

        let links = role_ids.into_iter().map(|rol_id| user_role::ActiveModel {
            usuario_id: Set(user_id.to_string()),
            rol_id: Set(rol_id.clone()),
        });
        user_role::Entity::insert_many(links)
            .exec_without_returning(conn)
            .await
            .map_err(|e| InternalError::database("insert_user_roles", e))?;

        Ok(())
    }

    /// Ids of the roles the user holds
    pub async fn role_ids<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
    ) -> Result<Vec<String>, InternalError> {
        let links = user_role::Entity::find()
            .filter(user_role::Column::UsuarioId.eq(user_id))
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_user_roles", e))?;

        Ok(links.into_iter().map(|l| l.rol_id).collect())
    }

    /// Replace the budget codes the user may charge orders to
    ///
    /// # Arguments
    /// * `conn` - Connection or transaction to run on
    /// * `user_id` - The user whose assignments are replaced
    /// * `cp_ids` - Budget codes to assign; repeated ids are assigned once
    ///
    /// # Returns
    /// * `Ok(())` - Assignments replaced
    /// * `Err(InternalError)` - Database error
    pub async fn set_budget_codes<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        cp_ids: &[String],
    ) -> Result<(), InternalError> {
        user_budget_code::Entity::delete_many()
            .filter(user_budget_code::Column::UsuarioId.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("clear_user_budget_codes", e))?;

        let cp_ids: BTreeSet<&String> = cp_ids.iter().collect();
        if cp_ids.is_empty() {
            return Ok(());
        }

        let links = cp_ids.into_iter().map(|cp_id| user_budget_code::ActiveModel {
            usuario_id: Set(user_id.to_string()),
            cp_id: Set(cp_id.clone()),
        });
        user_budget_code::Entity::insert_many(links)
            .exec_without_returning(conn)
            .await
            .map_err(|e| InternalError::database("insert_user_budget_codes", e))?;

        Ok(())
    }

    /// Ids of the budget codes assigned to the user
    pub async fn budget_code_ids<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
    ) -> Result<Vec<String>, InternalError> {
        let links = user_budget_code::Entity::find()
            .filter(user_budget_code::Column::UsuarioId.eq(user_id))
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_user_budget_codes", e))?;

        Ok(links.into_iter().map(|l| l.cp_id).collect())
    }

    /// Whether `cp_id` is among the user's assigned codes
    ///
    /// # Returns
    /// * `Ok(bool)` - `true` when the link exists
    /// * `Err(InternalError)` - Database error
    pub async fn is_assigned_to_budget_code<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        cp_id: &str,
    ) -> Result<bool, InternalError> {
        let link = user_budget_code::Entity::find_by_id((user_id.to_string(), cp_id.to_string()))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_budget_code", e))?;

        Ok(link.is_some())
    }

    pub async fn count_in_area<C: ConnectionTrait>(
        &self,
        conn: &C,
        area_id: &str,
    ) -> Result<u64, InternalError> {
        user::Entity::find()
            .filter(user::Column::AreaId.eq(area_id))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_users_in_area", e))
    }

    /// Active users among `user_ids`
    pub async fn active_ids<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_ids: Vec<String>,
    ) -> Result<Vec<String>, InternalError> {
        if user_ids.is_empty() {
            return Ok(vec![]);
        }

        let users = user::Entity::find()
            .filter(user::Column::Id.is_in(user_ids))
            .filter(user::Column::Estado.eq(UserStatus::Activo))
            .all(conn)
            .await
            .map_err(|e| InternalError::database("filter_active_users", e))?;

        Ok(users.into_iter().map(|u| u.id).collect())
    }
}
