use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::CatalogError;
use crate::stores::unix_now;
use crate::types::db::area;

const ENTITY: &str = "Area";

#[derive(Debug, Clone, Default)]
pub struct AreaChanges {
    pub nombre: Option<String>,
    pub descripcion: Option<Option<String>>,
    pub activa: Option<bool>,
}

/// Data access for `areas`
#[derive(Debug, Default)]
pub struct AreaStore;

impl AreaStore {
    pub fn new() -> Self {
        Self
    }

    async fn ensure_name_free<C: ConnectionTrait>(
        &self,
        conn: &C,
        nombre: &str,
    ) -> Result<(), InternalError> {
        let existing = area::Entity::find()
            .filter(area::Column::Nombre.eq(nombre))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_area_by_name", e))?;

        match existing {
            Some(_) => Err(CatalogError::duplicate(ENTITY, nombre).into()),
            None => Ok(()),
        }
    }

    /// Insert an active area
    ///
    /// # Arguments
    /// * `conn` - Connection or transaction to run on
    /// * `nombre` - Trimmed, non-blank name; must be unique
    /// * `descripcion` - Optional free text
    ///
    /// # Returns
    /// * `Ok(area::Model)` - The stored area
    /// * `Err(InternalError)` - `CatalogError::Duplicate` on a taken name, or a database error
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        nombre: String,
        descripcion: Option<String>,
    ) -> Result<area::Model, InternalError> {
        self.ensure_name_free(conn, &nombre).await?;

        let now = unix_now();
        area::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            nombre: Set(nombre),
            descripcion: Set(descripcion),
            activa: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("create_area", e))
    }

    /// Areas sorted by name, optionally only active ones
    pub async fn list<C: ConnectionTrait>(
        &self,
        conn: &C,
        only_active: bool,
    ) -> Result<Vec<area::Model>, InternalError> {
        let mut query = area::Entity::find().order_by_asc(area::Column::Nombre);
        if only_active {
            query = query.filter(area::Column::Activa.eq(true));
        }

        query
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_areas", e))
    }

    pub async fn get<C: ConnectionTrait>(
        &self,
        conn: &C,
        area_id: &str,
    ) -> Result<area::Model, InternalError> {
        area::Entity::find_by_id(area_id.to_string())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_area", e))?
            .ok_or_else(|| CatalogError::not_found(ENTITY, area_id).into())
    }

    /// Partial update; renaming re-checks name uniqueness
    pub async fn update<C: ConnectionTrait>(
        &self,
        conn: &C,
        current: area::Model,
        changes: AreaChanges,
    ) -> Result<area::Model, InternalError> {
        if let Some(nombre) = &changes.nombre {
            if nombre != &current.nombre {
                self.ensure_name_free(conn, nombre).await?;
            }
        }

        let mut active = current.into_active_model();
        if let Some(nombre) = changes.nombre {
            active.nombre = Set(nombre);
        }
        if let Some(descripcion) = changes.descripcion {
            active.descripcion = Set(descripcion);
        }
        if let Some(activa) = changes.activa {
            active.activa = Set(activa);
        }
        active.updated_at = Set(unix_now());

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_area", e))
    }

    /// Hard delete; callers check references first
    pub async fn delete<C: ConnectionTrait>(&self, conn: &C, area_id: &str) -> Result<(), InternalError> {
        area::Entity::delete_by_id(area_id.to_string())
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_area", e))?;
        Ok(())
    }
}
