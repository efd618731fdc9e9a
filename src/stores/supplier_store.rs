use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::CatalogError;
use crate::stores::unix_now;
use crate::types::db::supplier;

const ENTITY: &str = "Supplier";

/// Fields needed to register a supplier
#[derive(Debug, Clone)]
pub struct NewSupplier {
    pub nombre: String,
    pub rfc: String,
    pub email: Option<String>,
    pub telefono: Option<String>,
}

/// Partial update of a supplier
///
/// The doubly optional contact fields distinguish "keep" (`None`) from
/// "clear" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct SupplierChanges {
    pub nombre: Option<String>,
    pub rfc: Option<String>,
    pub email: Option<Option<String>>,
    pub telefono: Option<Option<String>>,
    pub activo: Option<bool>,
}

/// Catalog list filter shared by suppliers and products
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    pub activo: Option<bool>,
    /// Free text matched against nombre
    pub q: Option<String>,
}

impl CatalogFilter {
    pub(crate) fn query_text(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

/// Data access for `proveedores`
#[derive(Debug, Default)]
pub struct SupplierStore;

impl SupplierStore {
    pub fn new() -> Self {
        Self
    }

    async fn ensure_rfc_free<C: ConnectionTrait>(&self, conn: &C, rfc: &str) -> Result<(), InternalError> {
        let existing = supplier::Entity::find()
            .filter(supplier::Column::Rfc.eq(rfc))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_supplier_by_rfc", e))?;

        match existing {
            Some(_) => Err(CatalogError::duplicate(ENTITY, rfc).into()),
            None => Ok(()),
        }
    }

    /// Insert an active supplier
    ///
    /// # Arguments
    /// * `conn` - Connection or transaction to run on
    /// * `new_supplier` - Validated fields; `rfc` is expected uppercased
    ///
    /// # Returns
    /// * `Ok(supplier::Model)` - The stored supplier
    /// * `Err(InternalError)` - `CatalogError::Duplicate` when the RFC is registered, or a database error
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        new_supplier: NewSupplier,
    ) -> Result<supplier::Model, InternalError> {
        self.ensure_rfc_free(conn, &new_supplier.rfc).await?;

        let now = unix_now();
        supplier::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            nombre: Set(new_supplier.nombre),
            rfc: Set(new_supplier.rfc),
            email: Set(new_supplier.email),
            telefono: Set(new_supplier.telefono),
            activo: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("create_supplier", e))
    }

    /// Suppliers sorted by name, narrowed by `filter`
    pub async fn list<C: ConnectionTrait>(
        &self,
        conn: &C,
        filter: &CatalogFilter,
    ) -> Result<Vec<supplier::Model>, InternalError> {
        let mut query = supplier::Entity::find().order_by_asc(supplier::Column::Nombre);
        if let Some(activo) = filter.activo {
            query = query.filter(supplier::Column::Activo.eq(activo));
        }
        if let Some(q) = filter.query_text() {
            query = query.filter(supplier::Column::Nombre.contains(q));
        }

        query
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_suppliers", e))
    }

    pub async fn get<C: ConnectionTrait>(
        &self,
        conn: &C,
        supplier_id: &str,
    ) -> Result<supplier::Model, InternalError> {
        supplier::Entity::find_by_id(supplier_id.to_string())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_supplier", e))?
            .ok_or_else(|| CatalogError::not_found(ENTITY, supplier_id).into())
    }

    /// Apply `changes` to `current`
    ///
    /// # Arguments
    /// * `conn` - Connection or transaction to run on
    /// * `current` - The stored row
    /// * `changes` - Fields to overwrite
    ///
    /// # Returns
    /// * `Ok(supplier::Model)` - The updated row
    /// * `Err(InternalError)` - `CatalogError::Duplicate` when a changed RFC is taken, or a database error
    pub async fn update<C: ConnectionTrait>(
        &self,
        conn: &C,
        current: supplier::Model,
        changes: SupplierChanges,
    ) -> Result<supplier::Model, InternalError> {
        if let Some(rfc) = &changes.rfc {
            if rfc != &current.rfc {
                self.ensure_rfc_free(conn, rfc).await?;
            }
        }

        let mut active = current.into_active_model();
        if let Some(nombre) = changes.nombre {
            active.nombre = Set(nombre);
        }
        if let Some(rfc) = changes.rfc {
            active.rfc = Set(rfc);
        }
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(telefono) = changes.telefono {
            active.telefono = Set(telefono);
        }
        if let Some(activo) = changes.activo {
            active.activo = Set(activo);
        }
        active.updated_at = Set(unix_now());

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_supplier", e))
    }
}
