use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::CatalogError;
use crate::stores::supplier_store::CatalogFilter;
use crate::stores::unix_now;
use crate::types::db::product;

const ENTITY: &str = "Product";

/// Fields needed to add a catalog product; `precio_unitario` in centavos
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub nombre: String,
    pub descripcion: Option<String>,
    pub unidad: String,
    pub precio_unitario: i64,
    pub proveedor_id: Option<String>,
}

/// Partial update of a product; `Some(None)` clears an optional field
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub nombre: Option<String>,
    pub descripcion: Option<Option<String>>,
    pub unidad: Option<String>,
    pub precio_unitario: Option<i64>,
    pub proveedor_id: Option<Option<String>>,
    pub activo: Option<bool>,
}

/// Data access for `productos`
#[derive(Debug, Default)]
pub struct ProductStore;

impl ProductStore {
    pub fn new() -> Self {
        Self
    }

    /// Insert an active product
    ///
    /// # Arguments
    /// * `conn` - Connection or transaction to run on
    /// * `new_product` - Validated fields; the supplier, if any, is assumed to exist
    ///
    /// # Returns
    /// * `Ok(product::Model)` - The stored product
    /// * `Err(InternalError)` - Database error
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        new_product: NewProduct,
    ) -> Result<product::Model, InternalError> {
        let now = unix_now();
        product::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            nombre: Set(new_product.nombre),
            descripcion: Set(new_product.descripcion),
            unidad: Set(new_product.unidad),
            precio_unitario: Set(new_product.precio_unitario),
            proveedor_id: Set(new_product.proveedor_id),
            activo: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("create_product", e))
    }

    /// Products sorted by name
    ///
    /// # Arguments
    /// * `conn` - Connection or transaction to run on
    /// * `filter` - Active flag and free-text name match
    /// * `proveedor_id` - When given, only that supplier's products
    ///
    /// # Returns
    /// * `Ok(Vec<product::Model>)` - Matching products, possibly empty
    /// * `Err(InternalError)` - Database error
    pub async fn list<C: ConnectionTrait>(
        &self,
        conn: &C,
        filter: &CatalogFilter,
        proveedor_id: Option<&str>,
    ) -> Result<Vec<product::Model>, InternalError> {
        let mut query = product::Entity::find().order_by_asc(product::Column::Nombre);
        if let Some(activo) = filter.activo {
            query = query.filter(product::Column::Activo.eq(activo));
        }
        if let Some(q) = filter.query_text() {
            query = query.filter(product::Column::Nombre.contains(q));
        }
        if let Some(proveedor_id) = proveedor_id {
            query = query.filter(product::Column::ProveedorId.eq(proveedor_id));
        }

        query
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_products", e))
    }

    pub async fn get<C: ConnectionTrait>(
        &self,
        conn: &C,
        product_id: &str,
    ) -> Result<product::Model, InternalError> {
        product::Entity::find_by_id(product_id.to_string())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_product", e))?
            .ok_or_else(|| CatalogError::not_found(ENTITY, product_id).into())
    }

    /// Products among `ids` keyed by id; unknown ids are simply absent
    pub async fn find_many<C: ConnectionTrait>(
        &self,
        conn: &C,
        ids: Vec<String>,
    ) -> Result<HashMap<String, product::Model>, InternalError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let products = product::Entity::find()
            .filter(product::Column::Id.is_in(ids))
            .all(conn)
            .await
            .map_err(|e| InternalError::database("find_products", e))?;

        Ok(products.into_iter().map(|p| (p.id.clone(), p)).collect())
    }

    pub async fn update<C: ConnectionTrait>(
        &self,
        conn: &C,
        current: product::Model,
        changes: ProductChanges,
    ) -> Result<product::Model, InternalError> {
        let mut active = current.into_active_model();
        if let Some(nombre) = changes.nombre {
            active.nombre = Set(nombre);
        }
        if let Some(descripcion) = changes.descripcion {
            active.descripcion = Set(descripcion);
        }
        if let Some(unidad) = changes.unidad {
            active.unidad = Set(unidad);
        }
        if let Some(precio_unitario) = changes.precio_unitario {
            active.precio_unitario = Set(precio_unitario);
        }
        if let Some(proveedor_id) = changes.proveedor_id {
            active.proveedor_id = Set(proveedor_id);
        }
        if let Some(activo) = changes.activo {
            active.activo = Set(activo);
        }
        active.updated_at = Set(unix_now());

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_product", e))
    }
}
