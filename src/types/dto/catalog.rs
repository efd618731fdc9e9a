use poem_openapi::Object;
use poem_openapi::types::MaybeUndefined;

use crate::stores::{AreaChanges, NewProduct, NewSupplier, ProductChanges, SupplierChanges};
use crate::types::db::{area, product, supplier};
use crate::types::dto::common::clearable;

#[derive(Object, Debug)]
pub struct AreaResponse {
    pub id: String,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub activa: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<area::Model> for AreaResponse {
    fn from(a: area::Model) -> Self {
        Self {
            id: a.id,
            nombre: a.nombre,
            descripcion: a.descripcion,
            activa: a.activa,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

#[derive(Object, Debug)]
pub struct CreateAreaRequest {
    #[oai(validator(min_length = 1, max_length = 200))]
    pub nombre: String,
    pub descripcion: Option<String>,
}

/// Partial update of an area
#[derive(Object, Debug)]
pub struct UpdateAreaRequest {
    pub nombre: Option<String>,
    /// Omit to keep, `null` to clear
    pub descripcion: MaybeUndefined<String>,
    /// Inactive areas stay referenced by existing users and codes
    pub activa: Option<bool>,
}

impl From<UpdateAreaRequest> for AreaChanges {
    fn from(req: UpdateAreaRequest) -> Self {
        Self {
            nombre: req.nombre,
            descripcion: clearable(req.descripcion),
            activa: req.activa,
        }
    }
}

/// Supplier; never deleted, only deactivated
#[derive(Object, Debug)]
pub struct SupplierResponse {
    pub id: String,
    pub nombre: String,
    /// Mexican tax id, 12 or 13 characters, uppercase
    pub rfc: String,
    pub email: Option<String>,
    pub telefono: Option<String>,
    pub activo: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<supplier::Model> for SupplierResponse {
    fn from(s: supplier::Model) -> Self {
        Self {
            id: s.id,
            nombre: s.nombre,
            rfc: s.rfc,
            email: s.email,
            telefono: s.telefono,
            activo: s.activo,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

#[derive(Object, Debug)]
pub struct CreateSupplierRequest {
    #[oai(validator(min_length = 1, max_length = 200))]
    pub nombre: String,
    /// Mexican tax id, 12 or 13 characters
    pub rfc: String,
    pub email: Option<String>,
    pub telefono: Option<String>,
}

impl From<CreateSupplierRequest> for NewSupplier {
    fn from(req: CreateSupplierRequest) -> Self {
        Self {
            nombre: req.nombre,
            rfc: req.rfc,
            email: req.email,
            telefono: req.telefono,
        }
    }
}

/// Partial update of a supplier; omitted fields are kept
#[derive(Object, Debug)]
pub struct UpdateSupplierRequest {
    pub nombre: Option<String>,
    pub rfc: Option<String>,
    /// Omit to keep, `null` to clear
    pub email: MaybeUndefined<String>,
    pub telefono: MaybeUndefined<String>,
    /// `false` deactivates the supplier
    pub activo: Option<bool>,
}

impl From<UpdateSupplierRequest> for SupplierChanges {
    fn from(req: UpdateSupplierRequest) -> Self {
        Self {
            nombre: req.nombre,
            rfc: req.rfc,
            email: clearable(req.email),
            telefono: clearable(req.telefono),
            activo: req.activo,
        }
    }
}

/// Catalog product
#[derive(Object, Debug)]
pub struct ProductResponse {
    pub id: String,
    pub nombre: String,
    pub descripcion: Option<String>,
    /// Unit of measure, such as `pieza` or `caja`
    pub unidad: String,
    /// Centavos
    pub precio_unitario: i64,
    pub proveedor_id: Option<String>,
    /// Inactive products cannot be put on new orders
    pub activo: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<product::Model> for ProductResponse {
    fn from(p: product::Model) -> Self {
        Self {
            id: p.id,
            nombre: p.nombre,
            descripcion: p.descripcion,
            unidad: p.unidad,
            precio_unitario: p.precio_unitario,
            proveedor_id: p.proveedor_id,
            activo: p.activo,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Body of product creation
#[derive(Object, Debug)]
pub struct CreateProductRequest {
    #[oai(validator(min_length = 1, max_length = 200))]
    pub nombre: String,
    pub descripcion: Option<String>,
    pub unidad: String,
    /// Centavos, at most 100000000000000
    pub precio_unitario: i64,
    /// Must name an existing supplier
    pub proveedor_id: Option<String>,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(req: CreateProductRequest) -> Self {
        Self {
            nombre: req.nombre,
            descripcion: req.descripcion,
            unidad: req.unidad,
            precio_unitario: req.precio_unitario,
            proveedor_id: req.proveedor_id,
        }
    }
}

/// Partial update of a product; omitted fields are kept
#[derive(Object, Debug)]
pub struct UpdateProductRequest {
    pub nombre: Option<String>,
    pub descripcion: MaybeUndefined<String>,
    pub unidad: Option<String>,
    pub precio_unitario: Option<i64>,
    /// Omit to keep, `null` to clear
    pub proveedor_id: MaybeUndefined<String>,
    pub activo: Option<bool>,
}

impl From<UpdateProductRequest> for ProductChanges {
    fn from(req: UpdateProductRequest) -> Self {
        Self {
            nombre: req.nombre,
            descripcion: clearable(req.descripcion),
            unidad: req.unidad,
            precio_unitario: req.precio_unitario,
            proveedor_id: clearable(req.proveedor_id),
            activo: req.activo,
        }
    }
}
