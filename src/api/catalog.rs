use std::sync::Arc;

use poem::Request;
use poem_openapi::param::{Path, Query};
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::api::auth::BearerAuth;
use crate::api::helpers;
use crate::app_data::AppData;
use crate::coordinators::CatalogCoordinator;
use crate::errors::ApiError;
use crate::providers::TokenProvider;
use crate::stores::CatalogFilter;
use crate::types::dto::catalog::{
    AreaResponse, CreateAreaRequest, CreateProductRequest, CreateSupplierRequest,
    ProductResponse, SupplierResponse, UpdateAreaRequest, UpdateProductRequest,
    UpdateSupplierRequest,
};
use crate::types::dto::common::MessageResponse;

/// Areas, suppliers and products
///
/// Any authenticated user may read; writes need `catalogos.administrar`.
pub struct CatalogApi {
    catalog_coordinator: CatalogCoordinator,
    token_provider: Arc<TokenProvider>,
}

impl CatalogApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            token_provider: app_data.token_provider.clone(),
            catalog_coordinator: CatalogCoordinator::new(app_data),
        }
    }
}

#[derive(Tags)]
enum CatalogTags {
    /// Organizational areas
    Areas,
    /// Suppliers
    Suppliers,
    /// Products
    Products,
}

#[OpenApi]
impl CatalogApi {
    /// List areas, optionally only active ones
    #[oai(path = "/areas", method = "get", tag = "CatalogTags::Areas")]
    async fn list_areas(
        &self,
        req: &Request,
        auth: BearerAuth,
        #[oai(default)] only_active: Query<bool>,
    ) -> Result<Json<Vec<AreaResponse>>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let areas = self
            .catalog_coordinator
            .list_areas(&ctx, only_active.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(areas.into_iter().map(Into::into).collect()))
    }

    /// Create an area
    #[oai(path = "/areas", method = "post", tag = "CatalogTags::Areas")]
    async fn create_area(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CreateAreaRequest>,
    ) -> Result<Json<AreaResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;
        let body = body.0;

        let area = self
            .catalog_coordinator
            .create_area(&ctx, body.nombre, body.descripcion)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(area.into()))
    }

    /// Get an area
    #[oai(path = "/areas/:id", method = "get", tag = "CatalogTags::Areas")]
    async fn get_area(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<AreaResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let area = self
            .catalog_coordinator
            .get_area(&ctx, &id.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(area.into()))
    }

    /// Partial update of an area
    #[oai(path = "/areas/:id", method = "patch", tag = "CatalogTags::Areas")]
    async fn update_area(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
        body: Json<UpdateAreaRequest>,
    ) -> Result<Json<AreaResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let area = self
            .catalog_coordinator
            .update_area(&ctx, &id.0, body.0.into())
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(area.into()))
    }

    /// Rejected while users or budget codes reference the area
    #[oai(path = "/areas/:id", method = "delete", tag = "CatalogTags::Areas")]
    async fn delete_area(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<MessageResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        self.catalog_coordinator
            .delete_area(&ctx, &id.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(MessageResponse::new("Area deleted")))
    }

    /// List suppliers, filtered by active flag and name
    #[oai(path = "/suppliers", method = "get", tag = "CatalogTags::Suppliers")]
    async fn list_suppliers(
        &self,
        req: &Request,
        auth: BearerAuth,
        activo: Query<Option<bool>>,
        q: Query<Option<String>>,
    ) -> Result<Json<Vec<SupplierResponse>>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;
        let filter = CatalogFilter {
            activo: activo.0,
            q: q.0,
        };

        let suppliers = self
            .catalog_coordinator
            .list_suppliers(&ctx, filter)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(suppliers.into_iter().map(Into::into).collect()))
    }

    /// Register a supplier; the RFC must be unique
    #[oai(path = "/suppliers", method = "post", tag = "CatalogTags::Suppliers")]
    async fn create_supplier(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CreateSupplierRequest>,
    ) -> Result<Json<SupplierResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let supplier = self
            .catalog_coordinator
            .create_supplier(&ctx, body.0.into())
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(supplier.into()))
    }

    /// Get a supplier
    #[oai(path = "/suppliers/:id", method = "get", tag = "CatalogTags::Suppliers")]
    async fn get_supplier(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<SupplierResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let supplier = self
            .catalog_coordinator
            .get_supplier(&ctx, &id.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(supplier.into()))
    }

    /// Partial update of a supplier
    #[oai(path = "/suppliers/:id", method = "patch", tag = "CatalogTags::Suppliers")]
    async fn update_supplier(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
        body: Json<UpdateSupplierRequest>,
    ) -> Result<Json<SupplierResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let supplier = self
            .catalog_coordinator
            .update_supplier(&ctx, &id.0, body.0.into())
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(supplier.into()))
    }

    /// Soft delete: sets `activo = false`
    #[oai(path = "/suppliers/:id", method = "delete", tag = "CatalogTags::Suppliers")]
    async fn deactivate_supplier(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<SupplierResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let supplier = self
            .catalog_coordinator
            .deactivate_supplier(&ctx, &id.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(supplier.into()))
    }

    /// List catalog products
    #[oai(path = "/products", method = "get", tag = "CatalogTags::Products")]
    async fn list_products(
        &self,
        req: &Request,
        auth: BearerAuth,
        activo: Query<Option<bool>>,
        q: Query<Option<String>>,
        proveedor_id: Query<Option<String>>,
    ) -> Result<Json<Vec<ProductResponse>>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;
        let filter = CatalogFilter {
            activo: activo.0,
            q: q.0,
        };

        let products = self
            .catalog_coordinator
            .list_products(&ctx, filter, proveedor_id.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(products.into_iter().map(Into::into).collect()))
    }

    /// Add a product; `precio_unitario` in centavos
    #[oai(path = "/products", method = "post", tag = "CatalogTags::Products")]
    async fn create_product(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CreateProductRequest>,
    ) -> Result<Json<ProductResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let product = self
            .catalog_coordinator
            .create_product(&ctx, body.0.into())
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(product.into()))
    }

    /// Get a product
    #[oai(path = "/products/:id", method = "get", tag = "CatalogTags::Products")]
    async fn get_product(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<ProductResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let product = self
            .catalog_coordinator
            .get_product(&ctx, &id.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(product.into()))
    }

    /// Partial update of a product
    #[oai(path = "/products/:id", method = "patch", tag = "CatalogTags::Products")]
    async fn update_product(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
        body: Json<UpdateProductRequest>,
    ) -> Result<Json<ProductResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let product = self
            .catalog_coordinator
            .update_product(&ctx, &id.0, body.0.into())
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(product.into()))
    }

    /// Soft delete: sets `activo = false`
    #[oai(path = "/products/:id", method = "delete", tag = "CatalogTags::Products")]
    async fn deactivate_product(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<ProductResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let product = self
            .catalog_coordinator
            .deactivate_product(&ctx, &id.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(product.into()))
    }
}
