use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::audit::AuditLogger;
use crate::config::{begin_transaction, commit_transaction};
use crate::coordinators::validation;
use crate::errors::InternalError;
use crate::errors::internal::CatalogError;
use crate::providers::AuthorizationProvider;
use crate::stores::{
    AreaChanges, AreaStore, BudgetCodeStore, CatalogFilter, NewProduct, NewSupplier,
    ProductChanges, ProductStore, SupplierChanges, SupplierStore, UserStore,
};
use crate::types::db::{area, product, supplier};
use crate::types::internal::Permission;
use crate::types::internal::audit::EventType;
use crate::types::internal::context::RequestContext;

/// Catalog coordinator: areas, suppliers and products
///
/// Any authenticated user may read; writes require `catalogos.administrar`.
/// Suppliers and products are never deleted, only deactivated.
pub struct CatalogCoordinator {
    db: DatabaseConnection,
    area_store: Arc<AreaStore>,
    supplier_store: Arc<SupplierStore>,
    product_store: Arc<ProductStore>,
    user_store: Arc<UserStore>,
    budget_code_store: Arc<BudgetCodeStore>,
    authorization_provider: AuthorizationProvider,
    audit_logger: Arc<AuditLogger>,
}

impl CatalogCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.connections.main.clone(),
            area_store: app_data.area_store.clone(),
            supplier_store: app_data.supplier_store.clone(),
            product_store: app_data.product_store.clone(),
            user_store: app_data.user_store.clone(),
            budget_code_store: app_data.budget_code_store.clone(),
            authorization_provider: AuthorizationProvider::new(),
            audit_logger: app_data.audit_logger.clone(),
        }
    }

    async fn log_change(&self, ctx: &RequestContext, entity: &str, id: &str, action: &str) {
        self.audit_logger
            .entity_event(ctx, EventType::CatalogChanged, entity, id)
            .add_field("action", action)
            .emit()
            .await;
    }

    // Areas

    /// Areas sorted by name; any authenticated caller
    pub async fn list_areas(
        &self,
        ctx: &RequestContext,
        only_active: bool,
    ) -> Result<Vec<area::Model>, InternalError> {
        self.authorization_provider.authenticated_user(ctx)?;

        self.area_store.list(&self.db, only_active).await
    }

    pub async fn get_area(&self, ctx: &RequestContext, area_id: &str) -> Result<area::Model, InternalError> {
        self.authorization_provider.authenticated_user(ctx)?;

        self.area_store.get(&self.db, area_id).await
    }

    /// Create an active area
    ///
    /// # Authorization
    /// Requires `catalogos.administrar`
    ///
    /// # Arguments
    /// * `ctx` - RequestContext with authenticated user info
    /// * `nombre` - Area name, trimmed; must be unique
    /// * `descripcion` - Optional free text; blank counts as absent
    ///
    /// # Returns
    /// * `Ok(area::Model)` - The stored area
    /// * `Err(InternalError)` - Missing permission, blank name, or a duplicate name
    pub async fn create_area(
        &self,
        ctx: &RequestContext,
        nombre: String,
        descripcion: Option<String>,
    ) -> Result<area::Model, InternalError> {
        self.authorization_provider.require(ctx, Permission::CatalogAdmin)?;
        let nombre = validation::required_text("nombre", &nombre)?;

        let area = self
            .area_store
            .create(&self.db, nombre, validation::optional_text(descripcion))
            .await?;

        self.log_change(ctx, "area", &area.id, "create").await;
        Ok(area)
    }

    pub async fn update_area(
        &self,
        ctx: &RequestContext,
        area_id: &str,
        changes: AreaChanges,
    ) -> Result<area::Model, InternalError> {
        self.authorization_provider.require(ctx, Permission::CatalogAdmin)?;
        let changes = AreaChanges {
            nombre: changes
                .nombre
                .map(|n| validation::required_text("nombre", &n))
                .transpose()?,
            descripcion: changes.descripcion.map(validation::optional_text),
            activa: changes.activa,
        };

        let txn = begin_transaction(&self.db).await?;
        let current = self.area_store.get(&txn, area_id).await?;
        let area = self.area_store.update(&txn, current, changes).await?;
        commit_transaction(txn).await?;

        self.log_change(ctx, "area", &area.id, "update").await;
        Ok(area)
    }

    /// Delete an area nobody references
    ///
    /// # Authorization
    /// Requires `catalogos.administrar`
    ///
    /// # Returns
    /// * `Ok(())` - Area removed
    /// * `Err(InternalError)` - Not found, or `CatalogError::InUse` naming how many
    ///   users and budget codes still point at it
    pub async fn delete_area(&self, ctx: &RequestContext, area_id: &str) -> Result<(), InternalError> {
        self.authorization_provider.require(ctx, Permission::CatalogAdmin)?;

        let txn = begin_transaction(&self.db).await?;

        self.area_store.get(&txn, area_id).await?;
        let users = self.user_store.count_in_area(&txn, area_id).await?;
        let codes = self.budget_code_store.count_in_area(&txn, area_id).await?;
        if users > 0 || codes > 0 {
            return Err(CatalogError::InUse {
                entity: "Area",
                id: area_id.to_string(),
                references: format!("{} user(s) and {} budget code(s)", users, codes),
            }
            .into());
        }
        self.area_store.delete(&txn, area_id).await?;

        commit_transaction(txn).await?;

        self.log_change(ctx, "area", area_id, "delete").await;
        Ok(())
    }

    // Suppliers

    pub async fn list_suppliers(
        &self,
        ctx: &RequestContext,
        filter: CatalogFilter,
    ) -> Result<Vec<supplier::Model>, InternalError> {
        self.authorization_provider.authenticated_user(ctx)?;

        self.supplier_store.list(&self.db, &filter).await
    }

    pub async fn get_supplier(
        &self,
        ctx: &RequestContext,
        supplier_id: &str,
    ) -> Result<supplier::Model, InternalError> {
        self.authorization_provider.authenticated_user(ctx)?;

        self.supplier_store.get(&self.db, supplier_id).await
    }

    /// Register an active supplier
    ///
    /// # Authorization
    /// Requires `catalogos.administrar`
    ///
    /// # Arguments
    /// * `ctx` - RequestContext with authenticated user info
    /// * `new_supplier` - Raw input; the RFC is uppercased and must have 12 or 13 characters
    ///
    /// # Returns
    /// * `Ok(supplier::Model)` - The stored supplier
    /// * `Err(InternalError)` - Missing permission, validation, or an RFC already registered
    pub async fn create_supplier(
        &self,
        ctx: &RequestContext,
        new_supplier: NewSupplier,
    ) -> Result<supplier::Model, InternalError> {
        self.authorization_provider.require(ctx, Permission::CatalogAdmin)?;
        let new_supplier = NewSupplier {
            nombre: validation::required_text("nombre", &new_supplier.nombre)?,
            rfc: normalized_rfc(&new_supplier.rfc)?,
            email: validation::optional_text(new_supplier.email),
            telefono: validation::optional_text(new_supplier.telefono),
        };

        let supplier = self.supplier_store.create(&self.db, new_supplier).await?;

        self.log_change(ctx, "proveedor", &supplier.id, "create").await;
        Ok(supplier)
    }

    pub async fn update_supplier(
        &self,
        ctx: &RequestContext,
        supplier_id: &str,
        changes: SupplierChanges,
    ) -> Result<supplier::Model, InternalError> {
        self.authorization_provider.require(ctx, Permission::CatalogAdmin)?;
        let changes = SupplierChanges {
            nombre: changes
                .nombre
                .map(|n| validation::required_text("nombre", &n))
                .transpose()?,
            rfc: changes.rfc.map(|r| normalized_rfc(&r)).transpose()?,
            email: changes.email.map(validation::optional_text),
            telefono: changes.telefono.map(validation::optional_text),
            activo: changes.activo,
        };

        let txn = begin_transaction(&self.db).await?;
        let current = self.supplier_store.get(&txn, supplier_id).await?;
        let supplier = self.supplier_store.update(&txn, current, changes).await?;
        commit_transaction(txn).await?;

        self.log_change(ctx, "proveedor", &supplier.id, "update").await;
        Ok(supplier)
    }

    /// Soft delete; existing orders keep pointing at the supplier
    pub async fn deactivate_supplier(
        &self,
        ctx: &RequestContext,
        supplier_id: &str,
    ) -> Result<supplier::Model, InternalError> {
        self.update_supplier(
            ctx,
            supplier_id,
            SupplierChanges {
                activo: Some(false),
                ..Default::default()
            },
        )
        .await
    }

    // Products

    pub async fn list_products(
        &self,
        ctx: &RequestContext,
        filter: CatalogFilter,
        proveedor_id: Option<String>,
    ) -> Result<Vec<product::Model>, InternalError> {
        self.authorization_provider.authenticated_user(ctx)?;

        self.product_store
            .list(&self.db, &filter, proveedor_id.as_deref())
            .await
    }

    pub async fn get_product(
        &self,
        ctx: &RequestContext,
        product_id: &str,
    ) -> Result<product::Model, InternalError> {
        self.authorization_provider.authenticated_user(ctx)?;

        self.product_store.get(&self.db, product_id).await
    }

    /// Add an active product to the catalog
    ///
    /// # Authorization
    /// Requires `catalogos.administrar`
    ///
    /// # Arguments
    /// * `ctx` - RequestContext with authenticated user info
    /// * `new_product` - Raw input; `precio_unitario` in centavos within `0..=MAX_AMOUNT`
    ///
    /// # Returns
    /// * `Ok(product::Model)` - The stored product
    /// * `Err(InternalError)` - Missing permission, validation, or an unknown supplier
    pub async fn create_product(
        &self,
        ctx: &RequestContext,
        new_product: NewProduct,
    ) -> Result<product::Model, InternalError> {
        self.authorization_provider.require(ctx, Permission::CatalogAdmin)?;
        let new_product = NewProduct {
            nombre: validation::required_text("nombre", &new_product.nombre)?,
            descripcion: validation::optional_text(new_product.descripcion),
            unidad: validation::required_text("unidad", &new_product.unidad)?,
            precio_unitario: validation::amount("precio_unitario", new_product.precio_unitario)?,
            proveedor_id: validation::optional_text(new_product.proveedor_id),
        };

        let txn = begin_transaction(&self.db).await?;
        if let Some(proveedor_id) = &new_product.proveedor_id {
            self.supplier_store.get(&txn, proveedor_id).await?;
        }
        let product = self.product_store.create(&txn, new_product).await?;
        commit_transaction(txn).await?;

        self.log_change(ctx, "producto", &product.id, "create").await;
        Ok(product)
    }

    pub async fn update_product(
        &self,
        ctx: &RequestContext,
        product_id: &str,
        changes: ProductChanges,
    ) -> Result<product::Model, InternalError> {
        self.authorization_provider.require(ctx, Permission::CatalogAdmin)?;
        let changes = ProductChanges {
            nombre: changes
                .nombre
                .map(|n| validation::required_text("nombre", &n))
                .transpose()?,
            descripcion: changes.descripcion.map(validation::optional_text),
            unidad: changes
                .unidad
                .map(|u| validation::required_text("unidad", &u))
                .transpose()?,
            precio_unitario: changes
                .precio_unitario
                .map(|p| validation::amount("precio_unitario", p))
                .transpose()?,
            proveedor_id: changes.proveedor_id.map(validation::optional_text),
            activo: changes.activo,
        };

        let txn = begin_transaction(&self.db).await?;
        if let Some(Some(proveedor_id)) = &changes.proveedor_id {
            self.supplier_store.get(&txn, proveedor_id).await?;
        }
        let current = self.product_store.get(&txn, product_id).await?;
        let product = self.product_store.update(&txn, current, changes).await?;
        commit_transaction(txn).await?;

        self.log_change(ctx, "producto", &product.id, "update").await;
        Ok(product)
    }

    /// Soft delete; inactive products cannot be put on new orders
    pub async fn deactivate_product(
        &self,
        ctx: &RequestContext,
        product_id: &str,
    ) -> Result<product::Model, InternalError> {
        self.update_product(
            ctx,
            product_id,
            ProductChanges {
                activo: Some(false),
                ..Default::default()
            },
        )
        .await
    }
}

/// RFCs are stored uppercase without surrounding spaces
fn normalized_rfc(rfc: &str) -> Result<String, InternalError> {
    let rfc = validation::required_text("rfc", rfc)?.to_uppercase();
    if !(12..=13).contains(&rfc.chars().count()) {
        return Err(InternalError::validation("rfc", "must have 12 or 13 characters"));
    }
    Ok(rfc)
}
