use std::sync::Arc;

use poem::Request;
use poem_openapi::param::{Path, Query};
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::api::auth::BearerAuth;
use crate::api::helpers;
use crate::app_data::AppData;
use crate::coordinators::{OrderCoordinator, OrderQuery};
use crate::errors::ApiError;
use crate::providers::TokenProvider;
use crate::types::dto::common::MessageResponse;
use crate::types::dto::order::{
    OrderDetailResponse, OrderRequest, OrderResponse, RejectOrderRequest,
};
use crate::types::internal::OrderStatus;

/// Purchase orders and their approval workflow
pub struct OrdersApi {
    order_coordinator: OrderCoordinator,
    token_provider: Arc<TokenProvider>,
}

impl OrdersApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            token_provider: app_data.token_provider.clone(),
            order_coordinator: OrderCoordinator::new(app_data),
        }
    }
}

#[derive(Tags)]
enum OrderTags {
    /// Purchase orders (órdenes de compra)
    Orders,
    /// Workflow transitions
    Workflow,
}

#[OpenApi]
impl OrdersApi {
    /// Newest first; without `ordenes.ver_todas` only the caller's own orders
    #[oai(path = "/orders", method = "get", tag = "OrderTags::Orders")]
    async fn list_orders(
        &self,
        req: &Request,
        auth: BearerAuth,
        estado: Query<Option<OrderStatus>>,
        cp_id: Query<Option<String>>,
        proveedor_id: Query<Option<String>>,
        #[oai(default)] mine: Query<bool>,
    ) -> Result<Json<Vec<OrderResponse>>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;
        let query = OrderQuery {
            estado: estado.0,
            cp_id: cp_id.0,
            proveedor_id: proveedor_id.0,
            mine: mine.0,
        };

        let orders = self
            .order_coordinator
            .list_orders(&ctx, query)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(orders.into_iter().map(Into::into).collect()))
    }

    /// Create a `Nueva` order; the total is computed from the items
    #[oai(path = "/orders", method = "post", tag = "OrderTags::Orders")]
    async fn create_order(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<OrderRequest>,
    ) -> Result<Json<OrderDetailResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let detail = self
            .order_coordinator
            .create_order(&ctx, body.0.into())
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(detail.into()))
    }

    /// Order with its items; hidden orders answer 404
    #[oai(path = "/orders/:id", method = "get", tag = "OrderTags::Orders")]
    async fn get_order(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<OrderDetailResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let detail = self
            .order_coordinator
            .get_order(&ctx, &id.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(detail.into()))
    }

    /// Replace header and items; requester only, while `Nueva`
    #[oai(path = "/orders/:id", method = "put", tag = "OrderTags::Orders")]
    async fn update_order(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
        body: Json<OrderRequest>,
    ) -> Result<Json<OrderDetailResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let detail = self
            .order_coordinator
            .update_order(&ctx, &id.0, body.0.into())
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(detail.into()))
    }

    /// Requester only, while `Nueva`
    #[oai(path = "/orders/:id", method = "delete", tag = "OrderTags::Orders")]
    async fn delete_order(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<MessageResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        self.order_coordinator
            .delete_order(&ctx, &id.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(MessageResponse::new("Order deleted")))
    }

    /// Nueva -> EnRevision
    #[oai(path = "/orders/:id/submit", method = "post", tag = "OrderTags::Workflow")]
    async fn submit(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<OrderDetailResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let detail = self
            .order_coordinator
            .submit(&ctx, &id.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(detail.into()))
    }

    /// EnRevision -> Aprobada, debiting the budget code
    #[oai(path = "/orders/:id/approve", method = "post", tag = "OrderTags::Workflow")]
    async fn approve(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<OrderDetailResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let detail = self
            .order_coordinator
            .approve(&ctx, &id.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(detail.into()))
    }

    /// EnRevision -> Rechazada; a reason is required
    #[oai(path = "/orders/:id/reject", method = "post", tag = "OrderTags::Workflow")]
    async fn reject(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
        body: Json<RejectOrderRequest>,
    ) -> Result<Json<OrderDetailResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let detail = self
            .order_coordinator
            .reject(&ctx, &id.0, body.0.motivo)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(detail.into()))
    }

    /// Aprobada -> CierreSolicitado
    #[oai(path = "/orders/:id/request-close", method = "post", tag = "OrderTags::Workflow")]
    async fn request_close(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<OrderDetailResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let detail = self
            .order_coordinator
            .request_close(&ctx, &id.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(detail.into()))
    }

    /// CierreSolicitado -> Cerrada
    #[oai(path = "/orders/:id/close", method = "post", tag = "OrderTags::Workflow")]
    async fn close(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<OrderDetailResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let detail = self
            .order_coordinator
            .close(&ctx, &id.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(detail.into()))
    }
}
