use poem_openapi::Object;

use crate::coordinators::{OrderDetail, OrderInput};
use crate::types::db::{purchase_order, purchase_order_item};
use crate::types::internal::{OrderItemDraft, OrderStatus};

/// One requested line; price and description default to the product's
#[derive(Object, Debug)]
pub struct OrderItemRequest {
    /// Catalog product; must be active
    pub producto_id: Option<String>,
    /// Required when no product is given
    pub descripcion: Option<String>,
    #[oai(validator(minimum(value = "1")))]
    pub cantidad: i64,
    /// Centavos; required when no product is given
    pub precio_unitario: Option<i64>,
}

impl From<OrderItemRequest> for OrderItemDraft {
    fn from(req: OrderItemRequest) -> Self {
        Self {
            producto_id: req.producto_id,
            descripcion: req.descripcion,
            cantidad: req.cantidad,
            precio_unitario: req.precio_unitario,
        }
    }
}

/// Body of order creation and full replacement
#[derive(Object, Debug)]
pub struct OrderRequest {
    /// Budget code assigned to the requester and in force
    pub cp_id: String,
    pub proveedor_id: Option<String>,
    pub descripcion: String,
    /// At least one line; the order total is their summed `importe`
    pub items: Vec<OrderItemRequest>,
}

impl From<OrderRequest> for OrderInput {
    fn from(req: OrderRequest) -> Self {
        Self {
            cp_id: req.cp_id,
            proveedor_id: req.proveedor_id,
            descripcion: req.descripcion,
            items: req.items.into_iter().map(Into::into).collect(),
        }
    }
}

/// Order header
#[derive(Object, Debug)]
pub struct OrderResponse {
    pub id: String,
    /// OC-000001 style
    pub folio: String,
    /// The requester
    pub usuario_id: String,
    pub cp_id: String,
    pub proveedor_id: Option<String>,
    pub descripcion: String,
    /// Centavos
    pub monto: i64,
    pub estado: OrderStatus,
    /// Set when the order is `Rechazada`
    pub motivo_rechazo: Option<String>,
    /// Last user to edit or move the order
    pub usuario_actualizacion_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<purchase_order::Model> for OrderResponse {
    fn from(o: purchase_order::Model) -> Self {
        Self {
            id: o.id,
            folio: o.folio,
            usuario_id: o.usuario_id,
            cp_id: o.cp_id,
            proveedor_id: o.proveedor_id,
            descripcion: o.descripcion,
            monto: o.monto,
            estado: o.estado,
            motivo_rechazo: o.motivo_rechazo,
            usuario_actualizacion_id: o.usuario_actualizacion_id,
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

/// Order line as priced when the order was last saved
#[derive(Object, Debug)]
pub struct OrderItemResponse {
    pub id: String,
    pub producto_id: Option<String>,
    pub descripcion: String,
    pub cantidad: i64,
    pub precio_unitario: i64,
    /// cantidad * precio_unitario
    pub importe: i64,
}

impl From<purchase_order_item::Model> for OrderItemResponse {
    fn from(i: purchase_order_item::Model) -> Self {
        Self {
            id: i.id,
            producto_id: i.producto_id,
            descripcion: i.descripcion,
            cantidad: i.cantidad,
            precio_unitario: i.precio_unitario,
            importe: i.importe,
        }
    }
}

#[derive(Object, Debug)]
pub struct OrderDetailResponse {
    pub order: OrderResponse,
    pub items: Vec<OrderItemResponse>,
}

impl From<OrderDetail> for OrderDetailResponse {
    fn from(detail: OrderDetail) -> Self {
        Self {
            order: detail.order.into(),
            items: detail.items.into_iter().map(Into::into).collect(),
        }
    }
}

/// Body of the reject action
#[derive(Object, Debug)]
pub struct RejectOrderRequest {
    /// Required, shown to the requester
    pub motivo: Option<String>,
}
