use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::OrderError;
use crate::stores::unix_now;
use crate::types::db::purchase_order::{self, folio_for};
use crate::types::db::purchase_order_item;
use crate::types::internal::{OrderStatus, PricedItem};

/// Header fields of a new order
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub usuario_id: String,
    pub cp_id: String,
    pub proveedor_id: Option<String>,
    pub descripcion: String,
    pub monto: i64,
}

/// Listing filter; every set field must match
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub estado: Option<OrderStatus>,
    pub cp_id: Option<String>,
    pub usuario_id: Option<String>,
    pub proveedor_id: Option<String>,
}

/// Data access for `ordenes_compra` and `orden_compra_items`
#[derive(Debug, Default)]
pub struct PurchaseOrderStore;

impl PurchaseOrderStore {
    pub fn new() -> Self {
        Self
    }

    /// Next sequential order number
    ///
    /// Reads `MAX(numero) + 1`, so it must run inside the inserting transaction.
    /// Two transactions can still read the same value; the UNIQUE index on
    /// `numero` turns the loser's insert into `OrderError::FolioTaken`.
    pub async fn next_numero<C: ConnectionTrait>(&self, conn: &C) -> Result<i64, InternalError> {
        let last = purchase_order::Entity::find()
            .order_by_desc(purchase_order::Column::Numero)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_last_order_numero", e))?;

        Ok(last.map(|o| o.numero + 1).unwrap_or(1))
    }

    /// Insert a `Nueva` order with its priced items under the next folio
    ///
    /// # Arguments
    /// * `conn` - The inserting transaction; the numbering read and the insert must share it
    /// * `new_order` - Header fields, with `monto` already computed
    /// * `items` - Priced items whose `importe` values sum to `monto`
    ///
    /// # Returns
    /// * `Ok(purchase_order::Model)` - The stored header
    /// * `Err(InternalError)` - `OrderError::FolioTaken` when a concurrent insert
    ///   claimed the same number, or a database error
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        new_order: NewOrder,
        items: &[PricedItem],
    ) -> Result<purchase_order::Model, InternalError> {
        let numero = self.next_numero(conn).await?;
        self.create_numbered(conn, numero, new_order, items).await
    }

    /// Insert under an explicit `numero`; `create` picks the number
    pub(crate) async fn create_numbered<C: ConnectionTrait>(
        &self,
        conn: &C,
        numero: i64,
        new_order: NewOrder,
        items: &[PricedItem],
    ) -> Result<purchase_order::Model, InternalError> {
        let now = unix_now();
        let folio = folio_for(numero);

        let inserted = purchase_order::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            numero: Set(numero),
            folio: Set(folio.clone()),
            usuario_actualizacion_id: Set(new_order.usuario_id.clone()),
            usuario_id: Set(new_order.usuario_id),
            cp_id: Set(new_order.cp_id),
            proveedor_id: Set(new_order.proveedor_id),
            descripcion: Set(new_order.descripcion),
            monto: Set(new_order.monto),
            estado: Set(OrderStatus::Nueva),
            motivo_rechazo: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(conn)
        .await;

        let order = match inserted {
            Ok(order) => order,
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                tracing::warn!("Folio {} already taken: {}", folio, e);
                return Err(OrderError::FolioTaken { folio }.into());
            }
            Err(e) => return Err(InternalError::database("create_order", e)),
        };

        self.insert_items(conn, &order.id, items).await?;

        Ok(order)
    }

    async fn insert_items<C: ConnectionTrait>(
        &self,
        conn: &C,
        orden_id: &str,
        items: &[PricedItem],
    ) -> Result<(), InternalError> {
        if items.is_empty() {
            return Ok(());
        }

        let rows = items.iter().map(|item| purchase_order_item::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            orden_id: Set(orden_id.to_string()),
            producto_id: Set(item.producto_id.clone()),
            descripcion: Set(item.descripcion.clone()),
            cantidad: Set(item.cantidad),
            precio_unitario: Set(item.precio_unitario),
            importe: Set(item.importe),
        });

        purchase_order_item::Entity::insert_many(rows)
            .exec_without_returning(conn)
            .await
            .map_err(|e| InternalError::database("insert_order_items", e))?;

        Ok(())
    }

    pub async fn find_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        order_id: &str,
    ) -> Result<Option<purchase_order::Model>, InternalError> {
        purchase_order::Entity::find_by_id(order_id.to_string())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_order", e))
    }

    /// Like `find_by_id`, but a missing order is `OrderError::NotFound`
    pub async fn get<C: ConnectionTrait>(
        &self,
        conn: &C,
        order_id: &str,
    ) -> Result<purchase_order::Model, InternalError> {
        self.find_by_id(conn, order_id).await?.ok_or_else(|| {
            OrderError::NotFound {
                order_id: order_id.to_string(),
            }
            .into()
        })
    }

    pub async fn items<C: ConnectionTrait>(
        &self,
        conn: &C,
        order_id: &str,
    ) -> Result<Vec<purchase_order_item::Model>, InternalError> {
        purchase_order_item::Entity::find()
            .filter(purchase_order_item::Column::OrdenId.eq(order_id))
            .order_by_asc(purchase_order_item::Column::Descripcion)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_order_items", e))
    }

    /// Orders matching `filter`, newest first
    ///
    /// # Arguments
    /// * `conn` - Connection or transaction to run on
    /// * `filter` - State, budget code, requester and supplier narrowing
    ///
    /// # Returns
    /// * `Ok(Vec<purchase_order::Model>)` - Headers only; load items with `items`
    /// * `Err(InternalError)` - Database error
    pub async fn list<C: ConnectionTrait>(
        &self,
        conn: &C,
        filter: &OrderFilter,
    ) -> Result<Vec<purchase_order::Model>, InternalError> {
        let mut query = purchase_order::Entity::find().order_by_desc(purchase_order::Column::Numero);
        if let Some(estado) = filter.estado {
            query = query.filter(purchase_order::Column::Estado.eq(estado));
        }
        if let Some(cp_id) = &filter.cp_id {
            query = query.filter(purchase_order::Column::CpId.eq(cp_id.as_str()));
        }
        if let Some(usuario_id) = &filter.usuario_id {
            query = query.filter(purchase_order::Column::UsuarioId.eq(usuario_id.as_str()));
        }
        if let Some(proveedor_id) = &filter.proveedor_id {
            query = query.filter(purchase_order::Column::ProveedorId.eq(proveedor_id.as_str()));
        }

        query
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_orders", e))
    }

    /// Replace header fields and items of an editable order
    ///
    /// # Arguments
    /// * `conn` - The editing transaction
    /// * `current` - The stored header, already checked to be `Nueva`
    /// * `changes` - New header fields; `usuario_id` is recorded as the last editor
    /// * `items` - The full new item list
    ///
    /// # Returns
    /// * `Ok(purchase_order::Model)` - The updated header
    /// * `Err(InternalError)` - Database error
    pub async fn update_contents<C: ConnectionTrait>(
        &self,
        conn: &C,
        current: purchase_order::Model,
        changes: NewOrder,
        items: &[PricedItem],
    ) -> Result<purchase_order::Model, InternalError> {
        let order_id = current.id.clone();

        purchase_order_item::Entity::delete_many()
            .filter(purchase_order_item::Column::OrdenId.eq(order_id.as_str()))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("clear_order_items", e))?;
        self.insert_items(conn, &order_id, items).await?;

        let mut active = current.into_active_model();
        active.cp_id = Set(changes.cp_id);
        active.proveedor_id = Set(changes.proveedor_id);
        active.descripcion = Set(changes.descripcion);
        active.monto = Set(changes.monto);
        active.usuario_actualizacion_id = Set(changes.usuario_id);
        active.updated_at = Set(unix_now());

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_order", e))
    }

    /// Delete the order and its items
    pub async fn delete<C: ConnectionTrait>(&self, conn: &C, order_id: &str) -> Result<(), InternalError> {
        purchase_order_item::Entity::delete_many()
            .filter(purchase_order_item::Column::OrdenId.eq(order_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_order_items", e))?;

        purchase_order::Entity::delete_by_id(order_id.to_string())
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_order", e))?;

        Ok(())
    }

    /// Move the order from `from` to `to` only if it is still in `from`
    ///
    /// # Arguments
    /// * `conn` - The transition transaction
    /// * `order_id` - Order to move
    /// * `from` - State the caller read and authorized against
    /// * `to` - Target state
    /// * `actor_id` - Recorded as the last editor
    /// * `motivo_rechazo` - Stored only when given
    ///
    /// # Returns
    /// * `Ok(true)` - The state changed
    /// * `Ok(false)` - Another request changed the state first; nothing was written
    /// * `Err(InternalError)` - Database error
    pub async fn transition<C: ConnectionTrait>(
        &self,
        conn: &C,
        order_id: &str,
        from: OrderStatus,
        to: OrderStatus,
        actor_id: &str,
        motivo_rechazo: Option<String>,
    ) -> Result<bool, InternalError> {
        let mut update = purchase_order::Entity::update_many()
            .col_expr(purchase_order::Column::Estado, Expr::value(to.as_str()))
            .col_expr(
                purchase_order::Column::UsuarioActualizacionId,
                Expr::value(actor_id),
            )
            .col_expr(purchase_order::Column::UpdatedAt, Expr::value(unix_now()));
        if let Some(motivo) = motivo_rechazo {
            update = update.col_expr(purchase_order::Column::MotivoRechazo, Expr::value(motivo));
        }

        let result = update
            .filter(purchase_order::Column::Id.eq(order_id))
            .filter(purchase_order::Column::Estado.eq(from))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("transition_order", e))?;

        Ok(result.rows_affected == 1)
    }

    /// Orders of any state charged to `cp_id`
    pub async fn count_for_budget_code<C: ConnectionTrait>(
        &self,
        conn: &C,
        cp_id: &str,
    ) -> Result<u64, InternalError> {
        purchase_order::Entity::find()
            .filter(purchase_order::Column::CpId.eq(cp_id))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_orders_for_budget_code", e))
    }
}
