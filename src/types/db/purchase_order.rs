use sea_orm::entity::prelude::*;

use crate::types::internal::OrderStatus;

/// Orden de compra header. `monto` is the sum of its items, in centavos.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ordenes_compra")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub numero: i64,
    #[sea_orm(unique)]
    pub folio: String,
    #[sea_orm(indexed)]
    pub usuario_id: String,
    #[sea_orm(indexed)]
    pub cp_id: String,
    pub proveedor_id: Option<String>,
    pub descripcion: String,
    pub monto: i64,
    #[sea_orm(indexed)]
    pub estado: OrderStatus,
    pub motivo_rechazo: Option<String>,
    pub usuario_actualizacion_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UsuarioId",
        to = "super::user::Column::Id",
        on_delete = "Restrict"
    )]
    Requester,
    #[sea_orm(
        belongs_to = "super::budget_code::Entity",
        from = "Column::CpId",
        to = "super::budget_code::Column::Id",
        on_delete = "Restrict"
    )]
    BudgetCode,
    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::ProveedorId",
        to = "super::supplier::Column::Id",
        on_delete = "Restrict"
    )]
    Supplier,
}

impl Related<super::budget_code::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BudgetCode.def()
    }
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Folio shown to users for order number `numero`
pub fn folio_for(numero: i64) -> String {
    format!("OC-{:06}", numero)
}
