use sea_orm::entity::prelude::*;

/// SeaORM entity for audit_events table (audit database)
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "audit_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub timestamp: String,
    pub event_type: String,
    pub user_id: String,
    pub ip_address: Option<String>,
    pub jwt_id: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub data: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
