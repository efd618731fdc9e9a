use sea_orm::entity::prelude::*;

use crate::types::internal::UserStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "usuarios")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub nombre: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub estado: UserStatus,
    #[sea_orm(indexed)]
    pub area_id: Option<String>,

    // UI preferences as a JSON object
    #[sea_orm(column_type = "Text")]
    pub preferences: String,

    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::area::Entity",
        from = "Column::AreaId",
        to = "super::area::Column::Id",
        on_delete = "Restrict"
    )]
    Area,
}

impl Related<super::area::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Area.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
