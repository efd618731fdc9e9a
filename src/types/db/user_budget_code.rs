use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "usuario_codigos_presupuestales")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub usuario_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub cp_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UsuarioId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::budget_code::Entity",
        from = "Column::CpId",
        to = "super::budget_code::Column::Id",
        on_delete = "Cascade"
    )]
    BudgetCode,
}

impl ActiveModelBehavior for ActiveModel {}
