use sea_orm::entity::prelude::*;

/// Código presupuestal. Amounts are integer centavos.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "codigos_presupuestales")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub codigo: String,
    pub nombre: String,
    pub area_id: Option<String>,
    pub monto_presupuesto: i64,
    pub monto_disponible: i64,
    pub vigencia_inicio: i64,
    pub vigencia_fin: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Model {
    /// Whether `at` (Unix seconds) falls inside the validity window, inclusive
    pub fn is_in_force(&self, at: i64) -> bool {
        self.vigencia_inicio <= at && at <= self.vigencia_fin
    }

    /// Amount already debited by approved orders
    pub fn monto_comprometido(&self) -> i64 {
        self.monto_presupuesto - self.monto_disponible
    }
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
