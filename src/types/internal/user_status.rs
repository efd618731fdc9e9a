use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account state stored in `usuarios.estado`
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    poem_openapi::Enum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[oai(rename_all = "lowercase")]
pub enum UserStatus {
    #[sea_orm(string_value = "activo")]
    Activo,
    #[sea_orm(string_value = "inactivo")]
    Inactivo,
}

impl UserStatus {
    pub fn is_active(self) -> bool {
        self == Self::Activo
    }
}
