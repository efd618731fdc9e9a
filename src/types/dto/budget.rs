use poem_openapi::Object;
use poem_openapi::types::MaybeUndefined;

use crate::coordinators::BudgetBalance;
use crate::stores::{BudgetCodeChanges, NewBudgetCode};
use crate::types::db::budget_code;
use crate::types::dto::common::clearable;
use crate::types::internal::{OrderStatus, StatusTotals};

/// Budget code; amounts in centavos, validity as Unix timestamps
#[derive(Object, Debug)]
pub struct BudgetCodeResponse {
    pub id: String,
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

impl From<budget_code::Model> for BudgetCodeResponse {
    fn from(c: budget_code::Model) -> Self {
        Self {
            id: c.id,
            codigo: c.codigo,
            nombre: c.nombre,
            area_id: c.area_id,
            monto_presupuesto: c.monto_presupuesto,
            monto_disponible: c.monto_disponible,
            vigencia_inicio: c.vigencia_inicio,
            vigencia_fin: c.vigencia_fin,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Body of budget code creation
#[derive(Object, Debug)]
pub struct CreateBudgetCodeRequest {
    /// Stored uppercased; must be unique
    #[oai(validator(min_length = 1, max_length = 64))]
    pub codigo: String,
    pub nombre: String,
    pub area_id: Option<String>,
    /// Centavos, at most 100000000000000
    pub monto_presupuesto: i64,
    /// Unix timestamp; orders can be charged from here
    pub vigencia_inicio: i64,
    /// Unix timestamp, not before `vigencia_inicio`
    pub vigencia_fin: i64,
}

impl From<CreateBudgetCodeRequest> for NewBudgetCode {
    fn from(req: CreateBudgetCodeRequest) -> Self {
        Self {
            codigo: req.codigo,
            nombre: req.nombre,
            area_id: req.area_id,
            monto_presupuesto: req.monto_presupuesto,
            vigencia_inicio: req.vigencia_inicio,
            vigencia_fin: req.vigencia_fin,
        }
    }
}

/// Partial update; a new `monto_presupuesto` moves `monto_disponible` by the same delta
#[derive(Object, Debug)]
pub struct UpdateBudgetCodeRequest {
    pub nombre: Option<String>,
    /// Omit to keep, `null` to clear
    pub area_id: MaybeUndefined<String>,
    /// Refused when it would drop below the committed amount
    pub monto_presupuesto: Option<i64>,
    pub vigencia_inicio: Option<i64>,
    pub vigencia_fin: Option<i64>,
}

impl From<UpdateBudgetCodeRequest> for BudgetCodeChanges {
    fn from(req: UpdateBudgetCodeRequest) -> Self {
        Self {
            nombre: req.nombre,
            area_id: clearable(req.area_id),
            monto_presupuesto: req.monto_presupuesto,
            vigencia_inicio: req.vigencia_inicio,
            vigencia_fin: req.vigencia_fin,
        }
    }
}

/// Orders in one state and their summed amount
#[derive(Object, Debug)]
pub struct StatusTotalsResponse {
    pub estado: OrderStatus,
    pub cantidad: u64,
    pub monto: i64,
}

impl From<StatusTotals> for StatusTotalsResponse {
    fn from(t: StatusTotals) -> Self {
        Self {
            estado: t.estado,
            cantidad: t.cantidad,
            monto: t.monto,
        }
    }
}

/// Balance of one budget code with its orders grouped by state
#[derive(Object, Debug)]
pub struct BudgetBalanceResponse {
    pub cp_id: String,
    pub codigo: String,
    pub monto_presupuesto: i64,
    pub monto_disponible: i64,
    /// presupuesto - disponible
    pub monto_comprometido: i64,
    pub ordenes_por_estado: Vec<StatusTotalsResponse>,
}

impl From<BudgetBalance> for BudgetBalanceResponse {
    fn from(balance: BudgetBalance) -> Self {
        Self {
            cp_id: balance.code.id,
            codigo: balance.code.codigo,
            monto_presupuesto: balance.code.monto_presupuesto,
            monto_disponible: balance.code.monto_disponible,
            monto_comprometido: balance.monto_comprometido,
            ordenes_por_estado: balance
                .ordenes_por_estado
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}
