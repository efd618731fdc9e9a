use poem_openapi::Object;

use crate::coordinators::DashboardSummary;
use crate::types::dto::budget::StatusTotalsResponse;

/// Landing page figures, scoped to what the caller may see
#[derive(Object, Debug)]
pub struct DashboardResponse {
    /// One entry per state, including empty ones
    pub ordenes_por_estado: Vec<StatusTotalsResponse>,
    /// Orders counted above
    pub total_ordenes: u64,
    /// Sum of `monto_presupuesto` over visible budget codes, in centavos
    pub presupuesto_total: i64,
    /// Sum of `monto_disponible` over visible budget codes
    pub disponible_total: i64,
    /// `presupuesto_total - disponible_total`
    pub comprometido_total: i64,
    pub notificaciones_no_leidas: u64,
}

impl From<DashboardSummary> for DashboardResponse {
    fn from(s: DashboardSummary) -> Self {
        Self {
            ordenes_por_estado: s.ordenes_por_estado.into_iter().map(Into::into).collect(),
            total_ordenes: s.total_ordenes,
            presupuesto_total: s.presupuesto_total,
            disponible_total: s.disponible_total,
            comprometido_total: s.comprometido_total,
            notificaciones_no_leidas: s.notificaciones_no_leidas,
        }
    }
}
