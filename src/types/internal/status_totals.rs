use crate::errors::InternalError;
use crate::types::db::purchase_order;
use crate::types::internal::{OrderStatus, checked_total};

/// Number of orders and their summed amount in one state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTotals {
    pub estado: OrderStatus,
    pub cantidad: u64,
    pub monto: i64,
}

/// One entry per state, in workflow order, including empty ones
///
/// # Errors
/// A validation error when a state's summed amount does not fit in `i64`
pub fn totals_by_status(orders: &[purchase_order::Model]) -> Result<Vec<StatusTotals>, InternalError> {
    OrderStatus::ALL
        .into_iter()
        .map(|estado| -> Result<StatusTotals, InternalError> {
            let in_state = || orders.iter().filter(move |o| o.estado == estado);
            Ok(StatusTotals {
                estado,
                cantidad: in_state().count() as u64,
                monto: checked_total("ordenes_por_estado", in_state().map(|o| o.monto))?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::sample_order;

    #[test]
    fn test_totals_cover_every_state() {
        let orders = vec![
            sample_order("u", OrderStatus::Nueva, 100),
            sample_order("u", OrderStatus::Nueva, 50),
            sample_order("u", OrderStatus::Aprobada, 10),
        ];

        let totals = totals_by_status(&orders).unwrap();

        assert_eq!(totals.len(), OrderStatus::ALL.len());
        assert_eq!(
            totals[0],
            StatusTotals {
                estado: OrderStatus::Nueva,
                cantidad: 2,
                monto: 150
            }
        );
        let aprobada = totals.iter().find(|t| t.estado == OrderStatus::Aprobada).unwrap();
        assert_eq!((aprobada.cantidad, aprobada.monto), (1, 10));
        let cerrada = totals.iter().find(|t| t.estado == OrderStatus::Cerrada).unwrap();
        assert_eq!(cerrada.cantidad, 0);
    }

    #[test]
    fn test_overflowing_state_total_is_an_error() {
        let orders = vec![
            sample_order("u", OrderStatus::Aprobada, i64::MAX),
            sample_order("u", OrderStatus::Aprobada, 1),
        ];

        assert!(matches!(
            totals_by_status(&orders),
            Err(InternalError::Validation { .. })
        ));
    }
}
