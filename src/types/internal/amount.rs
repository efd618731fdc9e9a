//! Money amounts, always in centavos

use crate::errors::InternalError;

/// Largest amount accepted for a single budget, price or order
///
/// One trillion pesos. Summing tens of thousands of records at this cap
/// still fits in `i64`; anything beyond is reported, never wrapped.
pub const MAX_AMOUNT: i64 = 100_000_000_000_000;

/// Sum of `amounts`, or a validation error on `field` when it leaves `i64`
pub fn checked_total<I>(field: &str, amounts: I) -> Result<i64, InternalError>
where
    I: IntoIterator<Item = i64>,
{
    amounts
        .into_iter()
        .try_fold(0i64, |sum, value| sum.checked_add(value))
        .ok_or_else(|| InternalError::validation(field, "amount overflow"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_total() {
        assert_eq!(checked_total("monto", [1, 2, 3]).unwrap(), 6);
        assert_eq!(checked_total("monto", []).unwrap(), 0);
        assert!(checked_total("monto", [i64::MAX, 1]).is_err());
        assert!(checked_total("monto", [i64::MIN, -1]).is_err());
    }
}
