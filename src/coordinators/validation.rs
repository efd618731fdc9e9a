//! Input checks shared by coordinators

use std::collections::BTreeSet;

use crate::errors::InternalError;
use crate::types::internal::MAX_AMOUNT;

const MIN_PASSWORD_LENGTH: usize = 8;

/// Trimmed value, refusing blanks
pub(crate) fn required_text(field: &str, value: &str) -> Result<String, InternalError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(InternalError::validation(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

/// Trimmed value, with blanks treated as absent
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Lowercased e-mail with a plausible `local@domain` shape
pub(crate) fn normalized_email(value: &str) -> Result<String, InternalError> {
    let email = value.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(InternalError::validation("email", "not a valid e-mail address")),
    }
}

/// Amount within `0..=MAX_AMOUNT`
pub(crate) fn amount(field: &str, value: i64) -> Result<i64, InternalError> {
    if value < 0 {
        return Err(InternalError::validation(field, "cannot be negative"));
    }
    if value > MAX_AMOUNT {
        return Err(InternalError::validation(
            field,
            format!("cannot exceed {}", MAX_AMOUNT),
        ));
    }
    Ok(value)
}

/// Trimmed, non-blank ids with repeats removed, sorted
pub(crate) fn unique_ids(ids: Vec<String>) -> Vec<String> {
    ids.into_iter()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub(crate) fn password(value: &str) -> Result<(), InternalError> {
    if value.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(InternalError::validation(
            "password",
            format!("must be at least {} characters", MIN_PASSWORD_LENGTH),
        ));
    }
    Ok(())
}

pub(crate) fn validity_window(inicio: i64, fin: i64) -> Result<(), InternalError> {
    if fin < inicio {
        return Err(InternalError::validation(
            "vigencia_fin",
            "must not be earlier than vigencia_inicio",
        ));
    }
    Ok(())
}
