use thiserror::Error;

/// Errors for areas, suppliers, products and notifications
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{entity} already exists: {value}")]
    Duplicate { entity: &'static str, value: String },

    #[error("{entity} {id} is referenced by {references}")]
    InUse {
        entity: &'static str,
        id: String,
        references: String,
    },
}

impl CatalogError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound { entity, id: id.into() }
    }

    pub fn duplicate(entity: &'static str, value: impl Into<String>) -> Self {
        Self::Duplicate { entity, value: value.into() }
    }
}
