use poem_openapi::Object;
use poem_openapi::types::MaybeUndefined;

/// Response model for health check endpoint
#[derive(Object, Debug)]
pub struct HealthResponse {
    /// `healthy` or `degraded`
    pub status: String,

    /// Crate version of the running binary
    pub version: String,

    /// Whether the main database answered a ping
    pub database: bool,

    /// Timestamp of the health check (ISO 8601 format)
    pub timestamp: String,
}

/// Plain acknowledgement
#[derive(Object, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Number of rows affected or counted
#[derive(Object, Debug)]
pub struct CountResponse {
    pub count: u64,
}

/// Map an optional, nullable body field onto a store change
///
/// Absent leaves the column untouched, `null` clears it.
pub fn clearable<T>(value: MaybeUndefined<T>) -> Option<Option<T>> {
    match value {
        MaybeUndefined::Undefined => None,
        MaybeUndefined::Null => Some(None),
        MaybeUndefined::Value(v) => Some(Some(v)),
    }
}
