use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Audit data for {event_type} could not be serialized: {message}")]
    UnserializableData { event_type: String, message: String },
}
