use std::collections::HashMap;
use std::fmt;

/// Event types for audit logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventType {
    LoginSuccess,
    LoginFailure,
    UserCreated,
    UserUpdated,
    UserRolesChanged,
    UserBudgetCodesChanged,
    RoleCreated,
    RoleDeleted,
    RolePermissionChanged,
    BudgetCodeCreated,
    BudgetCodeUpdated,
    BudgetCodeDeleted,
    OrderCreated,
    OrderUpdated,
    OrderDeleted,
    OrderTransition,
    CatalogChanged,
    CliSessionStart,
    CliSessionEnd,
    Custom(String),
}

impl EventType {
    /// Convert EventType to string representation for database storage
    pub fn as_str(&self) -> &str {
        match self {
            Self::LoginSuccess => "login_success",
            Self::LoginFailure => "login_failure",
            Self::UserCreated => "user_created",
            Self::UserUpdated => "user_updated",
            Self::UserRolesChanged => "user_roles_changed",
            Self::UserBudgetCodesChanged => "user_budget_codes_changed",
            Self::RoleCreated => "role_created",
            Self::RoleDeleted => "role_deleted",
            Self::RolePermissionChanged => "role_permission_changed",
            Self::BudgetCodeCreated => "budget_code_created",
            Self::BudgetCodeUpdated => "budget_code_updated",
            Self::BudgetCodeDeleted => "budget_code_deleted",
            Self::OrderCreated => "order_created",
            Self::OrderUpdated => "order_updated",
            Self::OrderDeleted => "order_deleted",
            Self::OrderTransition => "order_transition",
            Self::CatalogChanged => "catalog_changed",
            Self::CliSessionStart => "cli_session_start",
            Self::CliSessionEnd => "cli_session_end",
            Self::Custom(s) => s.as_str(),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for EventType {
    fn from(s: &str) -> Self {
        EventType::Custom(s.to_string())
    }
}

impl From<String> for EventType {
    fn from(s: String) -> Self {
        EventType::Custom(s)
    }
}

/// Audit event structure for building and storing audit logs
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub event_type: EventType,
    pub user_id: Option<String>,
    pub ip_address: Option<String>,
    pub jwt_id: Option<String>,
    /// Kind of record the event is about (`orden_compra`, `codigo_presupuestal`, ...)
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub data: HashMap<String, serde_json::Value>,
}

impl AuditEvent {
    /// Create a new audit event with the specified event type
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            user_id: None,
            ip_address: None,
            jwt_id: None,
            entity_type: None,
            entity_id: None,
            data: HashMap::new(),
        }
    }
}
