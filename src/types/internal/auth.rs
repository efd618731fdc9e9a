use serde::{Deserialize, Serialize};

use crate::types::internal::permission::Permission;

/// JWT Claims structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user_id)
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// JWT ID
    pub jti: String,

    /// E-mail of the user at issuance
    pub email: String,

    /// Effective permission keys at issuance
    #[serde(default)]
    pub permisos: Vec<String>,
}

impl Claims {
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permisos.iter().any(|p| p == permission.key())
    }
}
