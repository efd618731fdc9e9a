use thiserror::Error;

#[derive(Error, Debug)]
pub enum UserError {
    #[error("User not found: {user_id}")]
    UserNotFound { user_id: String },

    #[error("E-mail already registered: {email}")]
    DuplicateEmail { email: String },

    #[error("Role not found: {role_id}")]
    RoleNotFound { role_id: String },

    #[error("Role name already exists: {nombre}")]
    DuplicateRoleName { nombre: String },

    #[error("Role {role_id} is still assigned to {users} user(s)")]
    RoleInUse { role_id: String, users: u64 },

    #[error("Permission not found: {permiso}")]
    PermissionNotFound { permiso: String },
}
