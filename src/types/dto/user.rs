use poem_openapi::Object;
use poem_openapi::types::MaybeUndefined;

use crate::coordinators::{CreatedUser, RoleDetail, UserDetail};
use crate::stores::UserChanges;
use crate::types::db::{permission, user};
use crate::types::dto::common::clearable;
use crate::types::internal::UserStatus;

/// Public view of an account; never carries the password hash
#[derive(Object, Debug, Clone)]
pub struct UserResponse {
    pub id: String,
    pub nombre: String,
    pub email: String,
    pub estado: UserStatus,
    pub area_id: Option<String>,
    /// UI preferences (JSON object)
    pub preferences: serde_json::Value,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        // Stored preferences are always written as a JSON object
        let preferences = serde_json::from_str(&user.preferences)
            .unwrap_or_else(|_| serde_json::Value::Object(Default::default()));
        Self {
            id: user.id,
            nombre: user.nombre,
            email: user.email,
            estado: user.estado,
            area_id: user.area_id,
            preferences,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// A user with role and budget code assignments and effective permissions
#[derive(Object, Debug)]
pub struct UserDetailResponse {
    pub user: UserResponse,
    pub role_ids: Vec<String>,
    pub cp_ids: Vec<String>,
    pub permisos: Vec<String>,
}

impl From<UserDetail> for UserDetailResponse {
    fn from(detail: UserDetail) -> Self {
        Self {
            user: detail.user.into(),
            role_ids: detail.role_ids,
            cp_ids: detail.cp_ids,
            permisos: detail.permisos,
        }
    }
}

#[derive(Object, Debug)]
pub struct CreateUserRequest {
    #[oai(validator(min_length = 1, max_length = 200))]
    pub nombre: String,
    #[oai(validator(min_length = 3, max_length = 254))]
    pub email: String,
    /// A random password is generated and returned once when omitted
    pub password: Option<String>,
    pub area_id: Option<String>,
    #[oai(default)]
    pub role_ids: Vec<String>,
    #[oai(default)]
    pub cp_ids: Vec<String>,
}

#[derive(Object, Debug)]
pub struct CreatedUserResponse {
    pub user: UserResponse,
    /// Only present when the password was generated
    pub generated_password: Option<String>,
}

impl From<CreatedUser> for CreatedUserResponse {
    fn from(created: CreatedUser) -> Self {
        Self {
            user: created.user.into(),
            generated_password: created.generated_password,
        }
    }
}

/// Partial update; absent fields are left unchanged, `area_id: null` clears the area
#[derive(Object, Debug)]
pub struct UpdateUserRequest {
    pub nombre: Option<String>,
    pub email: Option<String>,
    pub area_id: MaybeUndefined<String>,
    pub estado: Option<UserStatus>,
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            nombre: req.nombre,
            email: req.email,
            area_id: clearable(req.area_id),
            estado: req.estado,
        }
    }
}

#[derive(Object, Debug)]
pub struct SetRolesRequest {
    pub role_ids: Vec<String>,
}

#[derive(Object, Debug)]
pub struct SetBudgetCodesRequest {
    pub cp_ids: Vec<String>,
}

/// Arbitrary UI preferences; must be a JSON object
#[derive(Object, Debug)]
pub struct PreferencesRequest {
    pub preferences: serde_json::Value,
}

#[derive(Object, Debug)]
pub struct PreferencesResponse {
    pub preferences: serde_json::Value,
}

#[derive(Object, Debug)]
pub struct PermissionsResponse {
    pub user_id: String,
    pub permisos: Vec<String>,
}

#[derive(Object, Debug)]
pub struct PermissionResponse {
    pub id: String,
    pub clave: String,
    pub descripcion: String,
}

impl From<permission::Model> for PermissionResponse {
    fn from(p: permission::Model) -> Self {
        Self {
            id: p.id,
            clave: p.clave,
            descripcion: p.descripcion,
        }
    }
}

#[derive(Object, Debug)]
pub struct RoleResponse {
    pub id: String,
    pub nombre: String,
    pub descripcion: Option<String>,
    /// Keys this role currently grants
    pub permisos: Vec<String>,
    pub created_at: i64,
}

impl From<RoleDetail> for RoleResponse {
    fn from(detail: RoleDetail) -> Self {
        Self {
            id: detail.role.id,
            nombre: detail.role.nombre,
            descripcion: detail.role.descripcion,
            permisos: detail.permisos,
            created_at: detail.role.created_at,
        }
    }
}

#[derive(Object, Debug)]
pub struct CreateRoleRequest {
    #[oai(validator(min_length = 1, max_length = 100))]
    pub nombre: String,
    pub descripcion: Option<String>,
    /// Permission ids or keys
    #[oai(default)]
    pub permisos: Vec<String>,
}

/// Grant (`asignado = true`) or soft-revoke a permission on a role
#[derive(Object, Debug)]
pub struct SetRolePermissionRequest {
    /// Permission id or key
    pub permiso: String,
    pub asignado: bool,
}
