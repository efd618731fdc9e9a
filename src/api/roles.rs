use std::sync::Arc;

use poem::Request;
use poem_openapi::param::Path;
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::api::auth::BearerAuth;
use crate::api::helpers;
use crate::app_data::AppData;
use crate::coordinators::RoleCoordinator;
use crate::errors::ApiError;
use crate::providers::TokenProvider;
use crate::types::dto::common::MessageResponse;
use crate::types::dto::user::{
    CreateRoleRequest, PermissionResponse, RoleResponse, SetRolePermissionRequest,
};

/// Roles and the permission catalog
pub struct RolesApi {
    role_coordinator: RoleCoordinator,
    token_provider: Arc<TokenProvider>,
}

impl RolesApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            token_provider: app_data.token_provider.clone(),
            role_coordinator: RoleCoordinator::new(app_data),
        }
    }
}

#[derive(Tags)]
enum RoleTags {
    /// Roles and permissions
    Roles,
}

#[OpenApi(tag = "RoleTags::Roles")]
impl RolesApi {
    /// The seeded permission catalog
    #[oai(path = "/permissions", method = "get")]
    async fn list_permissions(
        &self,
        req: &Request,
        auth: BearerAuth,
    ) -> Result<Json<Vec<PermissionResponse>>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let permissions = self
            .role_coordinator
            .list_permissions(&ctx)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(permissions.into_iter().map(Into::into).collect()))
    }

    /// Every role with the permission keys it grants
    #[oai(path = "/roles", method = "get")]
    async fn list_roles(&self, req: &Request, auth: BearerAuth) -> Result<Json<Vec<RoleResponse>>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let roles = self
            .role_coordinator
            .list_roles(&ctx)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(roles.into_iter().map(Into::into).collect()))
    }

    /// Create a role with an initial permission set
    #[oai(path = "/roles", method = "post")]
    async fn create_role(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CreateRoleRequest>,
    ) -> Result<Json<RoleResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;
        let body = body.0;

        let role = self
            .role_coordinator
            .create_role(&ctx, body.nombre, body.descripcion, body.permisos)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(role.into()))
    }

    /// One role with its granted keys
    #[oai(path = "/roles/:id", method = "get")]
    async fn get_role(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<RoleResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let role = self
            .role_coordinator
            .get_role(&ctx, &id.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(role.into()))
    }

    /// Delete a role no user holds
    #[oai(path = "/roles/:id", method = "delete")]
    async fn delete_role(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<MessageResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        self.role_coordinator
            .delete_role(&ctx, &id.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(MessageResponse::new("Role deleted")))
    }

    /// Grant or soft-revoke one permission
    #[oai(path = "/roles/:id/permissions", method = "put")]
    async fn set_role_permission(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
        body: Json<SetRolePermissionRequest>,
    ) -> Result<Json<RoleResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let role = self
            .role_coordinator
            .set_role_permission(&ctx, &id.0, &body.permiso, body.asignado)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(role.into()))
    }
}
