use std::sync::Arc;

use poem::Request;
use poem_openapi::param::{Path, Query};
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::api::auth::BearerAuth;
use crate::api::helpers;
use crate::app_data::AppData;
use crate::coordinators::{CreateUserInput, UserCoordinator};
use crate::errors::ApiError;
use crate::providers::TokenProvider;
use crate::stores::UserFilter;
use crate::types::dto::user::{
    CreateUserRequest, CreatedUserResponse, PermissionsResponse, PreferencesRequest,
    PreferencesResponse, SetBudgetCodesRequest, SetRolesRequest, UpdateUserRequest,
    UserDetailResponse, UserResponse,
};
use crate::types::internal::UserStatus;

/// User administration and the caller's own profile
pub struct UsersApi {
    user_coordinator: UserCoordinator,
    token_provider: Arc<TokenProvider>,
}

impl UsersApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            token_provider: app_data.token_provider.clone(),
            user_coordinator: UserCoordinator::new(app_data),
        }
    }
}

#[derive(Tags)]
enum UserTags {
    /// Accounts, role and budget code assignments
    Users,
}

#[OpenApi(tag = "UserTags::Users")]
impl UsersApi {
    /// List users, optionally filtered by estado, area or free text
    #[oai(path = "/users", method = "get")]
    async fn list_users(
        &self,
        req: &Request,
        auth: BearerAuth,
        estado: Query<Option<UserStatus>>,
        area_id: Query<Option<String>>,
        q: Query<Option<String>>,
    ) -> Result<Json<Vec<UserResponse>>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;
        let filter = UserFilter {
            estado: estado.0,
            area_id: area_id.0,
            q: q.0,
        };

        let users = self
            .user_coordinator
            .list_users(&ctx, filter)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(users.into_iter().map(Into::into).collect()))
    }

    /// Create a user; a generated password is returned only in this response
    #[oai(path = "/users", method = "post")]
    async fn create_user(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CreateUserRequest>,
    ) -> Result<Json<CreatedUserResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;
        let body = body.0;
        let input = CreateUserInput {
            nombre: body.nombre,
            email: body.email,
            password: body.password,
            area_id: body.area_id,
            role_ids: body.role_ids,
            cp_ids: body.cp_ids,
        };

        let created = self
            .user_coordinator
            .create_user(&ctx, input)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(created.into()))
    }

    /// The caller's profile with assignments and permissions
    #[oai(path = "/users/me", method = "get")]
    async fn current_user(&self, req: &Request, auth: BearerAuth) -> Result<Json<UserDetailResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let detail = self
            .user_coordinator
            .current_user(&ctx)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(detail.into()))
    }

    /// Replace the caller's UI preferences
    #[oai(path = "/users/me/preferences", method = "put")]
    async fn update_preferences(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<PreferencesRequest>,
    ) -> Result<Json<PreferencesResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let preferences = self
            .user_coordinator
            .update_preferences(&ctx, body.0.preferences)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(PreferencesResponse { preferences }))
    }

    /// A user with roles, budget codes and effective permissions
    #[oai(path = "/users/:id", method = "get")]
    async fn get_user(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<UserDetailResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let detail = self
            .user_coordinator
            .get_user(&ctx, &id.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(detail.into()))
    }

    /// Partial update of nombre, email, area or estado
    #[oai(path = "/users/:id", method = "patch")]
    async fn update_user(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
        body: Json<UpdateUserRequest>,
    ) -> Result<Json<UserResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let user = self
            .user_coordinator
            .update_user(&ctx, &id.0, body.0.into())
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(user.into()))
    }

    /// Deactivate a user; accounts are never hard-deleted
    #[oai(path = "/users/:id", method = "delete")]
    async fn deactivate_user(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<UserResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let user = self
            .user_coordinator
            .deactivate_user(&ctx, &id.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(user.into()))
    }

    /// Replace the user's roles; takes effect at their next login
    #[oai(path = "/users/:id/roles", method = "put")]
    async fn set_user_roles(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
        body: Json<SetRolesRequest>,
    ) -> Result<Json<UserDetailResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let detail = self
            .user_coordinator
            .set_user_roles(&ctx, &id.0, body.0.role_ids)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(detail.into()))
    }

    /// Replace the budget codes the user may charge orders to
    #[oai(path = "/users/:id/budget-codes", method = "put")]
    async fn set_user_budget_codes(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
        body: Json<SetBudgetCodesRequest>,
    ) -> Result<Json<UserDetailResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let detail = self
            .user_coordinator
            .set_user_budget_codes(&ctx, &id.0, body.0.cp_ids)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(detail.into()))
    }

    /// Union of permission keys granted by the user's roles
    #[oai(path = "/users/:id/permissions", method = "get")]
    async fn effective_permissions(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<PermissionsResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let permisos = self
            .user_coordinator
            .effective_permissions(&ctx, &id.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(PermissionsResponse {
            user_id: id.0,
            permisos,
        }))
    }
}
