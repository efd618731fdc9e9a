use std::sync::Arc;

use poem::Request;
use poem_openapi::param::{Path, Query};
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::api::auth::BearerAuth;
use crate::api::helpers;
use crate::app_data::AppData;
use crate::coordinators::BudgetCoordinator;
use crate::errors::ApiError;
use crate::providers::TokenProvider;
use crate::types::dto::budget::{
    BudgetBalanceResponse, BudgetCodeResponse, CreateBudgetCodeRequest, UpdateBudgetCodeRequest,
};
use crate::types::dto::common::MessageResponse;

/// Budget codes (códigos presupuestales) and their balances
pub struct BudgetApi {
    budget_coordinator: BudgetCoordinator,
    token_provider: Arc<TokenProvider>,
}

impl BudgetApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            token_provider: app_data.token_provider.clone(),
            budget_coordinator: BudgetCoordinator::new(app_data),
        }
    }
}

#[derive(Tags)]
enum BudgetTags {
    /// Budget codes
    BudgetCodes,
}

#[OpenApi(tag = "BudgetTags::BudgetCodes")]
impl BudgetApi {
    /// Codes visible to the caller: all for budget admins, assigned ones otherwise
    #[oai(path = "/budget-codes", method = "get")]
    async fn list_budget_codes(
        &self,
        req: &Request,
        auth: BearerAuth,
        area_id: Query<Option<String>>,
    ) -> Result<Json<Vec<BudgetCodeResponse>>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let codes = self
            .budget_coordinator
            .list_budget_codes(&ctx, area_id.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(codes.into_iter().map(Into::into).collect()))
    }

    /// Create a budget code; `monto_disponible` starts at `monto_presupuesto`
    #[oai(path = "/budget-codes", method = "post")]
    async fn create_budget_code(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CreateBudgetCodeRequest>,
    ) -> Result<Json<BudgetCodeResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let code = self
            .budget_coordinator
            .create_budget_code(&ctx, body.0.into())
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(code.into()))
    }

    /// A budget code visible to the caller
    #[oai(path = "/budget-codes/:id", method = "get")]
    async fn get_budget_code(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<BudgetCodeResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let code = self
            .budget_coordinator
            .get_budget_code(&ctx, &id.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(code.into()))
    }

    /// Partial update; a new budget moves the available amount by the same delta
    #[oai(path = "/budget-codes/:id", method = "patch")]
    async fn update_budget_code(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
        body: Json<UpdateBudgetCodeRequest>,
    ) -> Result<Json<BudgetCodeResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let code = self
            .budget_coordinator
            .update_budget_code(&ctx, &id.0, body.0.into())
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(code.into()))
    }

    /// Rejected while any order references the code
    #[oai(path = "/budget-codes/:id", method = "delete")]
    async fn delete_budget_code(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<MessageResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        self.budget_coordinator
            .delete_budget_code(&ctx, &id.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(MessageResponse::new("Budget code deleted")))
    }

    /// Presupuesto, disponible, comprometido and orders by estado
    #[oai(path = "/budget-codes/:id/balance", method = "get")]
    async fn budget_code_balance(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<BudgetBalanceResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;

        let balance = self
            .budget_coordinator
            .budget_code_balance(&ctx, &id.0)
            .await
            .map_err(ApiError::from_internal_error)?;

        Ok(Json(balance.into()))
    }
}
