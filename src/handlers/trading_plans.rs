use crate::auth::CurrentUser;
use crate::schemas::{ApiResponse, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use model::entities::trading_plan;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

/// Request body for creating a new trading plan
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateTradingPlanRequest {
    /// Day label, e.g. "Monday" or "Day 3"
    pub day: String,
    /// Balance snapshot the sizing was computed against
    pub account_balance: f64,
    pub daily_target: f64,
    pub required_lots: f64,
    pub rounded_lots: f64,
    /// Risk in account currency
    pub risk_amount: f64,
    /// Risk as a percentage of the balance snapshot
    pub risk_percentage: f64,
    pub sl_pips: f64,
    pub tp_pips: f64,
    /// false = pending, true = done (default: false)
    pub status: Option<bool>,
    pub reason: Option<String>,
    /// Plan date (default: today)
    pub plan_date: Option<NaiveDate>,
}

/// Request body for updating a trading plan.
///
/// Plan updates are a full-field overwrite, like account updates.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateTradingPlanRequest {
    pub day: String,
    pub account_balance: f64,
    pub daily_target: f64,
    pub required_lots: f64,
    pub rounded_lots: f64,
    pub risk_amount: f64,
    pub risk_percentage: f64,
    pub sl_pips: f64,
    pub tp_pips: f64,
    pub status: bool,
    pub reason: Option<String>,
    pub plan_date: NaiveDate,
}

/// Trading plan response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TradingPlanResponse {
    pub id: i32,
    pub day: String,
    pub account_balance: f64,
    pub daily_target: f64,
    pub required_lots: f64,
    pub rounded_lots: f64,
    pub risk_amount: f64,
    pub risk_percentage: f64,
    pub sl_pips: f64,
    pub tp_pips: f64,
    pub status: bool,
    pub reason: Option<String>,
    pub plan_date: NaiveDate,
    pub owner_id: i32,
}

impl From<trading_plan::Model> for TradingPlanResponse {
    fn from(model: trading_plan::Model) -> Self {
        Self {
            id: model.id,
            day: model.day,
            account_balance: model.account_balance,
            daily_target: model.daily_target,
            required_lots: model.required_lots,
            rounded_lots: model.rounded_lots,
            risk_amount: model.risk_amount,
            risk_percentage: model.risk_percentage,
            sl_pips: model.sl_pips,
            tp_pips: model.tp_pips,
            status: model.status,
            reason: model.reason,
            plan_date: model.plan_date,
            owner_id: model.owner_id,
        }
    }
}

/// Create a new trading plan owned by the current user
#[utoipa::path(
    post,
    path = "/api/v1/trading-plans",
    tag = "trading-plans",
    request_body = CreateTradingPlanRequest,
    responses(
        (status = 201, description = "Trading plan created successfully", body = ApiResponse<TradingPlanResponse>),
        (status = 401, description = "Missing or invalid token", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn create_trading_plan(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateTradingPlanRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TradingPlanResponse>>), StatusCode> {
    trace!("Entering create_trading_plan function");
    debug!("Creating trading plan '{}' for user {}", request.day, user.id);

    let new_plan = trading_plan::ActiveModel {
        day: Set(request.day.clone()),
        account_balance: Set(request.account_balance),
        daily_target: Set(request.daily_target),
        required_lots: Set(request.required_lots),
        rounded_lots: Set(request.rounded_lots),
        risk_amount: Set(request.risk_amount),
        risk_percentage: Set(request.risk_percentage),
        sl_pips: Set(request.sl_pips),
        tp_pips: Set(request.tp_pips),
        status: Set(request.status.unwrap_or(false)),
        reason: Set(request.reason.clone()),
        plan_date: Set(request
            .plan_date
            .unwrap_or_else(|| chrono::Utc::now().date_naive())),
        owner_id: Set(user.id),
        ..Default::default()
    };

    match new_plan.insert(&state.db).await {
        Ok(plan_model) => {
            info!(
                "Trading plan created successfully with ID: {} for user {}",
                plan_model.id, user.id
            );
            let response = ApiResponse {
                data: TradingPlanResponse::from(plan_model),
                message: "Trading plan created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(db_error) => {
            error!(
                "Failed to create trading plan for user {}: {}",
                user.id, db_error
            );
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get all trading plans owned by the current user
#[utoipa::path(
    get,
    path = "/api/v1/trading-plans",
    tag = "trading-plans",
    responses(
        (status = 200, description = "Trading plans retrieved successfully", body = ApiResponse<Vec<TradingPlanResponse>>),
        (status = 401, description = "Missing or invalid token", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_trading_plans(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<Vec<TradingPlanResponse>>>, StatusCode> {
    trace!("Entering get_trading_plans function");

    match trading_plan::Entity::find()
        .filter(trading_plan::Column::OwnerId.eq(user.id))
        .all(&state.db)
        .await
    {
        Ok(plans) => {
            debug!("Retrieved {} trading plans for user {}", plans.len(), user.id);

            let plan_responses: Vec<TradingPlanResponse> =
                plans.into_iter().map(TradingPlanResponse::from).collect();

            let response = ApiResponse {
                data: plan_responses,
                message: "Trading plans retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!(
                "Failed to retrieve trading plans for user {}: {}",
                user.id, db_error
            );
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get a specific trading plan by ID
#[utoipa::path(
    get,
    path = "/api/v1/trading-plans/{plan_id}",
    tag = "trading-plans",
    params(
        ("plan_id" = i32, Path, description = "Trading plan ID"),
    ),
    responses(
        (status = 200, description = "Trading plan retrieved successfully", body = ApiResponse<TradingPlanResponse>),
        (status = 401, description = "Missing or invalid token", body = crate::schemas::ErrorResponse),
        (status = 404, description = "Trading plan not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_trading_plan(
    Path(plan_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<TradingPlanResponse>>, StatusCode> {
    trace!("Entering get_trading_plan function for plan_id: {}", plan_id);

    match trading_plan::Entity::find_by_id(plan_id)
        .filter(trading_plan::Column::OwnerId.eq(user.id))
        .one(&state.db)
        .await
    {
        Ok(Some(plan_model)) => {
            let response = ApiResponse {
                data: TradingPlanResponse::from(plan_model),
                message: "Trading plan retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!(
                "Trading plan with ID {} not found for user {}",
                plan_id, user.id
            );
            Err(StatusCode::NOT_FOUND)
        }
        Err(db_error) => {
            error!(
                "Failed to retrieve trading plan with ID {}: {}",
                plan_id, db_error
            );
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Update a trading plan (full-field overwrite)
#[utoipa::path(
    put,
    path = "/api/v1/trading-plans/{plan_id}",
    tag = "trading-plans",
    params(
        ("plan_id" = i32, Path, description = "Trading plan ID"),
    ),
    request_body = UpdateTradingPlanRequest,
    responses(
        (status = 200, description = "Trading plan updated successfully", body = ApiResponse<TradingPlanResponse>),
        (status = 401, description = "Missing or invalid token", body = crate::schemas::ErrorResponse),
        (status = 404, description = "Trading plan not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn update_trading_plan(
    Path(plan_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<UpdateTradingPlanRequest>,
) -> Result<Json<ApiResponse<TradingPlanResponse>>, StatusCode> {
    trace!("Entering update_trading_plan function for plan_id: {}", plan_id);

    let existing_plan = match trading_plan::Entity::find_by_id(plan_id)
        .filter(trading_plan::Column::OwnerId.eq(user.id))
        .one(&state.db)
        .await
    {
        Ok(Some(plan_model)) => plan_model,
        Ok(None) => {
            warn!(
                "Trading plan with ID {} not found for update by user {}",
                plan_id, user.id
            );
            return Err(StatusCode::NOT_FOUND);
        }
        Err(db_error) => {
            error!(
                "Failed to lookup trading plan with ID {} for update: {}",
                plan_id, db_error
            );
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    // Full overwrite: every field is replaced with the request's value
    let mut plan_active: trading_plan::ActiveModel = existing_plan.into();
    plan_active.day = Set(request.day);
    plan_active.account_balance = Set(request.account_balance);
    plan_active.daily_target = Set(request.daily_target);
    plan_active.required_lots = Set(request.required_lots);
    plan_active.rounded_lots = Set(request.rounded_lots);
    plan_active.risk_amount = Set(request.risk_amount);
    plan_active.risk_percentage = Set(request.risk_percentage);
    plan_active.sl_pips = Set(request.sl_pips);
    plan_active.tp_pips = Set(request.tp_pips);
    plan_active.status = Set(request.status);
    plan_active.reason = Set(request.reason);
    plan_active.plan_date = Set(request.plan_date);

    match plan_active.update(&state.db).await {
        Ok(updated_plan) => {
            info!("Trading plan with ID {} updated successfully", plan_id);
            let response = ApiResponse {
                data: TradingPlanResponse::from(updated_plan),
                message: "Trading plan updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!(
                "Failed to update trading plan with ID {}: {}",
                plan_id, db_error
            );
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Delete a trading plan
#[utoipa::path(
    delete,
    path = "/api/v1/trading-plans/{plan_id}",
    tag = "trading-plans",
    params(
        ("plan_id" = i32, Path, description = "Trading plan ID"),
    ),
    responses(
        (status = 204, description = "Trading plan deleted successfully"),
        (status = 401, description = "Missing or invalid token", body = crate::schemas::ErrorResponse),
        (status = 404, description = "Trading plan not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_trading_plan(
    Path(plan_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<StatusCode, StatusCode> {
    trace!("Entering delete_trading_plan function for plan_id: {}", plan_id);

    match trading_plan::Entity::delete_many()
        .filter(trading_plan::Column::Id.eq(plan_id))
        .filter(trading_plan::Column::OwnerId.eq(user.id))
        .exec(&state.db)
        .await
    {
        Ok(delete_result) => {
            if delete_result.rows_affected > 0 {
                info!("Trading plan with ID {} deleted successfully", plan_id);
                Ok(StatusCode::NO_CONTENT)
            } else {
                warn!(
                    "Trading plan with ID {} not found for deletion by user {}",
                    plan_id, user.id
                );
                Err(StatusCode::NOT_FOUND)
            }
        }
        Err(db_error) => {
            error!(
                "Failed to delete trading plan with ID {}: {}",
                plan_id, db_error
            );
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Toggle a trading plan between pending and done
#[utoipa::path(
    patch,
    path = "/api/v1/trading-plans/{plan_id}/toggle-status",
    tag = "trading-plans",
    params(
        ("plan_id" = i32, Path, description = "Trading plan ID"),
    ),
    responses(
        (status = 200, description = "Status toggled successfully", body = ApiResponse<TradingPlanResponse>),
        (status = 401, description = "Missing or invalid token", body = crate::schemas::ErrorResponse),
        (status = 404, description = "Trading plan not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn toggle_plan_status(
    Path(plan_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<TradingPlanResponse>>, StatusCode> {
    trace!("Entering toggle_plan_status function for plan_id: {}", plan_id);

    let existing_plan = match trading_plan::Entity::find_by_id(plan_id)
        .filter(trading_plan::Column::OwnerId.eq(user.id))
        .one(&state.db)
        .await
    {
        Ok(Some(plan_model)) => plan_model,
        Ok(None) => {
            warn!(
                "Trading plan with ID {} not found for toggle by user {}",
                plan_id, user.id
            );
            return Err(StatusCode::NOT_FOUND);
        }
        Err(db_error) => {
            error!(
                "Failed to lookup trading plan with ID {} for toggle: {}",
                plan_id, db_error
            );
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let toggled = !existing_plan.status;
    let mut plan_active: trading_plan::ActiveModel = existing_plan.into();
    plan_active.status = Set(toggled);

    match plan_active.update(&state.db).await {
        Ok(updated_plan) => {
            info!(
                "Trading plan with ID {} toggled to {}",
                plan_id,
                if updated_plan.status { "done" } else { "pending" }
            );
            let response = ApiResponse {
                data: TradingPlanResponse::from(updated_plan),
                message: "Trading plan status toggled successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!(
                "Failed to toggle trading plan with ID {}: {}",
                plan_id, db_error
            );
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
