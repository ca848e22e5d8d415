use crate::auth::CurrentUser;
use crate::schemas::{ApiResponse, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use model::entities::account;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

/// Request body for creating a new account
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateAccountRequest {
    /// Account name
    pub name: String,
    /// What the account is used for
    pub purpose: String,
    /// Broker or prop firm holding the account
    pub broker: String,
    /// Initial balance
    pub balance: f64,
}

/// Request body for updating an account.
///
/// Account updates are a full-field overwrite: every field must be supplied.
/// (Daily book updates are merge-patch; the two contracts are intentionally
/// different.)
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateAccountRequest {
    pub name: String,
    pub purpose: String,
    pub broker: String,
    pub balance: f64,
}

/// Account response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    pub id: i32,
    pub name: String,
    pub purpose: String,
    pub broker: String,
    pub balance: f64,
    pub owner_id: i32,
}

impl From<account::Model> for AccountResponse {
    fn from(model: account::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            purpose: model.purpose,
            broker: model.broker,
            balance: model.balance,
            owner_id: model.owner_id,
        }
    }
}

/// Create a new account owned by the current user
#[utoipa::path(
    post,
    path = "/api/v1/accounts",
    tag = "accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created successfully", body = ApiResponse<AccountResponse>),
        (status = 401, description = "Missing or invalid token", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn create_account(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AccountResponse>>), StatusCode> {
    trace!("Entering create_account function");
    debug!(
        "Creating account with name: {}, broker: {}, owner: {}",
        request.name, request.broker, user.id
    );

    let new_account = account::ActiveModel {
        name: Set(request.name.clone()),
        purpose: Set(request.purpose.clone()),
        broker: Set(request.broker.clone()),
        balance: Set(request.balance),
        owner_id: Set(user.id),
        ..Default::default()
    };

    match new_account.insert(&state.db).await {
        Ok(account_model) => {
            info!(
                "Account created successfully with ID: {}, name: {}",
                account_model.id, account_model.name
            );
            let response = ApiResponse {
                data: AccountResponse::from(account_model),
                message: "Account created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(db_error) => {
            error!(
                "Failed to create account '{}' for owner {}: {}",
                request.name, user.id, db_error
            );
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get all accounts owned by the current user
#[utoipa::path(
    get,
    path = "/api/v1/accounts",
    tag = "accounts",
    responses(
        (status = 200, description = "Accounts retrieved successfully", body = ApiResponse<Vec<AccountResponse>>),
        (status = 401, description = "Missing or invalid token", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_accounts(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<Vec<AccountResponse>>>, StatusCode> {
    trace!("Entering get_accounts function");

    match account::Entity::find()
        .filter(account::Column::OwnerId.eq(user.id))
        .all(&state.db)
        .await
    {
        Ok(accounts) => {
            debug!("Retrieved {} accounts for user {}", accounts.len(), user.id);

            let account_responses: Vec<AccountResponse> =
                accounts.into_iter().map(AccountResponse::from).collect();

            let response = ApiResponse {
                data: account_responses,
                message: "Accounts retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!(
                "Failed to retrieve accounts for user {}: {}",
                user.id, db_error
            );
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get a specific account by ID
#[utoipa::path(
    get,
    path = "/api/v1/accounts/{account_id}",
    tag = "accounts",
    params(
        ("account_id" = i32, Path, description = "Account ID"),
    ),
    responses(
        (status = 200, description = "Account retrieved successfully", body = ApiResponse<AccountResponse>),
        (status = 401, description = "Missing or invalid token", body = crate::schemas::ErrorResponse),
        (status = 404, description = "Account not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_account(
    Path(account_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<AccountResponse>>, StatusCode> {
    trace!("Entering get_account function for account_id: {}", account_id);

    // Absent and not-owned are deliberately the same 404
    match account::Entity::find_by_id(account_id)
        .filter(account::Column::OwnerId.eq(user.id))
        .one(&state.db)
        .await
    {
        Ok(Some(account_model)) => {
            let response = ApiResponse {
                data: AccountResponse::from(account_model),
                message: "Account retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!(
                "Account with ID {} not found for user {}",
                account_id, user.id
            );
            Err(StatusCode::NOT_FOUND)
        }
        Err(db_error) => {
            error!(
                "Failed to retrieve account with ID {}: {}",
                account_id, db_error
            );
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Update an account (full-field overwrite)
#[utoipa::path(
    put,
    path = "/api/v1/accounts/{account_id}",
    tag = "accounts",
    params(
        ("account_id" = i32, Path, description = "Account ID"),
    ),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Account updated successfully", body = ApiResponse<AccountResponse>),
        (status = 401, description = "Missing or invalid token", body = crate::schemas::ErrorResponse),
        (status = 404, description = "Account not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn update_account(
    Path(account_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<UpdateAccountRequest>,
) -> Result<Json<ApiResponse<AccountResponse>>, StatusCode> {
    trace!("Entering update_account function for account_id: {}", account_id);

    let existing_account = match account::Entity::find_by_id(account_id)
        .filter(account::Column::OwnerId.eq(user.id))
        .one(&state.db)
        .await
    {
        Ok(Some(account_model)) => account_model,
        Ok(None) => {
            warn!(
                "Account with ID {} not found for update by user {}",
                account_id, user.id
            );
            return Err(StatusCode::NOT_FOUND);
        }
        Err(db_error) => {
            error!(
                "Failed to lookup account with ID {} for update: {}",
                account_id, db_error
            );
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    // Full overwrite: every field is replaced with the request's value
    let mut account_active: account::ActiveModel = existing_account.into();
    account_active.name = Set(request.name);
    account_active.purpose = Set(request.purpose);
    account_active.broker = Set(request.broker);
    account_active.balance = Set(request.balance);

    match account_active.update(&state.db).await {
        Ok(updated_account) => {
            info!("Account with ID {} updated successfully", account_id);
            let response = ApiResponse {
                data: AccountResponse::from(updated_account),
                message: "Account updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!(
                "Failed to update account with ID {}: {}",
                account_id, db_error
            );
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Delete an account and, through the FK cascade, its daily book entries
#[utoipa::path(
    delete,
    path = "/api/v1/accounts/{account_id}",
    tag = "accounts",
    params(
        ("account_id" = i32, Path, description = "Account ID"),
    ),
    responses(
        (status = 204, description = "Account deleted successfully"),
        (status = 401, description = "Missing or invalid token", body = crate::schemas::ErrorResponse),
        (status = 404, description = "Account not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_account(
    Path(account_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<StatusCode, StatusCode> {
    trace!("Entering delete_account function for account_id: {}", account_id);

    match account::Entity::delete_many()
        .filter(account::Column::Id.eq(account_id))
        .filter(account::Column::OwnerId.eq(user.id))
        .exec(&state.db)
        .await
    {
        Ok(delete_result) => {
            debug!(
                "Delete operation completed. Rows affected: {}",
                delete_result.rows_affected
            );
            if delete_result.rows_affected > 0 {
                info!("Account with ID {} deleted successfully", account_id);
                Ok(StatusCode::NO_CONTENT)
            } else {
                warn!(
                    "Account with ID {} not found for deletion by user {}",
                    account_id, user.id
                );
                Err(StatusCode::NOT_FOUND)
            }
        }
        Err(db_error) => {
            error!(
                "Failed to delete account with ID {}: {}",
                account_id, db_error
            );
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
