//! Daily book entries and the account-balance consistency rule.
//!
//! Creating an entry stamps the owning account's current balance into
//! `starting_balance` and then overwrites the account's balance with the
//! entry's `ending_balance`. Updates re-propagate when the ending balance or
//! the referenced account changes. Each book write and its paired account
//! write happen inside one database transaction.

use crate::auth::CurrentUser;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use model::entities::trading_daily_book::TradingResult;
use model::entities::{account, trading_daily_book};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

/// Request body for creating a new daily book entry.
///
/// There is no `starting_balance` field: it is always stamped on the server
/// from the account's balance at creation time.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateTradingDailyBookRequest {
    /// Account the entry settles against
    pub account_id: i32,
    pub date: NaiveDate,
    pub ending_balance: f64,
    /// Amount withdrawn that day (default: 0)
    pub withdraw: Option<f64>,
    pub sentiment: Option<String>,
    pub summary: Option<String>,
    /// Overall outcome (default: "No Result")
    pub result: Option<TradingResult>,
    pub remarks: Option<String>,
}

/// Request body for updating a daily book entry.
///
/// Book updates are merge-patch: only supplied fields are applied.
/// (Account and plan updates are full overwrites; the two contracts are
/// intentionally different.)
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateTradingDailyBookRequest {
    pub date: Option<NaiveDate>,
    pub account_id: Option<i32>,
    pub ending_balance: Option<f64>,
    pub withdraw: Option<f64>,
    pub sentiment: Option<String>,
    pub summary: Option<String>,
    pub result: Option<TradingResult>,
    pub remarks: Option<String>,
}

/// Daily book entry response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TradingDailyBookResponse {
    pub id: i32,
    pub date: NaiveDate,
    pub starting_balance: f64,
    pub ending_balance: f64,
    pub sentiment: Option<String>,
    pub withdraw: f64,
    pub summary: Option<String>,
    pub result: TradingResult,
    pub remarks: Option<String>,
    pub account_id: i32,
    pub owner_id: i32,
}

impl From<trading_daily_book::Model> for TradingDailyBookResponse {
    fn from(model: trading_daily_book::Model) -> Self {
        Self {
            id: model.id,
            date: model.date,
            starting_balance: model.starting_balance,
            ending_balance: model.ending_balance,
            sentiment: model.sentiment,
            withdraw: model.withdraw,
            summary: model.summary,
            result: model.result,
            remarks: model.remarks,
            account_id: model.account_id,
            owner_id: model.owner_id,
        }
    }
}

/// Lightweight account projection for the entry form's dropdown
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountWithBalance {
    pub id: i32,
    pub name: String,
    pub balance: f64,
}

impl From<account::Model> for AccountWithBalance {
    fn from(model: account::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            balance: model.balance,
        }
    }
}

fn error_body(status: StatusCode, message: &str, code: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
            code: code.to_string(),
            success: false,
        }),
    )
}

fn database_error(context: &str) -> (StatusCode, Json<ErrorResponse>) {
    error_body(
        StatusCode::INTERNAL_SERVER_ERROR,
        context,
        "DATABASE_ERROR",
    )
}

/// Get all daily book entries owned by the current user, newest date first
#[utoipa::path(
    get,
    path = "/api/v1/trading-daily-books",
    tag = "trading-daily-books",
    responses(
        (status = 200, description = "Daily book entries retrieved successfully", body = ApiResponse<Vec<TradingDailyBookResponse>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_trading_daily_books(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<Vec<TradingDailyBookResponse>>>, StatusCode> {
    trace!("Entering get_trading_daily_books function");

    match trading_daily_book::Entity::find()
        .filter(trading_daily_book::Column::OwnerId.eq(user.id))
        .order_by_desc(trading_daily_book::Column::Date)
        .all(&state.db)
        .await
    {
        Ok(books) => {
            debug!("Retrieved {} book entries for user {}", books.len(), user.id);

            let book_responses: Vec<TradingDailyBookResponse> = books
                .into_iter()
                .map(TradingDailyBookResponse::from)
                .collect();

            let response = ApiResponse {
                data: book_responses,
                message: "Daily book entries retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!(
                "Failed to retrieve book entries for user {}: {}",
                user.id, db_error
            );
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get the current user's accounts with their balances, for entry creation
#[utoipa::path(
    get,
    path = "/api/v1/trading-daily-books/accounts",
    tag = "trading-daily-books",
    responses(
        (status = 200, description = "Accounts retrieved successfully", body = ApiResponse<Vec<AccountWithBalance>>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_accounts_with_balance(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<Vec<AccountWithBalance>>>, StatusCode> {
    trace!("Entering get_accounts_with_balance function");

    match account::Entity::find()
        .filter(account::Column::OwnerId.eq(user.id))
        .all(&state.db)
        .await
    {
        Ok(accounts) => {
            let account_responses: Vec<AccountWithBalance> =
                accounts.into_iter().map(AccountWithBalance::from).collect();

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

/// Get a specific daily book entry by ID
#[utoipa::path(
    get,
    path = "/api/v1/trading-daily-books/{book_id}",
    tag = "trading-daily-books",
    params(
        ("book_id" = i32, Path, description = "Daily book entry ID"),
    ),
    responses(
        (status = 200, description = "Daily book entry retrieved successfully", body = ApiResponse<TradingDailyBookResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Daily book entry not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_trading_daily_book(
    Path(book_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ApiResponse<TradingDailyBookResponse>>, StatusCode> {
    trace!("Entering get_trading_daily_book function for book_id: {}", book_id);

    match trading_daily_book::Entity::find_by_id(book_id)
        .filter(trading_daily_book::Column::OwnerId.eq(user.id))
        .one(&state.db)
        .await
    {
        Ok(Some(book_model)) => {
            let response = ApiResponse {
                data: TradingDailyBookResponse::from(book_model),
                message: "Daily book entry retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!(
                "Daily book entry with ID {} not found for user {}",
                book_id, user.id
            );
            Err(StatusCode::NOT_FOUND)
        }
        Err(db_error) => {
            error!(
                "Failed to retrieve daily book entry with ID {}: {}",
                book_id, db_error
            );
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Create a new daily book entry and propagate its ending balance
///
/// The entry's `starting_balance` is stamped from the account's balance, then
/// the account's balance is overwritten with the entry's `ending_balance`.
/// Both writes commit together or not at all.
#[utoipa::path(
    post,
    path = "/api/v1/trading-daily-books",
    tag = "trading-daily-books",
    request_body = CreateTradingDailyBookRequest,
    responses(
        (status = 201, description = "Daily book entry created successfully", body = ApiResponse<TradingDailyBookResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Account not found or not owned by the caller", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_trading_daily_book(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateTradingDailyBookRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TradingDailyBookResponse>>), (StatusCode, Json<ErrorResponse>)>
{
    trace!("Entering create_trading_daily_book function");
    debug!(
        "Creating book entry for account {} by user {}",
        request.account_id, user.id
    );

    // Verify the account exists and belongs to the caller
    let target_account = match account::Entity::find_by_id(request.account_id)
        .filter(account::Column::OwnerId.eq(user.id))
        .one(&state.db)
        .await
    {
        Ok(Some(account_model)) => account_model,
        Ok(None) => {
            warn!(
                "Account {} not found or not owned by user {}",
                request.account_id, user.id
            );
            return Err(error_body(
                StatusCode::NOT_FOUND,
                "Account not found or does not belong to you",
                "ACCOUNT_NOT_FOUND",
            ));
        }
        Err(db_error) => {
            error!(
                "Failed to lookup account {} for book creation: {}",
                request.account_id, db_error
            );
            return Err(database_error("Failed to create daily book entry"));
        }
    };

    let txn = match state.db.begin().await {
        Ok(txn) => txn,
        Err(db_error) => {
            error!("Failed to open transaction: {}", db_error);
            return Err(database_error("Failed to create daily book entry"));
        }
    };

    // Starting balance comes from the account, never from the client
    let new_book = trading_daily_book::ActiveModel {
        date: Set(request.date),
        starting_balance: Set(target_account.balance),
        ending_balance: Set(request.ending_balance),
        sentiment: Set(request.sentiment.clone()),
        withdraw: Set(request.withdraw.unwrap_or(0.0)),
        summary: Set(request.summary.clone()),
        result: Set(request.result.unwrap_or_default()),
        remarks: Set(request.remarks.clone()),
        account_id: Set(target_account.id),
        owner_id: Set(user.id),
        ..Default::default()
    };

    let book_model = match new_book.insert(&txn).await {
        Ok(book_model) => book_model,
        Err(db_error) => {
            error!("Failed to insert daily book entry: {}", db_error);
            return Err(database_error("Failed to create daily book entry"));
        }
    };

    // The account's balance now mirrors the entry's ending balance
    let mut account_active: account::ActiveModel = target_account.into();
    account_active.balance = Set(request.ending_balance);
    if let Err(db_error) = account_active.update(&txn).await {
        error!(
            "Failed to propagate balance to account {}: {}",
            book_model.account_id, db_error
        );
        return Err(database_error("Failed to create daily book entry"));
    }

    if let Err(db_error) = txn.commit().await {
        error!("Failed to commit book creation: {}", db_error);
        return Err(database_error("Failed to create daily book entry"));
    }

    info!(
        "Daily book entry created with ID: {} (starting {}, ending {})",
        book_model.id, book_model.starting_balance, book_model.ending_balance
    );
    let response = ApiResponse {
        data: TradingDailyBookResponse::from(book_model),
        message: "Daily book entry created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Update a daily book entry (merge-patch) and re-propagate if needed
///
/// `starting_balance` is never recomputed on update. If the ending balance or
/// the referenced account changes, the account now referenced by the entry
/// receives the entry's ending balance; when the entry moves between
/// accounts, the previously referenced account is left untouched.
#[utoipa::path(
    put,
    path = "/api/v1/trading-daily-books/{book_id}",
    tag = "trading-daily-books",
    params(
        ("book_id" = i32, Path, description = "Daily book entry ID"),
    ),
    request_body = UpdateTradingDailyBookRequest,
    responses(
        (status = 200, description = "Daily book entry updated successfully", body = ApiResponse<TradingDailyBookResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Entry or account not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn update_trading_daily_book(
    Path(book_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<UpdateTradingDailyBookRequest>,
) -> Result<Json<ApiResponse<TradingDailyBookResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering update_trading_daily_book function for book_id: {}", book_id);

    let existing_book = match trading_daily_book::Entity::find_by_id(book_id)
        .filter(trading_daily_book::Column::OwnerId.eq(user.id))
        .one(&state.db)
        .await
    {
        Ok(Some(book_model)) => book_model,
        Ok(None) => {
            warn!(
                "Daily book entry with ID {} not found for update by user {}",
                book_id, user.id
            );
            return Err(error_body(
                StatusCode::NOT_FOUND,
                "Daily book entry not found",
                "BOOK_NOT_FOUND",
            ));
        }
        Err(db_error) => {
            error!(
                "Failed to lookup daily book entry with ID {} for update: {}",
                book_id, db_error
            );
            return Err(database_error("Failed to update daily book entry"));
        }
    };

    let new_account_target = request
        .account_id
        .filter(|id| *id != existing_book.account_id);
    let account_changing = new_account_target.is_some();
    let balance_changing =
        matches!(request.ending_balance, Some(b) if b != existing_book.ending_balance);

    // When moving the entry, the destination account must also belong to the caller
    if let Some(new_account_id) = new_account_target {
        match account::Entity::find_by_id(new_account_id)
            .filter(account::Column::OwnerId.eq(user.id))
            .one(&state.db)
            .await
        {
            Ok(Some(_)) => {}
            Ok(None) => {
                warn!(
                    "New account {} not found or not owned by user {}",
                    new_account_id, user.id
                );
                return Err(error_body(
                    StatusCode::NOT_FOUND,
                    "New account not found or does not belong to you",
                    "ACCOUNT_NOT_FOUND",
                ));
            }
            Err(db_error) => {
                error!(
                    "Failed to lookup new account {} for book update: {}",
                    new_account_id, db_error
                );
                return Err(database_error("Failed to update daily book entry"));
            }
        }
    }

    let txn = match state.db.begin().await {
        Ok(txn) => txn,
        Err(db_error) => {
            error!("Failed to open transaction: {}", db_error);
            return Err(database_error("Failed to update daily book entry"));
        }
    };

    // Apply only the supplied fields; starting_balance is never recomputed
    let mut book_active: trading_daily_book::ActiveModel = existing_book.into();
    if let Some(date) = request.date {
        book_active.date = Set(date);
    }
    if let Some(account_id) = request.account_id {
        book_active.account_id = Set(account_id);
    }
    if let Some(ending_balance) = request.ending_balance {
        book_active.ending_balance = Set(ending_balance);
    }
    if let Some(withdraw) = request.withdraw {
        book_active.withdraw = Set(withdraw);
    }
    if let Some(sentiment) = request.sentiment {
        book_active.sentiment = Set(Some(sentiment));
    }
    if let Some(summary) = request.summary {
        book_active.summary = Set(Some(summary));
    }
    if let Some(result) = request.result {
        book_active.result = Set(result);
    }
    if let Some(remarks) = request.remarks {
        book_active.remarks = Set(Some(remarks));
    }

    let updated_book = match book_active.update(&txn).await {
        Ok(book_model) => book_model,
        Err(db_error) => {
            error!(
                "Failed to update daily book entry with ID {}: {}",
                book_id, db_error
            );
            return Err(database_error("Failed to update daily book entry"));
        }
    };

    // Re-propagate to whichever account the entry now references
    if balance_changing || account_changing {
        match account::Entity::find_by_id(updated_book.account_id)
            .one(&txn)
            .await
        {
            Ok(Some(account_model)) => {
                let mut account_active: account::ActiveModel = account_model.into();
                account_active.balance = Set(updated_book.ending_balance);
                if let Err(db_error) = account_active.update(&txn).await {
                    error!(
                        "Failed to propagate balance to account {}: {}",
                        updated_book.account_id, db_error
                    );
                    return Err(database_error("Failed to update daily book entry"));
                }
            }
            Ok(None) => {
                // The referenced account vanished between the ownership check
                // and the propagation write; surface it on the referenced id.
                warn!(
                    "Account {} referenced by book {} no longer exists",
                    updated_book.account_id, book_id
                );
                return Err(error_body(
                    StatusCode::NOT_FOUND,
                    "Account not found or does not belong to you",
                    "ACCOUNT_NOT_FOUND",
                ));
            }
            Err(db_error) => {
                error!(
                    "Failed to load account {} for balance propagation: {}",
                    updated_book.account_id, db_error
                );
                return Err(database_error("Failed to update daily book entry"));
            }
        }
    }

    if let Err(db_error) = txn.commit().await {
        error!("Failed to commit book update: {}", db_error);
        return Err(database_error("Failed to update daily book entry"));
    }

    info!("Daily book entry with ID {} updated successfully", book_id);
    let response = ApiResponse {
        data: TradingDailyBookResponse::from(updated_book),
        message: "Daily book entry updated successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Delete a daily book entry
///
/// The associated account's balance is NOT reverted; the propagation side
/// effect has no undo.
#[utoipa::path(
    delete,
    path = "/api/v1/trading-daily-books/{book_id}",
    tag = "trading-daily-books",
    params(
        ("book_id" = i32, Path, description = "Daily book entry ID"),
    ),
    responses(
        (status = 204, description = "Daily book entry deleted successfully"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Daily book entry not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_trading_daily_book(
    Path(book_id): Path<i32>,
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<StatusCode, StatusCode> {
    trace!("Entering delete_trading_daily_book function for book_id: {}", book_id);

    match trading_daily_book::Entity::delete_many()
        .filter(trading_daily_book::Column::Id.eq(book_id))
        .filter(trading_daily_book::Column::OwnerId.eq(user.id))
        .exec(&state.db)
        .await
    {
        Ok(delete_result) => {
            if delete_result.rows_affected > 0 {
                info!("Daily book entry with ID {} deleted successfully", book_id);
                Ok(StatusCode::NO_CONTENT)
            } else {
                warn!(
                    "Daily book entry with ID {} not found for deletion by user {}",
                    book_id, user.id
                );
                Err(StatusCode::NOT_FOUND)
            }
        }
        Err(db_error) => {
            error!(
                "Failed to delete daily book entry with ID {}: {}",
                book_id, db_error
            );
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
