use crate::auth::AuthKeys;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Token signing/verification keys
    pub auth: AuthKeys,
}

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::users::get_me,
        crate::handlers::accounts::create_account,
        crate::handlers::accounts::get_accounts,
        crate::handlers::accounts::get_account,
        crate::handlers::accounts::update_account,
        crate::handlers::accounts::delete_account,
        crate::handlers::trading_plans::create_trading_plan,
        crate::handlers::trading_plans::get_trading_plans,
        crate::handlers::trading_plans::get_trading_plan,
        crate::handlers::trading_plans::update_trading_plan,
        crate::handlers::trading_plans::delete_trading_plan,
        crate::handlers::trading_plans::toggle_plan_status,
        crate::handlers::trading_daily_books::create_trading_daily_book,
        crate::handlers::trading_daily_books::get_trading_daily_books,
        crate::handlers::trading_daily_books::get_accounts_with_balance,
        crate::handlers::trading_daily_books::get_trading_daily_book,
        crate::handlers::trading_daily_books::update_trading_daily_book,
        crate::handlers::trading_daily_books::delete_trading_daily_book,
    ),
    components(
        schemas(
            ApiResponse<crate::handlers::users::UserResponse>,
            ApiResponse<crate::handlers::auth::TokenResponse>,
            ApiResponse<crate::handlers::accounts::AccountResponse>,
            ApiResponse<Vec<crate::handlers::accounts::AccountResponse>>,
            ApiResponse<crate::handlers::trading_plans::TradingPlanResponse>,
            ApiResponse<Vec<crate::handlers::trading_plans::TradingPlanResponse>>,
            ApiResponse<crate::handlers::trading_daily_books::TradingDailyBookResponse>,
            ApiResponse<Vec<crate::handlers::trading_daily_books::TradingDailyBookResponse>>,
            ApiResponse<Vec<crate::handlers::trading_daily_books::AccountWithBalance>>,
            ErrorResponse,
            HealthResponse,
            crate::handlers::auth::RegisterRequest,
            crate::handlers::auth::LoginRequest,
            crate::handlers::auth::TokenResponse,
            crate::handlers::users::UserResponse,
            crate::handlers::accounts::CreateAccountRequest,
            crate::handlers::accounts::UpdateAccountRequest,
            crate::handlers::accounts::AccountResponse,
            crate::handlers::trading_plans::CreateTradingPlanRequest,
            crate::handlers::trading_plans::UpdateTradingPlanRequest,
            crate::handlers::trading_plans::TradingPlanResponse,
            crate::handlers::trading_daily_books::CreateTradingDailyBookRequest,
            crate::handlers::trading_daily_books::UpdateTradingDailyBookRequest,
            crate::handlers::trading_daily_books::TradingDailyBookResponse,
            crate::handlers::trading_daily_books::AccountWithBalance,
            model::entities::trading_daily_book::TradingResult,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration and login"),
        (name = "users", description = "Current user profile"),
        (name = "accounts", description = "Brokerage account management"),
        (name = "trading-plans", description = "Daily trading plan management"),
        (name = "trading-daily-books", description = "Daily trading result bookkeeping"),
    ),
    info(
        title = "Tradebook API",
        description = "Personal trading journal - accounts, daily plans, and daily result books",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
