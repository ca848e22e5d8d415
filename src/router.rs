use crate::handlers::{
    accounts::{create_account, delete_account, get_account, get_accounts, update_account},
    auth::{login, register},
    health::health_check,
    trading_daily_books::{
        create_trading_daily_book, delete_trading_daily_book, get_accounts_with_balance,
        get_trading_daily_book, get_trading_daily_books, update_trading_daily_book,
    },
    trading_plans::{
        create_trading_plan, delete_trading_plan, get_trading_plan, get_trading_plans,
        toggle_plan_status, update_trading_plan,
    },
    users::get_me,
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Auth routes
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/login", post(login))
        // Current user profile
        .route("/api/v1/users/me", get(get_me))
        // Account CRUD routes
        .route("/api/v1/accounts", post(create_account))
        .route("/api/v1/accounts", get(get_accounts))
        .route("/api/v1/accounts/:account_id", get(get_account))
        .route("/api/v1/accounts/:account_id", put(update_account))
        .route("/api/v1/accounts/:account_id", delete(delete_account))
        // Trading plan CRUD routes
        .route("/api/v1/trading-plans", post(create_trading_plan))
        .route("/api/v1/trading-plans", get(get_trading_plans))
        .route("/api/v1/trading-plans/:plan_id", get(get_trading_plan))
        .route("/api/v1/trading-plans/:plan_id", put(update_trading_plan))
        .route("/api/v1/trading-plans/:plan_id", delete(delete_trading_plan))
        .route(
            "/api/v1/trading-plans/:plan_id/toggle-status",
            patch(toggle_plan_status),
        )
        // Trading daily book CRUD routes; the static /accounts route takes
        // precedence over the :book_id capture
        .route("/api/v1/trading-daily-books", post(create_trading_daily_book))
        .route("/api/v1/trading-daily-books", get(get_trading_daily_books))
        .route(
            "/api/v1/trading-daily-books/accounts",
            get(get_accounts_with_balance),
        )
        .route(
            "/api/v1/trading-daily-books/:book_id",
            get(get_trading_daily_book),
        )
        .route(
            "/api/v1/trading-daily-books/:book_id",
            put(update_trading_daily_book),
        )
        .route(
            "/api/v1/trading-daily-books/:book_id",
            delete(delete_trading_daily_book),
        )
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
