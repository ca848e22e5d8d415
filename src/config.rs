use crate::auth::AuthKeys;
use crate::schemas::AppState;
use anyhow::Result;
use sea_orm::Database;

/// Build the shared application state: database connection plus token keys.
///
/// `JWT_SECRET` comes from the environment (or `.env` via dotenvy); the
/// fallback is only meant for local development.
pub async fn initialize_app_state(database_url: &str) -> Result<AppState> {
    tracing::info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;

    let jwt_secret = std::env::var("JWT_SECRET")
        .unwrap_or_else(|_| "tradebook-dev-secret-change-in-production".to_string());
    let auth = AuthKeys::from_secret(&jwt_secret);

    Ok(AppState { db, auth })
}
