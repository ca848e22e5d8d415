#[cfg(test)]
pub mod test_utils {
    use crate::auth::{hash_password, issue_token, AuthKeys};
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::http::{header::AUTHORIZATION, HeaderName, HeaderValue};
    use axum_test::TestServer;
    use migration::{Migrator, MigratorTrait};
    use model::entities::user;
    use sea_orm::{ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, Set};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    /// Password used for every user seeded through [`create_test_user`].
    pub const TEST_PASSWORD: &str = "correct-horse-battery";

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        // Cascade deletes depend on this pragma under SQLite
        db.execute_unprepared("PRAGMA foreign_keys = ON;")
            .await
            .expect("Failed to enable foreign keys");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Create AppState for testing
    pub async fn setup_test_app_state() -> AppState {
        let db = setup_test_db().await;
        let auth = AuthKeys::from_secret("test-secret");

        AppState { db, auth }
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is determined by the RUST_LOG environment variable,
    /// defaulting to WARN if not set.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr) // Output to stderr, which is captured by tests
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create an axum test server plus the state behind it
    pub async fn setup_test_server() -> (TestServer, AppState) {
        let _ = init_test_tracing();

        let state = setup_test_app_state().await;
        let server =
            TestServer::new(create_router(state.clone())).expect("Failed to build test server");
        (server, state)
    }

    /// Seed a user directly and mint a bearer token for them.
    ///
    /// Registration and login have their own dedicated tests; everything else
    /// uses this shortcut.
    pub async fn create_test_user(state: &AppState, username: &str) -> (user::Model, String) {
        let password_hash = hash_password(TEST_PASSWORD).expect("Failed to hash test password");

        let user_model = user::ActiveModel {
            username: Set(username.to_string()),
            email: Set(format!("{username}@example.com")),
            password_hash: Set(password_hash),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&state.db)
        .await
        .expect("Failed to create test user");

        let token = issue_token(user_model.id, &state.auth).expect("Failed to issue test token");
        (user_model, token)
    }

    /// Bearer header pair for a request
    pub fn auth_header(token: &str) -> (HeaderName, HeaderValue) {
        (
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).expect("Invalid token header"),
        )
    }
}
