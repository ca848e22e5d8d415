use crate::config::initialize_app_state;
use crate::router::create_router;
use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use tokio::net::TcpListener;
use tracing::info;

/// Start the web server
pub async fn serve(database_url: &str, bind_address: &str) -> Result<()> {
    let state = initialize_app_state(database_url).await?;
    let app = create_router(state);

    info!("Starting server on {}", bind_address);
    let listener = TcpListener::bind(bind_address).await?;

    info!("Tradebook API server running on http://{}", bind_address);
    info!("Swagger UI available at http://{}/swagger-ui", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Apply all pending migrations to the given database
pub async fn init_database(database_url: &str) -> Result<()> {
    info!("Initializing database: {}", database_url);
    let db = Database::connect(database_url).await?;

    Migrator::up(&db, None).await?;

    info!("Database initialized successfully");
    Ok(())
}
