use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use tracing::info;

mod api;
mod config;
mod openapi;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    database::postgres::run_migrations::<migration::Migrator>(&db, config.app.name)
        .await
        .map_err(|e| eyre::eyre!("Migrations failed: {}", e))?;

    // create_router adds docs/middleware to our composed routes
    let router = create_router::<openapi::ApiDoc>(api::routes(&db));

    // Merge health endpoints into the app
    // - /health: liveness check with app name/version
    // - /ready: readiness check with a real database ping
    let app = router
        .merge(health_router(config.app))
        .merge(api::ready_router(db.clone()));

    info!(
        app = config.app.name,
        version = config.app.version,
        address = %config.server.address(),
        "Starting users API"
    );

    create_production_app(app, &config.server, async move {
        info!("Shutting down: closing database connections");
        database::postgres::close(db).await;
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Users API shutdown complete");
    Ok(())
}
