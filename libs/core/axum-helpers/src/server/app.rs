use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use crate::middleware::{error_envelope, security_headers};
use axum::{Router, middleware};
use core_config::server::ServerConfig;
use std::io;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Combines domain routers with documentation and cross-cutting middleware.
///
/// Sets up:
/// - Swagger UI at `/swagger-ui`, document at `/api-docs/openapi.json`
/// - API routes nested under `/api`
/// - `NOT_FOUND` envelope fallback for unknown routes
/// - Request tracing, error envelope path stamping, security headers
///
/// Domain routers should already have their state applied. Health endpoints
/// are merged by the app with [`super::health_router`].
///
/// # Example
/// ```ignore
/// use axum_helpers::server::create_router;
///
/// let router = create_router::<ApiDoc>(
///     Router::new().nest("/v1/users", domain_users::handlers::router(service)),
/// );
/// ```
pub fn create_router<T>(apis: Router) -> Router
where
    T: OpenApi + 'static,
{
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .nest("/api", apis)
        .fallback(not_found)
        .layer(middleware::from_fn(error_envelope))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
}

/// Server with coordinated shutdown and bounded cleanup.
///
/// After a shutdown signal the server stops accepting connections, drains
/// in-flight requests, then runs `cleanup` (e.g. closing the database pool)
/// for at most `server_config.shutdown_timeout`.
///
/// # Example
/// ```ignore
/// let cleanup = async move {
///     db.close().await.ok();
/// };
///
/// create_production_app(router, &config.server, cleanup).await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    cleanup: F,
) -> io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let (coordinator, mut shutdown_rx) = ShutdownCoordinator::new();
    let shutdown_timeout = server_config.shutdown_timeout;

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let cleanup_handle = tokio::spawn(async move {
        let _ = shutdown_rx.recv().await;

        info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
        match tokio::time::timeout(shutdown_timeout, cleanup).await {
            Ok(_) => info!("Cleanup completed successfully"),
            Err(_) => {
                tracing::warn!(
                    "Cleanup exceeded timeout of {:?}, forcing shutdown",
                    shutdown_timeout
                );
            }
        }
    });

    let signal = coordinator.clone();
    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { signal.wait_for_signal().await })
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        });

    // Also reached when serve fails, cleanup still has to run
    coordinator.shutdown();
    cleanup_handle.await.ok();

    serve_result
}
