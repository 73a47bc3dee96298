//! # Axum Helpers
//!
//! Shared HTTP plumbing for the users service.
//!
//! ## Modules
//!
//! - **[`errors`]**: `AppError`, error codes and the JSON error envelope
//! - **[`extractors`]**: JSON, id path and query extractors with enveloped rejections
//! - **[`middleware`]**: Security headers, error envelope path stamping
//! - **[`server`]**: Router assembly, health checks, graceful shutdown
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_production_app, create_router};
//! use core_config::server::ServerConfig;
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let api_routes = Router::new(); // Add your routes
//!     let router = create_router::<ApiDoc>(api_routes);
//!
//!     create_production_app(router, &ServerConfig::default(), async {}).await
//! }
//! ```

pub mod errors;
pub mod extractors;
pub mod middleware;
pub mod server;

// Re-export server types
pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks,
};

// Re-export HTTP middleware
pub use middleware::{error_envelope, security_headers};

// Re-export error types
pub use errors::{AppError, ErrorCode, ErrorResponse, FieldViolations};

// Re-export extractors
pub use extractors::{ApiJson, ApiQuery, IdPath};
