use axum::Router;
use database::postgres::DatabaseConnection;
use domain_users::{PgUserRepository, UserService, handlers};

pub mod health;

pub use health::ready_router;

/// Versioned API routes, nested under `/api` by `create_router`
pub fn routes(db: &DatabaseConnection) -> Router {
    let service = UserService::new(PgUserRepository::new(db.clone()));
    Router::new().nest("/v1/users", handlers::router(service))
}
