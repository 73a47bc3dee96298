//! Readiness check backed by a real database ping.

use axum::{Router, extract::State, response::Response, routing::get};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use database::postgres::{DatabaseConnection, check_health};

/// Readiness check endpoint that actually checks the database connection.
pub async fn ready_handler(State(db): State<DatabaseConnection>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "database",
        Box::pin(async {
            check_health(&db)
                .await
                .map_err(|e| format!("Database ping failed: {}", e))
        }),
    )];

    run_health_checks(checks).await
}

pub fn ready_router(db: DatabaseConnection) -> Router {
    Router::new()
        .route("/ready", get(ready_handler))
        .with_state(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use database::postgres::DbErr;
    use http_body_util::BodyExt;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use tower::ServiceExt;

    async fn ready(db: DatabaseConnection) -> (StatusCode, serde_json::Value) {
        let response = ready_router(db)
            .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_ready_when_database_fails() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection refused".to_string())])
            .into_connection();

        let (status, body) = ready(db).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "not ready");
        assert_eq!(body["database"], "disconnected");
    }
}
