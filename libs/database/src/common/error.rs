/// Error type for connection management, health checks and migrations
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Error reported by SeaORM
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sea_orm::DbErr),

    /// Connection failed after retries
    #[error("Connection failed after {attempts} attempts: {message}")]
    ConnectionFailed { attempts: u32, message: String },

    /// Health check failed
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    /// Migration error
    #[error("Migration error: {0}")]
    MigrationError(String),
}

/// Result type alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;
