//! Custom extractors for Axum handlers.
//!
//! Every rejection is rendered through [`crate::errors::AppError`] so that
//! malformed requests produce the same envelope as domain failures.

pub mod id_path;
pub mod json;
pub mod query;

pub use id_path::IdPath;
pub use json::ApiJson;
pub use query::ApiQuery;
