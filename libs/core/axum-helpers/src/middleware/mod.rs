//! HTTP middleware.
//!
//! - [`security_headers`]: hardening headers on every response
//! - [`error_envelope`]: stamps the request path on error envelopes
//!
//! # Example
//!
//! ```ignore
//! use axum::middleware;
//! use axum_helpers::middleware::{error_envelope, security_headers};
//!
//! let app = Router::new()
//!     .layer(middleware::from_fn(error_envelope))
//!     .layer(middleware::from_fn(security_headers));
//! ```

pub mod envelope;
pub mod security;

pub use envelope::error_envelope;
pub use security::security_headers;
