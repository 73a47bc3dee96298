//! Users Domain
//!
//! User management: create, fetch, list in pages, partially update and
//! delete users, with globally unique emails.
//!
//! # Features
//!
//! - User CRUD operations
//! - Field validation with per-field violation messages
//! - Paged, sortable listing
//! - Email uniqueness checked up front and backed by the store's unique index
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Business logic, validation, mapping
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Storage port (trait + in-memory and Postgres stores)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs, enums
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{
//!     handlers,
//!     repository::InMemoryUserRepository,
//!     service::UserService,
//! };
//!
//! // Create repository and service
//! let repository = InMemoryUserRepository::new();
//! let service = UserService::new(repository);
//!
//! // Create Axum router
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod mapper;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod validation;

// Re-export commonly used types
pub use error::{UserError, UserResult};
pub use models::{
    CreateUserRequest, ListUsersQuery, PagedResult, Role, UpdateUserRequest, User, UserResponse,
};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, StorageError, UserRepository};
pub use service::UserService;
