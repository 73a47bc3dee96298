use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::{NewUser, Page, PageRequest, SortDirection, SortField, User};

/// Failures reported by a user store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("No stored user with id {0}")]
    NotFound(i64),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Get a user by ID
    async fn find_by_id(&self, id: i64) -> StorageResult<Option<User>>;

    /// Get a user by exact email
    async fn find_by_email(&self, email: &str) -> StorageResult<Option<User>>;

    /// Check if an email already exists
    async fn exists_by_email(&self, email: &str) -> StorageResult<bool>;

    /// Store a new user and return it with its assigned id
    async fn insert(&self, user: NewUser) -> StorageResult<User>;

    /// Overwrite an existing user; `NotFound` if the row is gone
    async fn save(&self, user: User) -> StorageResult<User>;

    /// Delete a user by ID, returning whether a row was removed
    async fn delete_by_id(&self, id: i64) -> StorageResult<bool>;

    /// One sorted page plus the total number of users
    async fn find_all_paged(&self, request: PageRequest) -> StorageResult<Page<User>>;
}

#[derive(Debug)]
struct Store {
    users: BTreeMap<i64, User>,
    next_id: i64,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            users: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl Store {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

/// In-memory implementation of UserRepository (for development/testing)
///
/// Ids come from a counter that never goes backwards, so deleted ids are not
/// reused. Email uniqueness is enforced like a database unique index.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare(a: &User, b: &User, field: SortField) -> Ordering {
    match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::Username => a.username.cmp(&b.username),
        SortField::Email => a.email.cmp(&b.email),
        SortField::PhoneNumber => a.phone_number.cmp(&b.phone_number),
        SortField::Role => a.role.to_string().cmp(&b.role.to_string()),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> StorageResult<Option<User>> {
        let store = self.store.read().await;
        Ok(store.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        let store = self.store.read().await;
        Ok(store.users.values().find(|u| u.email == email).cloned())
    }

    async fn exists_by_email(&self, email: &str) -> StorageResult<bool> {
        let store = self.store.read().await;
        Ok(store.email_taken(email, None))
    }

    async fn insert(&self, user: NewUser) -> StorageResult<User> {
        let mut store = self.store.write().await;

        if store.email_taken(&user.email, None) {
            return Err(StorageError::UniqueViolation(format!(
                "email {} already stored",
                user.email
            )));
        }

        let id = store.next_id;
        store.next_id += 1;

        let user = User {
            id,
            username: user.username,
            email: user.email,
            phone_number: user.phone_number,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        };
        store.users.insert(id, user.clone());
        Ok(user)
    }

    async fn save(&self, user: User) -> StorageResult<User> {
        let mut store = self.store.write().await;

        if !store.users.contains_key(&user.id) {
            return Err(StorageError::NotFound(user.id));
        }
        if store.email_taken(&user.email, Some(user.id)) {
            return Err(StorageError::UniqueViolation(format!(
                "email {} already stored",
                user.email
            )));
        }

        store.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete_by_id(&self, id: i64) -> StorageResult<bool> {
        let mut store = self.store.write().await;
        Ok(store.users.remove(&id).is_some())
    }

    async fn find_all_paged(&self, request: PageRequest) -> StorageResult<Page<User>> {
        let store = self.store.read().await;

        let mut users: Vec<User> = store.users.values().cloned().collect();
        users.sort_by(|a, b| {
            let ordering = compare(a, b, request.sort_by);
            let ordering = match request.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            ordering.then_with(|| a.id.cmp(&b.id))
        });

        let total = users.len() as u64;
        let skip = request.page.saturating_mul(request.size);
        let items = users
            .into_iter()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(usize::try_from(request.size).unwrap_or(usize::MAX))
            .collect();

        Ok(Page { items, total })
    }
}
