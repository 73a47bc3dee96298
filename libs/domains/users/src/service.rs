use chrono::{DateTime, Duration, Utc};
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{UserError, UserResult};
use crate::mapper;
use crate::models::{
    CreateUserRequest, ListUsersQuery, PageRequest, PagedResult, SortDirection, SortField,
    UpdateUserRequest, UserResponse,
};
use crate::repository::UserRepository;
use crate::validation;

/// Service layer for User business logic
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

/// Strictly after `previous`, even when the clock has not moved.
fn next_update_time(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new user with a unique email
    pub async fn create_user(&self, request: CreateUserRequest) -> UserResult<UserResponse> {
        tracing::info!(email = ?request.email, "Creating user");

        let result = self.try_create_user(request).await;
        match &result {
            Ok(user) => tracing::info!(user_id = user.id, email = %user.email, "Created user"),
            Err(e) => tracing::warn!(error = %e, "Failed to create user"),
        }
        result
    }

    async fn try_create_user(&self, request: CreateUserRequest) -> UserResult<UserResponse> {
        let input = validation::validate_create(request)?;

        if self.repository.exists_by_email(&input.email).await? {
            return Err(UserError::DuplicateEmail(input.email));
        }

        // The store's unique index still guards against a concurrent insert
        let email = input.email.clone();
        let user = self
            .repository
            .insert(mapper::to_new_user(input, Utc::now()))
            .await
            .map_err(|e| UserError::from_write(e, &email))?;

        Ok(mapper::to_response(user))
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: i64) -> UserResult<UserResponse> {
        tracing::debug!(user_id = id, "Fetching user");

        let user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
            .inspect_err(|e| tracing::info!(user_id = id, error = %e, "User lookup failed"))?;

        Ok(mapper::to_response(user))
    }

    /// List one page of users
    pub async fn list_users(
        &self,
        query: ListUsersQuery,
    ) -> UserResult<PagedResult<UserResponse>> {
        tracing::debug!(
            page = query.page,
            size = query.size,
            sort_by = %query.sort_by,
            sort_direction = %query.sort_direction,
            "Listing users"
        );

        let request = Self::page_request(&query)
            .inspect_err(|e| tracing::info!(error = %e, "Rejected list request"))?;

        let page = self
            .repository
            .find_all_paged(request)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to list users"))?;

        let result = PagedResult::new(
            mapper::to_responses(page.items),
            request.page,
            request.size,
            page.total,
        );

        tracing::debug!(
            returned = result.content.len(),
            total = result.total_elements,
            "Listed users"
        );
        Ok(result)
    }

    fn page_request(query: &ListUsersQuery) -> UserResult<PageRequest> {
        let page = u64::try_from(query.page).map_err(|_| {
            UserError::BadRequest(format!("Page number must not be negative: {}", query.page))
        })?;

        let size = u64::try_from(query.size)
            .ok()
            .filter(|size| *size >= 1)
            .ok_or_else(|| {
                UserError::BadRequest(format!("Page size must be at least 1: {}", query.size))
            })?;

        let sort_by = SortField::from_str(&query.sort_by).map_err(|_| {
            UserError::BadRequest(format!("Unknown sort field: {}", query.sort_by))
        })?;

        Ok(PageRequest {
            page,
            size,
            sort_by,
            direction: SortDirection::parse(&query.sort_direction),
        })
    }

    /// Update the supplied fields of an existing user
    pub async fn update_user(&self, request: UpdateUserRequest) -> UserResult<UserResponse> {
        tracing::info!(user_id = ?request.id, "Updating user");

        let result = self.try_update_user(request).await;
        match &result {
            Ok(user) => tracing::info!(user_id = user.id, "Updated user"),
            Err(e) => tracing::warn!(error = %e, "Failed to update user"),
        }
        result
    }

    async fn try_update_user(&self, request: UpdateUserRequest) -> UserResult<UserResponse> {
        let update = validation::validate_update(request)?;
        let id = update.id;

        let existing = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        // Check for duplicate email if email is being changed
        if let Some(email) = update.email.as_deref().filter(|e| *e != existing.email) {
            let owner = self.repository.find_by_email(email).await?;
            if owner.is_some_and(|other| other.id != id) {
                return Err(UserError::DuplicateEmail(email.to_string()));
            }
        }

        let previous = existing.updated_at;
        let mut user = mapper::apply_update(update, existing);
        user.updated_at = next_update_time(previous);

        let email = user.email.clone();
        let saved = self
            .repository
            .save(user)
            .await
            .map_err(|e| UserError::from_write(e, &email))?;

        Ok(mapper::to_response(saved))
    }

    /// Delete a user. Deleting an unknown id is not an error.
    pub async fn delete_user(&self, id: i64) -> UserResult<()> {
        tracing::info!(user_id = id, "Deleting user");

        let removed = self
            .repository
            .delete_by_id(id)
            .await
            .inspect_err(|e| tracing::error!(user_id = id, error = %e, "Failed to delete user"))?;

        tracing::info!(user_id = id, removed, "Deleted user");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewUser, Page, Role, User};
    use crate::repository::{MockUserRepository, StorageError};

    fn create_request(email: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: Some("alice".to_string()),
            email: Some(email.to_string()),
            phone_number: Some("+15550100".to_string()),
            role: Some(Role::User),
        }
    }

    fn stored(id: i64, email: &str) -> User {
        let now = Utc::now();
        User {
            id,
            username: "alice".to_string(),
            email: email.to_string(),
            phone_number: "+15550100".to_string(),
            role: Role::User,
            created_at: now,
            updated_at: now,
        }
    }

    fn from_new(id: i64, user: NewUser) -> User {
        User {
            id,
            username: user.username,
            email: user.email,
            phone_number: user.phone_number,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }

    #[tokio::test]
    async fn test_create_user_stamps_timestamps() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_exists_by_email()
            .withf(|email| email == "a@x.com")
            .returning(|_| Ok(false));
        mock_repo
            .expect_insert()
            .times(1)
            .returning(|user| Ok(from_new(1, user)));

        let service = UserService::new(mock_repo);
        let user = service.create_user(create_request("a@x.com")).await.unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.created_at, user.updated_at);
    }

    #[tokio::test]
    async fn test_create_user_duplicate_precheck_skips_insert() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_exists_by_email().returning(|_| Ok(true));
        mock_repo.expect_insert().never();

        let service = UserService::new(mock_repo);
        let err = service.create_user(create_request("a@x.com")).await.unwrap_err();

        assert!(matches!(err, UserError::DuplicateEmail(email) if email == "a@x.com"));
    }

    #[tokio::test]
    async fn test_create_user_unique_violation_is_duplicate_email() {
        // Another request inserted the same email between check and insert
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_exists_by_email().returning(|_| Ok(false));
        mock_repo
            .expect_insert()
            .returning(|_| Err(StorageError::UniqueViolation("users_email_key".to_string())));

        let service = UserService::new(mock_repo);
        let err = service.create_user(create_request("a@x.com")).await.unwrap_err();

        assert!(matches!(err, UserError::DuplicateEmail(_)));
    }

    #[tokio::test]
    async fn test_create_user_invalid_request_never_touches_storage() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_exists_by_email().never();
        mock_repo.expect_insert().never();

        let service = UserService::new(mock_repo);
        let err = service
            .create_user(create_request("not-an-email"))
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::Validation(v) if v.contains_key("email")));
    }

    #[tokio::test]
    async fn test_create_user_backend_failure_is_internal() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_exists_by_email()
            .returning(|_| Err(StorageError::Backend("pool timed out".to_string())));

        let service = UserService::new(mock_repo);
        let err = service.create_user(create_request("a@x.com")).await.unwrap_err();

        assert!(matches!(err, UserError::Internal(_)));
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_by_id()
            .with(mockall::predicate::eq(42))
            .returning(|_| Ok(None));

        let service = UserService::new(mock_repo);
        let err = service.get_user(42).await.unwrap_err();

        assert!(matches!(err, UserError::NotFound(42)));
    }

    #[tokio::test]
    async fn test_update_user_not_found() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_find_by_id().returning(|_| Ok(None));
        mock_repo.expect_save().never();

        let service = UserService::new(mock_repo);
        let err = service
            .update_user(UpdateUserRequest {
                id: Some(9),
                role: Some(Role::Admin),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::NotFound(9)));
    }

    #[tokio::test]
    async fn test_update_user_email_owned_by_other_user() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(stored(id, "a@x.com"))));
        mock_repo
            .expect_find_by_email()
            .withf(|email| email == "b@x.com")
            .returning(|email| Ok(Some(stored(2, email))));
        mock_repo.expect_save().never();

        let service = UserService::new(mock_repo);
        let err = service
            .update_user(UpdateUserRequest {
                id: Some(1),
                email: Some("b@x.com".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::DuplicateEmail(email) if email == "b@x.com"));
    }

    #[tokio::test]
    async fn test_update_user_same_email_skips_ownership_check() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(stored(id, "a@x.com"))));
        mock_repo.expect_find_by_email().never();
        mock_repo.expect_save().returning(Ok);

        let service = UserService::new(mock_repo);
        let user = service
            .update_user(UpdateUserRequest {
                id: Some(1),
                email: Some("a@x.com".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(user.updated_at > user.created_at);
    }

    #[tokio::test]
    async fn test_update_user_save_unique_violation() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(stored(id, "a@x.com"))));
        mock_repo.expect_find_by_email().returning(|_| Ok(None));
        mock_repo
            .expect_save()
            .returning(|_| Err(StorageError::UniqueViolation("users_email_key".to_string())));

        let service = UserService::new(mock_repo);
        let err = service
            .update_user(UpdateUserRequest {
                id: Some(1),
                email: Some("c@x.com".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::DuplicateEmail(email) if email == "c@x.com"));
    }

    #[tokio::test]
    async fn test_update_user_deleted_before_save_is_not_found() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(stored(id, "a@x.com"))));
        mock_repo
            .expect_save()
            .returning(|user| Err(StorageError::NotFound(user.id)));

        let service = UserService::new(mock_repo);
        let err = service
            .update_user(UpdateUserRequest {
                id: Some(4),
                role: Some(Role::Guest),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::NotFound(4)));
    }

    #[tokio::test]
    async fn test_delete_user_missing_id_succeeds() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_delete_by_id()
            .with(mockall::predicate::eq(77))
            .times(1)
            .returning(|_| Ok(false));

        let service = UserService::new(mock_repo);
        assert!(service.delete_user(77).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_users_rejects_bad_paging() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_find_all_paged().never();
        let service = UserService::new(mock_repo);

        for query in [
            ListUsersQuery {
                page: -1,
                ..Default::default()
            },
            ListUsersQuery {
                size: 0,
                ..Default::default()
            },
            ListUsersQuery {
                sort_by: "password".to_string(),
                ..Default::default()
            },
        ] {
            let err = service.list_users(query).await.unwrap_err();
            assert!(matches!(err, UserError::BadRequest(_)));
        }
    }

    #[tokio::test]
    async fn test_list_users_passes_sort_to_storage() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_find_all_paged()
            .with(mockall::predicate::eq(PageRequest {
                page: 2,
                size: 5,
                sort_by: SortField::CreatedAt,
                direction: SortDirection::Desc,
            }))
            .returning(|_| {
                Ok(Page {
                    items: vec![],
                    total: 11,
                })
            });

        let service = UserService::new(mock_repo);
        let page = service
            .list_users(ListUsersQuery {
                page: 2,
                size: 5,
                sort_by: "createdAt".to_string(),
                sort_direction: "Desc".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(page.total_pages, 3);
        assert!(page.last);
    }

    #[test]
    fn test_next_update_time_strictly_advances() {
        let future = Utc::now() + Duration::seconds(60);
        assert!(next_update_time(future) > future);
    }
}
