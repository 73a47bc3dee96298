use async_trait::async_trait;
use sea_orm::sea_query::Order;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, SqlErr,
};

use crate::{
    entity,
    models::{NewUser, Page, PageRequest, SortDirection, SortField, User},
    repository::{StorageError, StorageResult, UserRepository},
};

/// PostgreSQL-backed user store
#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn storage_error(err: DbErr) -> StorageError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => StorageError::UniqueViolation(detail),
        _ => StorageError::Backend(format!("Database error: {}", err)),
    }
}

fn sort_column(field: SortField) -> entity::Column {
    match field {
        SortField::Id => entity::Column::Id,
        SortField::Username => entity::Column::Username,
        SortField::Email => entity::Column::Email,
        SortField::PhoneNumber => entity::Column::PhoneNumber,
        SortField::Role => entity::Column::Role,
        SortField::CreatedAt => entity::Column::CreatedAt,
        SortField::UpdatedAt => entity::Column::UpdatedAt,
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: i64) -> StorageResult<Option<User>> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(model.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        let model = entity::Entity::find()
            .filter(entity::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(model.map(Into::into))
    }

    async fn exists_by_email(&self, email: &str) -> StorageResult<bool> {
        let count = entity::Entity::find()
            .filter(entity::Column::Email.eq(email))
            .count(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(count > 0)
    }

    async fn insert(&self, user: NewUser) -> StorageResult<User> {
        let active_model: entity::ActiveModel = user.into();

        let model = active_model.insert(&self.db).await.map_err(storage_error)?;

        tracing::debug!(user_id = model.id, "Inserted user row");
        Ok(model.into())
    }

    async fn save(&self, user: User) -> StorageResult<User> {
        let id = user.id;
        let active_model: entity::ActiveModel = user.into();

        let model = active_model.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => StorageError::NotFound(id),
            e => storage_error(e),
        })?;

        tracing::debug!(user_id = model.id, "Updated user row");
        Ok(model.into())
    }

    async fn delete_by_id(&self, id: i64) -> StorageResult<bool> {
        let result = entity::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(result.rows_affected > 0)
    }

    async fn find_all_paged(&self, request: PageRequest) -> StorageResult<Page<User>> {
        let order = match request.direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        };

        let total = entity::Entity::find()
            .count(&self.db)
            .await
            .map_err(storage_error)?;

        // Pages starting at or past the last row, including offsets too large
        // for a bigint, are empty without asking the database
        let Some(offset) = request
            .page
            .checked_mul(request.size)
            .filter(|offset| *offset < total)
        else {
            return Ok(Page {
                items: Vec::new(),
                total,
            });
        };

        // Id as a tiebreak keeps page boundaries stable
        let models = entity::Entity::find()
            .order_by(sort_column(request.sort_by), order)
            .order_by_asc(entity::Column::Id)
            .limit(request.size)
            .offset(offset)
            .all(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(Page {
            items: models.into_iter().map(Into::into).collect(),
            total,
        })
    }
}
