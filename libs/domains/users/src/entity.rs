use crate::models::{NewUser, Role, User};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

/// Sea-ORM Entity for the users table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone_number: String,
    pub role: Role,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// Rows written outside this service may lack updated_at
impl From<Model> for User {
    fn from(model: Model) -> Self {
        let created_at = model.created_at.into();
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            phone_number: model.phone_number,
            role: model.role,
            created_at,
            updated_at: model.updated_at.map(Into::into).unwrap_or(created_at),
        }
    }
}

impl From<NewUser> for ActiveModel {
    fn from(user: NewUser) -> Self {
        ActiveModel {
            id: NotSet,
            username: Set(user.username),
            email: Set(user.email),
            phone_number: Set(user.phone_number),
            role: Set(user.role),
            created_at: Set(user.created_at.into()),
            updated_at: Set(Some(user.updated_at.into())),
        }
    }
}

// created_at is left out so an update can never rewrite it
impl From<User> for ActiveModel {
    fn from(user: User) -> Self {
        ActiveModel {
            id: Set(user.id),
            username: Set(user.username),
            email: Set(user.email),
            phone_number: Set(user.phone_number),
            role: Set(user.role),
            created_at: NotSet,
            updated_at: Set(Some(user.updated_at.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_missing_updated_at_falls_back_to_created_at() {
        let created = Utc::now();
        let model = Model {
            id: 1,
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            phone_number: "+15550100".to_string(),
            role: Role::Manager,
            created_at: created.into(),
            updated_at: None,
        };

        let user: User = model.into();
        assert_eq!(user.updated_at, user.created_at);
        assert_eq!(user.role, Role::Manager);
    }

    #[test]
    fn test_update_active_model_leaves_created_at_unset() {
        let now = Utc::now();
        let user = User {
            id: 5,
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            phone_number: "+15550100".to_string(),
            role: Role::User,
            created_at: now - Duration::days(1),
            updated_at: now,
        };

        let active: ActiveModel = user.into();
        assert!(active.created_at.is_not_set());
        assert_eq!(active.id, Set(5));
    }
}
