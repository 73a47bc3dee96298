use chrono::{DateTime, Utc};

use crate::models::{CreateUser, NewUser, UpdateUser, User, UserResponse};

/// Build a record ready for insertion, stamped with `now` for both timestamps.
pub fn to_new_user(input: CreateUser, now: DateTime<Utc>) -> NewUser {
    NewUser {
        username: input.username,
        email: input.email,
        phone_number: input.phone_number,
        role: input.role,
        created_at: now,
        updated_at: now,
    }
}

/// Overwrite only the fields present in `update`. Timestamps are untouched.
pub fn apply_update(update: UpdateUser, mut user: User) -> User {
    if let Some(username) = update.username {
        user.username = username;
    }
    if let Some(email) = update.email {
        user.email = email;
    }
    if let Some(phone_number) = update.phone_number {
        user.phone_number = phone_number;
    }
    if let Some(role) = update.role {
        user.role = role;
    }
    user
}

pub fn to_response(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        phone_number: user.phone_number,
        role: user.role,
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

pub fn to_responses(users: Vec<User>) -> Vec<UserResponse> {
    users.into_iter().map(to_response).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn stored() -> User {
        let now = Utc::now();
        User {
            id: 7,
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            phone_number: "+15550100".to_string(),
            role: Role::User,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_to_new_user_stamps_both_timestamps() {
        let now = Utc::now();
        let new_user = to_new_user(
            CreateUser {
                username: "alice".to_string(),
                email: "a@x.com".to_string(),
                phone_number: "+15550100".to_string(),
                role: Role::Admin,
            },
            now,
        );
        assert_eq!(new_user.created_at, now);
        assert_eq!(new_user.updated_at, now);
        assert_eq!(new_user.role, Role::Admin);
    }

    #[test]
    fn test_apply_update_only_touches_present_fields() {
        let before = stored();
        let after = apply_update(
            UpdateUser {
                id: 7,
                email: Some("new@x.com".to_string()),
                ..Default::default()
            },
            before.clone(),
        );

        assert_eq!(after.email, "new@x.com");
        assert_eq!(
            User {
                email: before.email.clone(),
                ..after
            },
            before
        );
    }

    #[test]
    fn test_to_responses_preserves_order() {
        let users: Vec<User> = (1..=3).map(|id| User { id, ..stored() }).collect();
        let ids: Vec<i64> = to_responses(users).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
