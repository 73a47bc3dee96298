use chrono::{DateTime, Utc};
use regex::Regex;
use sea_orm::sea_query::StringLen;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Phone numbers in E.164 shape, with an optional leading `+`.
///
/// ASCII digits only; `\d` would also admit other Unicode digit scripts.
pub(crate) static PHONE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9][0-9]{1,14}$").expect("phone number regex is valid"));

/// Rejects values made only of whitespace; `required` covers the absent case.
fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

/// User role, stored as its upper-case name
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    #[sea_orm(string_value = "MANAGER")]
    Manager,
    #[sea_orm(string_value = "USER")]
    User,
    #[sea_orm(string_value = "GUEST")]
    Guest,
}

/// Stored user record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user that has not been stored yet; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create request body
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// 2 to 50 characters
    #[validate(
        required(message = "User name is required"),
        custom(function = "not_blank", message = "User name is required"),
        length(min = 2, max = 50, message = "User name must be between 2 and 50 characters")
    )]
    #[schema(example = "jdoe")]
    pub username: Option<String>,

    #[validate(
        required(message = "Email is required"),
        custom(function = "not_blank", message = "Email is required"),
        email(message = "Email must be valid")
    )]
    #[schema(example = "jdoe@example.com")]
    pub email: Option<String>,

    #[validate(
        required(message = "Phone number is required"),
        custom(function = "not_blank", message = "Phone number is required"),
        regex(path = *PHONE_NUMBER, message = "Phone number must be valid")
    )]
    #[schema(example = "+14155550123")]
    pub phone_number: Option<String>,

    #[validate(required(message = "Role is required"))]
    pub role: Option<Role>,
}

/// Update request body. Only `id` is required; absent or blank fields keep
/// their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(required(message = "User ID is required"))]
    #[schema(example = 1)]
    pub id: Option<i64>,

    #[validate(length(
        min = 2,
        max = 50,
        message = "User name must be between 2 and 50 characters"
    ))]
    pub username: Option<String>,

    #[validate(email(message = "Email must be valid"))]
    pub email: Option<String>,

    #[validate(regex(path = *PHONE_NUMBER, message = "Phone number must be valid"))]
    pub phone_number: Option<String>,

    pub role: Option<Role>,
}

/// Accepted create request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub role: Role,
}

/// Accepted update request, blank fields already dropped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUser {
    pub id: i64,
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub role: Option<Role>,
}

/// User as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub content: Vec<T>,
    pub page_number: u64,
    pub page_size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
    /// True when no page follows this one
    pub last: bool,
}

impl<T> PagedResult<T> {
    pub fn new(content: Vec<T>, page_number: u64, page_size: u64, total_elements: u64) -> Self {
        let total_pages = total_elements.div_ceil(page_size.max(1));
        Self {
            content,
            page_number,
            page_size,
            total_elements,
            total_pages,
            last: page_number + 1 >= total_pages,
        }
    }
}

/// Query parameters for listing users
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, IntoParams)]
#[serde(default, rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// Zero-based page number
    #[param(default = 0, minimum = 0)]
    pub page: i64,
    /// Page size
    #[param(default = 10, minimum = 1)]
    pub size: i64,
    /// id, username, email, phoneNumber, role, createdAt or updatedAt
    #[param(default = "id")]
    pub sort_by: String,
    /// `desc` (any case) sorts descending, anything else ascending
    #[param(default = "asc")]
    pub sort_direction: String,
}

impl Default for ListUsersQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: 10,
            sort_by: "id".to_string(),
            sort_direction: "asc".to_string(),
        }
    }
}

/// Sortable user fields, named as on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "camelCase")]
pub enum SortField {
    #[default]
    Id,
    Username,
    Email,
    PhoneNumber,
    Role,
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Case-insensitive; anything other than `desc` is ascending.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }
}

/// Storage-level page request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
    pub sort_by: SortField,
    pub direction: SortDirection,
}

/// Storage-level page result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}
