//! Request validation.
//!
//! Turns raw request bodies into accepted values, or into the full set of
//! field violations keyed by the field's wire (camelCase) name.

use axum_helpers::FieldViolations;
use validator::{Validate, ValidationErrors};

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, CreateUserRequest, UpdateUser, UpdateUserRequest};

pub fn validate_create(request: CreateUserRequest) -> UserResult<CreateUser> {
    request
        .validate()
        .map_err(|errors| UserError::Validation(to_violations(&errors)))?;

    match request {
        CreateUserRequest {
            username: Some(username),
            email: Some(email),
            phone_number: Some(phone_number),
            role: Some(role),
        } => Ok(CreateUser {
            username,
            email,
            phone_number,
            role,
        }),
        _ => Err(UserError::BadRequest("Incomplete create request".to_string())),
    }
}

/// Blank strings are dropped before the field rules run, so they never
/// overwrite a stored value.
pub fn validate_update(request: UpdateUserRequest) -> UserResult<UpdateUser> {
    let request = UpdateUserRequest {
        username: non_blank(request.username),
        email: non_blank(request.email),
        phone_number: non_blank(request.phone_number),
        ..request
    };

    request
        .validate()
        .map_err(|errors| UserError::Validation(to_violations(&errors)))?;

    let Some(id) = request.id else {
        return Err(UserError::BadRequest("User ID is required".to_string()));
    };

    Ok(UpdateUser {
        id,
        username: request.username,
        email: request.email,
        phone_number: request.phone_number,
        role: request.role,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// One message per violated field; the first failing rule wins.
pub fn to_violations(errors: &ValidationErrors) -> FieldViolations {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            let first = errs.first()?;
            let message = first
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| first.code.to_string());
            Some((wire_name(&field), message))
        })
        .collect()
}

/// `phone_number` -> `phoneNumber`
fn wire_name(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
