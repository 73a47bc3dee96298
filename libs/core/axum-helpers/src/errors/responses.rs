//! Reusable OpenAPI response types for consistent API documentation.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Bad Request - field validation failed",
    content_type = "application/json",
    example = json!({
        "timestamp": "2025-01-01T12:00:00Z",
        "path": "/api/v1/users",
        "status": 400,
        "errorCode": "VALIDATION_FAILED",
        "message": "Validation failed",
        "validationErrors": {
            "username": "User name must be between 2 and 50 characters",
            "email": "Email must be valid"
        }
    })
)]
pub struct ValidationFailedResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - malformed body, path or query",
    content_type = "application/json",
    example = json!({
        "timestamp": "2025-01-01T12:00:00Z",
        "path": "/api/v1/users/abc",
        "status": 400,
        "errorCode": "BAD_REQUEST",
        "message": "Invalid id: abc",
        "validationErrors": null
    })
)]
pub struct BadRequestResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "timestamp": "2025-01-01T12:00:00Z",
        "path": "/api/v1/users/42",
        "status": 404,
        "errorCode": "NOT_FOUND",
        "message": "User not found with id : 42",
        "validationErrors": null
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Conflict - email already in use",
    content_type = "application/json",
    example = json!({
        "timestamp": "2025-01-01T12:00:00Z",
        "path": "/api/v1/users",
        "status": 409,
        "errorCode": "DUPLICATE_EMAIL",
        "message": "User with email: a@x.com already exists",
        "validationErrors": null
    })
)]
pub struct DuplicateEmailResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "timestamp": "2025-01-01T12:00:00Z",
        "path": "/api/v1/users",
        "status": 500,
        "errorCode": "INTERNAL_ERROR",
        "message": "An internal server error occurred",
        "validationErrors": null
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);
