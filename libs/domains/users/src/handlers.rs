use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    ApiJson, ApiQuery, IdPath,
    errors::responses::{
        BadRequestResponse, DuplicateEmailResponse, InternalServerErrorResponse, NotFoundResponse,
        ValidationFailedResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::models::{
    CreateUserRequest, ListUsersQuery, PagedResult, Role, UpdateUserRequest, UserResponse,
};
use crate::repository::UserRepository;
use crate::service::UserService;

/// OpenAPI tag shared by every users endpoint
pub const TAG: &str = "users";

/// OpenAPI documentation for Users API
#[derive(OpenApi)]
#[openapi(
    paths(list_users, create_user, update_user, get_user, delete_user),
    components(
        schemas(UserResponse, CreateUserRequest, UpdateUserRequest, Role),
        responses(
            ValidationFailedResponse,
            BadRequestResponse,
            NotFoundResponse,
            DuplicateEmailResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "User management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the users router with all HTTP endpoints
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_users).post(create_user).put(update_user))
        .route("/{id}", get(get_user).delete(delete_user))
        .with_state(shared_service)
}

/// List users one page at a time
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(ListUsersQuery),
    responses(
        (status = 200, description = "One page of users", body = PagedResult<UserResponse>),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ApiQuery(query): ApiQuery<ListUsersQuery>,
) -> UserResult<Json<PagedResult<UserResponse>>> {
    let page = service.list_users(query).await?;
    Ok(Json(page))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, response = ValidationFailedResponse),
        (status = 409, response = DuplicateEmailResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> UserResult<impl IntoResponse> {
    let user = service.create_user(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Update a user; the id travels in the body
#[utoipa::path(
    put,
    path = "",
    tag = TAG,
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, response = ValidationFailedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = DuplicateEmailResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> UserResult<Json<UserResponse>> {
    let user = service.update_user(request).await?;
    Ok(Json(user))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    IdPath(id): IdPath,
) -> UserResult<Json<UserResponse>> {
    let user = service.get_user(id).await?;
    Ok(Json(user))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted, or did not exist"),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    IdPath(id): IdPath,
) -> UserResult<impl IntoResponse> {
    service.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
