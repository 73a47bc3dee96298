use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse, axum_helpers::ErrorCode)
    ),
    info(
        title = "Users API",
        version = "0.1.0",
        description = "User management: create, read, paged listing, partial update and delete"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/v1/users", api = domain_users::handlers::ApiDoc)
    )
)]
pub struct ApiDoc;
