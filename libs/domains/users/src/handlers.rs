use axum::{
    Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};
use axum_helpers::{
    ApiResponse, AppError, EmptyResponse, IdPath, ValidatedJson,
    errors::responses::{
        BadRequestValidationResponse, ConflictResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{CreateUser, ListUsersQuery, Paged, UpdateUser, User};
use crate::repository::UserRepository;
use crate::service::UserService;

pub const TAG: &str = "Users";

/// OpenAPI documentation for the Users API
#[derive(OpenApi)]
#[openapi(
    paths(list_users, create_user, get_user, update_user, delete_user),
    components(
        schemas(User, CreateUser, UpdateUser),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "User management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the user router with all HTTP endpoints
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
        .with_state(shared_service)
}

/// List users, paged and filtered
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(ListUsersQuery),
    responses(
        (status = 200, description = "One page of users", body = ApiResponse<Paged<User>>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    query: Result<Query<ListUsersQuery>, QueryRejection>,
) -> Result<ApiResponse<Paged<User>>, AppError> {
    let Query(query) = query?;
    let (page, limit, filter) = query.into_parts()?;

    let page = service
        .get_user_with_page_and_count(page, limit, filter)
        .await?;
    Ok(ApiResponse::success(page))
}

/// Create a user
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateUser,
    responses(
        (status = 200, description = "User created", body = ApiResponse<User>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> Result<ApiResponse<User>, AppError> {
    let user = service.create_user(input).await?;
    Ok(ApiResponse::with_message(user, "user created success"))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = ApiResponse<User>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    IdPath(id): IdPath,
) -> Result<ApiResponse<User>, AppError> {
    let user = service.get_user_by_id(id).await?;
    Ok(ApiResponse::success(user))
}

/// Update a user; only the fields present are changed
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<User>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateUser>,
) -> Result<ApiResponse<User>, AppError> {
    let user = service.update_user(id, input).await?;
    Ok(ApiResponse::with_message(user, "user updated success"))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = EmptyResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    IdPath(id): IdPath,
) -> Result<EmptyResponse, AppError> {
    service.delete_user(id).await?;
    Ok(EmptyResponse::success("user deleted success"))
}
