use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use reflect_core::{AppError, ListParams, PagedInfo};
use reflect_models::{CreateUserDto, MessageResponse, UpdateUserDto, User};

use crate::middleware::auth::AuthUser;
use crate::middleware::role::{RequireAdminOrEditor, RequireAdministrator, RequireEditor};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::validator::{QueryParams, ValidatedJson};

#[utoipa::path(
    get,
    path = "/api/users",
    params(ListParams),
    responses(
        (status = 200, description = "Page of users ordered by id", body = PagedInfo<User>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    QueryParams(params): QueryParams<ListParams>,
) -> Result<Json<PagedInfo<User>>, AppError> {
    let users = UserService::get_users(&state.db, &params).await?;
    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = User),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<User>, AppError> {
    let user = UserService::get_user(&state.db, id).await?;
    Ok(Json(user))
}

/// Register a new account. Open to anonymous callers; the new user is a `Reader`.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Malformed body, or username/email taken", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = UserService::create_user(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Malformed body, or username/email taken", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not this user, or a role change by a non-administrator", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn update_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<User>, AppError> {
    if !auth_user.is_self_or_administrator(id) {
        return Err(AppError::forbidden(
            "You can update only your own account".to_string(),
        ));
    }

    let user =
        UserService::update_user(&state.db, id, dto, auth_user.is_administrator()).await?;
    Ok(Json(user))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not this user and not an administrator", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    if !auth_user.is_self_or_administrator(id) {
        return Err(AppError::forbidden(
            "You can delete only your own account".to_string(),
        ));
    }

    UserService::delete_user(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Deleted User!")))
}

#[utoipa::path(
    get,
    path = "/api/users/admins",
    responses(
        (status = 200, description = "Greeting", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not an administrator", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn admins_greeting(
    RequireAdministrator(auth_user): RequireAdministrator,
) -> Json<MessageResponse> {
    Json(MessageResponse::new(format!(
        "Hi {}, you are an {}",
        auth_user.given_name(),
        auth_user.role()
    )))
}

#[utoipa::path(
    get,
    path = "/api/users/editors",
    responses(
        (status = 200, description = "Greeting", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not an editor", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn editors_greeting(RequireEditor(auth_user): RequireEditor) -> Json<MessageResponse> {
    Json(MessageResponse::new(format!(
        "Hi {}, you are a {}",
        auth_user.given_name(),
        auth_user.role()
    )))
}

#[utoipa::path(
    get,
    path = "/api/users/admins-and-editors",
    responses(
        (status = 200, description = "Greeting", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Neither administrator nor editor", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn admins_and_editors_greeting(
    RequireAdminOrEditor(auth_user): RequireAdminOrEditor,
) -> Json<MessageResponse> {
    Json(MessageResponse::new(format!(
        "Hi {}, you are an {}",
        auth_user.given_name(),
        auth_user.role()
    )))
}
