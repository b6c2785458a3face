use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use reflect_core::{AppError, ListParams, PagedInfo};
use reflect_models::{Category, CategoryDto, MessageResponse};

use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireAdministrator;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::categories::service::CategoryService;
use crate::state::AppState;
use crate::validator::{QueryParams, ValidatedJson};

#[utoipa::path(
    get,
    path = "/api/categories",
    params(ListParams),
    responses(
        (status = 200, description = "Page of categories ordered by id", body = PagedInfo<Category>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
#[instrument(skip(state))]
pub async fn get_categories(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    QueryParams(params): QueryParams<ListParams>,
) -> Result<Json<PagedInfo<Category>>, AppError> {
    let categories = CategoryService::get_categories(&state.db, &params).await?;
    Ok(Json(categories))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(("id" = i64, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category", body = Category),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
#[instrument(skip(state))]
pub async fn get_category(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Category>, AppError> {
    let category = CategoryService::get_category(&state.db, id).await?;
    Ok(Json(category))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CategoryDto,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Malformed body or name taken", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not an administrator", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
#[instrument(skip(state, dto))]
pub async fn create_category(
    State(state): State<AppState>,
    RequireAdministrator(_auth_user): RequireAdministrator,
    ValidatedJson(dto): ValidatedJson<CategoryDto>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let category = CategoryService::create_category(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(("id" = i64, Path, description = "Category ID")),
    request_body = CategoryDto,
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 400, description = "Malformed body or name taken", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not an administrator", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
#[instrument(skip(state, dto))]
pub async fn update_category(
    State(state): State<AppState>,
    RequireAdministrator(_auth_user): RequireAdministrator,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<CategoryDto>,
) -> Result<Json<Category>, AppError> {
    let category = CategoryService::update_category(&state.db, id, dto).await?;
    Ok(Json(category))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(("id" = i64, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not an administrator", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
#[instrument(skip(state))]
pub async fn delete_category(
    State(state): State<AppState>,
    RequireAdministrator(_auth_user): RequireAdministrator,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    CategoryService::delete_category(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Deleted Category!")))
}
