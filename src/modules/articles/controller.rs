use anyhow::anyhow;
use axum::{
    Json,
    extract::{
        Multipart, Path, State,
        multipart::{Field, MultipartError},
    },
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use tracing::instrument;
use utoipa::ToSchema;
use validator::Validate;

use reflect_core::{AppError, ListParams, PagedInfo};
use reflect_models::{
    ArticleDetails, CreateArticleDto, ImageUploadResponse, MessageResponse, UpdateArticleDto,
};

use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireArticleWriter;
use crate::modules::articles::service::ArticleService;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::{QueryParams, ValidatedJson, format_errors};

/// Multipart body of `POST /api/articles/images`.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct ImageUploadForm {
    /// PNG file
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

/// Multipart body of `POST /api/articles/with-image`.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct ArticleWithImageForm {
    pub title: String,
    pub content: String,
    pub category_id: Option<i64>,
    /// RFC 3339 timestamp, defaults to now
    pub date: Option<String>,
    /// PNG file
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

struct UploadedFile {
    file_name: String,
    content: Vec<u8>,
}

fn multipart_error(e: MultipartError) -> AppError {
    AppError::bad_request(anyhow!("Invalid multipart body: {}", e.body_text()))
}

async fn read_image_field(field: Field<'_>) -> Result<UploadedFile, AppError> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content = field.bytes().await.map_err(multipart_error)?.to_vec();
    Ok(UploadedFile { file_name, content })
}

fn image_required() -> AppError {
    AppError::bad_request(anyhow!("Image file is required"))
}

#[utoipa::path(
    get,
    path = "/api/articles",
    params(ListParams),
    responses(
        (status = 200, description = "Page of articles ordered by id", body = PagedInfo<ArticleDetails>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Articles"
)]
#[instrument(skip(state))]
pub async fn get_articles(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    QueryParams(params): QueryParams<ListParams>,
) -> Result<Json<PagedInfo<ArticleDetails>>, AppError> {
    let articles = ArticleService::get_articles(&state.db, &params).await?;
    Ok(Json(articles))
}

#[utoipa::path(
    get,
    path = "/api/articles/{id}",
    params(("id" = i64, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Article with author and category", body = ArticleDetails),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Article not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Articles"
)]
#[instrument(skip(state))]
pub async fn get_article(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ArticleDetails>, AppError> {
    let article = ArticleService::get_article(&state.db, id).await?;
    Ok(Json(article))
}

#[utoipa::path(
    post,
    path = "/api/articles",
    request_body = CreateArticleDto,
    responses(
        (status = 201, description = "Article created", body = ArticleDetails),
        (status = 400, description = "Malformed body or unknown category", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not an administrator or author", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Articles"
)]
#[instrument(skip(state, dto))]
pub async fn create_article(
    State(state): State<AppState>,
    RequireArticleWriter(auth_user): RequireArticleWriter,
    ValidatedJson(dto): ValidatedJson<CreateArticleDto>,
) -> Result<(StatusCode, Json<ArticleDetails>), AppError> {
    let article = ArticleService::create_article(&state.db, auth_user.user_id(), dto).await?;
    Ok((StatusCode::CREATED, Json(article)))
}

#[utoipa::path(
    put,
    path = "/api/articles/{id}",
    params(("id" = i64, Path, description = "Article ID")),
    request_body = UpdateArticleDto,
    responses(
        (status = 200, description = "Article updated", body = ArticleDetails),
        (status = 400, description = "Not the author, malformed body or unknown category", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not an administrator or author", body = ErrorResponse),
        (status = 404, description = "Article not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Articles"
)]
#[instrument(skip(state, dto))]
pub async fn update_article(
    State(state): State<AppState>,
    RequireArticleWriter(auth_user): RequireArticleWriter,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateArticleDto>,
) -> Result<Json<ArticleDetails>, AppError> {
    let article = ArticleService::update_article(
        &state.db,
        id,
        auth_user.user_id(),
        auth_user.is_administrator(),
        dto,
    )
    .await?;
    Ok(Json(article))
}

#[utoipa::path(
    delete,
    path = "/api/articles/{id}",
    params(("id" = i64, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Article deleted", body = MessageResponse),
        (status = 400, description = "Not the author", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not an administrator or author", body = ErrorResponse),
        (status = 404, description = "Article not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Articles"
)]
#[instrument(skip(state))]
pub async fn delete_article(
    State(state): State<AppState>,
    RequireArticleWriter(auth_user): RequireArticleWriter,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    ArticleService::delete_article(
        &state.db,
        id,
        auth_user.user_id(),
        auth_user.is_administrator(),
    )
    .await?;
    Ok(Json(MessageResponse::new("Deleted Article!")))
}

#[utoipa::path(
    post,
    path = "/api/articles/images",
    request_body(content = ImageUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored", body = ImageUploadResponse),
        (status = 400, description = "Missing file or not a png", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not an administrator or author", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Articles"
)]
#[instrument(skip(state, multipart))]
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImageUploadResponse>, AppError> {
    let mut image = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some("image") {
            image = Some(read_image_field(field).await?);
        }
    }

    let image = image.ok_or_else(image_required)?;
    let stored =
        ArticleService::store_image(state.storage.as_ref(), &image.file_name, &image.content)
            .await?;

    Ok(Json(ImageUploadResponse { url: stored.url }))
}

/// Create an article and its image in one multipart request
#[utoipa::path(
    post,
    path = "/api/articles/with-image",
    request_body(content = ArticleWithImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Article created with image", body = ArticleDetails),
        (status = 400, description = "Missing field, not a png or unknown category", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not an administrator or author", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Articles"
)]
#[instrument(skip(state, multipart))]
pub async fn create_article_with_image(
    State(state): State<AppState>,
    auth_user: AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ArticleDetails>), AppError> {
    let mut title = None;
    let mut content = None;
    let mut category_id = None;
    let mut date = None;
    let mut image = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => image = Some(read_image_field(field).await?),
            "title" => title = Some(field.text().await.map_err(multipart_error)?),
            "content" => content = Some(field.text().await.map_err(multipart_error)?),
            "category_id" => {
                let text = field.text().await.map_err(multipart_error)?;
                if !text.trim().is_empty() {
                    let id = text.trim().parse::<i64>().map_err(|_| {
                        AppError::bad_request(anyhow!("category_id must be an integer"))
                    })?;
                    category_id = Some(id);
                }
            }
            "date" => {
                let text = field.text().await.map_err(multipart_error)?;
                if !text.trim().is_empty() {
                    let parsed = text.trim().parse::<DateTime<Utc>>().map_err(|_| {
                        AppError::bad_request(anyhow!("date must be an RFC 3339 timestamp"))
                    })?;
                    date = Some(parsed);
                }
            }
            _ => {}
        }
    }

    let dto = CreateArticleDto {
        title: title.ok_or_else(|| AppError::bad_request(anyhow!("title is required")))?,
        content: content.ok_or_else(|| AppError::bad_request(anyhow!("content is required")))?,
        date,
        category_id,
        image_url: None,
    };
    dto.validate()
        .map_err(|errors| AppError::unprocessable(anyhow!("{}", format_errors(&errors))))?;

    let image = image.ok_or_else(image_required)?;
    let stored =
        ArticleService::store_image(state.storage.as_ref(), &image.file_name, &image.content)
            .await?;

    let created = ArticleService::create_article(
        &state.db,
        auth_user.user_id(),
        CreateArticleDto {
            image_url: Some(stored.url.clone()),
            ..dto
        },
    )
    .await;

    match created {
        Ok(article) => Ok((StatusCode::CREATED, Json(article))),
        Err(e) => {
            ArticleService::discard_image(state.storage.as_ref(), &stored).await;
            Err(e)
        }
    }
}
