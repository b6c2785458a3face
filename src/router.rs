use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::middleware::role::require_article_writer;
use crate::modules::articles::{init_article_images_router, init_articles_router};
use crate::modules::auth::router::init_auth_router;
use crate::modules::categories::router::init_categories_router;
use crate::modules::health::health_check;
use crate::modules::users::init_users_router;
use crate::state::AppState;

/// Room for the multipart framing and text fields around an image.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn init_router(state: AppState) -> Router {
    let upload_limit = state.storage_config.max_file_size + MULTIPART_OVERHEAD;

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .route("/health", get(health_check))
        .nest(
            "/api",
            Router::new()
                .merge(init_auth_router())
                .nest("/users", init_users_router())
                .nest("/categories", init_categories_router())
                .nest(
                    "/articles",
                    init_articles_router().merge(
                        init_article_images_router()
                            .route_layer(middleware::from_fn_with_state(
                                state.clone(),
                                require_article_writer,
                            ))
                            .layer(DefaultBodyLimit::max(upload_limit)),
                    ),
                ),
        )
        .nest_service("/uploads", ServeDir::new(&state.storage_config.upload_dir))
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}
