use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_article, create_article_with_image, delete_article, get_article, get_articles,
    update_article, upload_image,
};

pub fn init_articles_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_articles).post(create_article))
        .route(
            "/{id}",
            get(get_article).put(update_article).delete(delete_article),
        )
}

/// Multipart upload routes. Callers gate these with a writer-role layer.
pub fn init_article_images_router() -> Router<AppState> {
    Router::new()
        .route("/images", post(upload_image))
        .route("/with-image", post(create_article_with_image))
}
