use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use reflect_core::ListParams;
use reflect_models::{
    ArticleDetails, Category, CategoryDto, CategorySummary, CreateArticleDto, CreateUserDto,
    ImageUploadResponse, LoginRequest, LoginResponse, MessageResponse, UpdateArticleDto,
    UpdateUserDto, User, UserSummary,
};

use crate::modules::articles::controller::{ArticleWithImageForm, ImageUploadForm};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::health::HealthResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::health_check,
        crate::modules::auth::controller::login_user,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::users::controller::admins_greeting,
        crate::modules::users::controller::editors_greeting,
        crate::modules::users::controller::admins_and_editors_greeting,
        crate::modules::categories::controller::get_categories,
        crate::modules::categories::controller::get_category,
        crate::modules::categories::controller::create_category,
        crate::modules::categories::controller::update_category,
        crate::modules::categories::controller::delete_category,
        crate::modules::articles::controller::get_articles,
        crate::modules::articles::controller::get_article,
        crate::modules::articles::controller::create_article,
        crate::modules::articles::controller::update_article,
        crate::modules::articles::controller::delete_article,
        crate::modules::articles::controller::upload_image,
        crate::modules::articles::controller::create_article_with_image,
    ),
    components(
        schemas(
            User,
            UserSummary,
            CreateUserDto,
            UpdateUserDto,
            Category,
            CategorySummary,
            CategoryDto,
            ArticleDetails,
            CreateArticleDto,
            UpdateArticleDto,
            ImageUploadResponse,
            ImageUploadForm,
            ArticleWithImageForm,
            LoginRequest,
            LoginResponse,
            MessageResponse,
            ErrorResponse,
            HealthResponse,
            ListParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service liveness"),
        (name = "Authentication", description = "Login and token issuing"),
        (name = "Users", description = "Registration and user management"),
        (name = "Categories", description = "Article categories"),
        (name = "Articles", description = "Articles and image uploads")
    ),
    info(
        title = "Reflect Blog API",
        version = "0.1.0",
        description = "Blog REST API built with Rust, Axum, and PostgreSQL with JWT bearer authentication and role-based access.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
