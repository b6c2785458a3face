pub mod controller;
pub mod router;
pub mod service;

pub use router::{init_article_images_router, init_articles_router};
