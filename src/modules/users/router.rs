use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    admins_and_editors_greeting, admins_greeting, create_user, delete_user, editors_greeting,
    get_user, get_users, update_user,
};

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_users).post(create_user))
        .route("/admins", get(admins_greeting))
        .route("/editors", get(editors_greeting))
        .route("/admins-and-editors", get(admins_and_editors_greeting))
        .route(
            "/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}
