use crate::modules::teachers::controller::{
    create_teacher, delete_teacher, get_teacher, get_teachers, update_teacher,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn init_teachers_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_teacher).get(get_teachers))
        .route(
            "/{id}",
            get(get_teacher)
                .put(update_teacher)
                .patch(update_teacher)
                .delete(delete_teacher),
        )
}

/// Unauthenticated teacher creation, mounted only in the dev environment so
/// the first account can be made before anyone can log in.
pub fn init_dev_teachers_router() -> Router<AppState> {
    Router::new().route("/", post(create_teacher))
}
