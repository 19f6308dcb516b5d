use crate::modules::attendance::controller::{
    create_attendance, delete_attendance, get_attendance_entry, list_attendance, update_attendance,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn init_attendance_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_attendance).get(list_attendance))
        .route(
            "/{id}",
            get(get_attendance_entry)
                .put(update_attendance)
                .patch(update_attendance)
                .delete(delete_attendance),
        )
}
