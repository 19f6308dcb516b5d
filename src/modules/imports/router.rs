use crate::modules::imports::controller::run_import;
use crate::state::AppState;
use axum::{Router, routing::post};

pub fn init_import_router() -> Router<AppState> {
    Router::new().route("/", post(run_import))
}
