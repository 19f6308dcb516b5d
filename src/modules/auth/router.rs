use axum::{Router, middleware, routing::get};

use crate::middleware::auth::redirect_if_logged_in;
use crate::modules::auth::controller::{login, login_form, logout, me};
use crate::state::AppState;

/// `/login` and `/logout`, mounted at the root.
pub fn init_auth_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/login",
            get(login_form)
                .route_layer(middleware::from_fn_with_state(state, redirect_if_logged_in))
                .post(login),
        )
        .route("/logout", get(logout))
}

/// `/me`, mounted under the protected `/api` prefix.
pub fn init_me_router() -> Router<AppState> {
    Router::new().route("/me", get(me))
}
