use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};

use crate::middleware::require_auth;
use crate::{AppState, auth, messages, notifications};

/// Build the full route tree: one public login route, everything else
/// behind the session cookie.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/auth/login", post(auth::login))
        .with_state(state.clone());

    let protected = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route(
            "/messages",
            get(messages::get_messages).post(messages::send_message),
        )
        .route("/notifications", get(notifications::notifications))
        .layer(from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    Router::new().merge(public).merge(protected)
}
