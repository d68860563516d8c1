use axum::Extension;
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;

use banter_gateway::connection;

use crate::AppState;
use crate::middleware::AuthedUser;

/// Upgrade to the long-lived notification channel. Authentication
/// already happened in the middleware; the socket itself carries no
/// message content, only the opaque refresh signal.
pub async fn notifications(
    State(state): State<AppState>,
    Extension(AuthedUser(username)): Extension<AuthedUser>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let hub = state.hub.clone();
    ws.on_upgrade(move |socket| connection::handle_connection(socket, hub, username))
}
