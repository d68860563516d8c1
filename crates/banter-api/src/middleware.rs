use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;

use crate::AppState;
use crate::error::ApiError;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "sid";

/// Authenticated username, injected into request extensions by
/// `require_auth`.
#[derive(Debug, Clone)]
pub struct AuthedUser(pub String);

/// Extract and verify the session cookie; 403 otherwise. The rejection
/// is identical for a missing, malformed, tampered or expired token.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = jar.get(SESSION_COOKIE).map(|cookie| cookie.value());
    let username = state.gate.authenticate(token)?;

    req.extensions_mut().insert(AuthedUser(username));
    Ok(next.run(req).await)
}
