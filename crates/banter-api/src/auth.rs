use anyhow::anyhow;
use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::IntoResponse;
use tracing::{error, info};

use banter_auth::error::AuthError;
use banter_auth::password;
use banter_store::records::RecordStore;
use banter_types::api::{LoginRequest, LoginResponse};

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::SESSION_COOKIE;

/// Login doubles as first-time registration: an unknown username gets an
/// account created with the presented password. When two first logins
/// race on the same name, the second insert loses with a 409.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // SQLite and argon2 are both blocking; keep them off the runtime.
    let store = state.store.clone();
    let username = req.username.clone();
    let password = req.password;
    tokio::task::spawn_blocking(move || -> Result<(), ApiError> {
        match store.get_account(&username)? {
            Some(account) => {
                if !password::verify_password(&password, &account.password_hash)? {
                    return Err(AuthError::InvalidCredentials.into());
                }
            }
            None => {
                let hash = password::hash_password(&password)?;
                store.create_account(&username, &hash)?;
                info!("Created account for {}", username);
            }
        }
        Ok(())
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Internal(anyhow!("task join failure"))
    })??;

    let token = state.gate.issue_session(&req.username)?;
    let cookie = session_cookie(&token, state.gate.token_ttl().num_seconds())?;

    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, cookie);

    Ok((headers, Json(LoginResponse { username: req.username })))
}

/// Clears the cookie. The token itself stays valid until its natural
/// expiry — there is no server-side revocation list.
pub async fn logout() -> Result<impl IntoResponse, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, session_cookie("", 0)?);

    Ok((StatusCode::OK, headers))
}

/// Session cookie with the attributes the browser client expects:
/// whole-site path, HTTP-only, secure, cross-site.
fn session_cookie(token: &str, max_age_secs: i64) -> Result<HeaderValue, ApiError> {
    let value = format!(
        "{}={}; Max-Age={}; Path=/; HttpOnly; Secure; SameSite=None",
        SESSION_COOKIE, token, max_age_secs
    );
    HeaderValue::from_str(&value)
        .map_err(|e| ApiError::Internal(anyhow!("invalid cookie header: {}", e)))
}
