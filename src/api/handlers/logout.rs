use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap},
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::error;

use super::cookies::{clear_session_cookie, session_token};
use crate::auth::AuthGate;

/// `POST /logout`: end the session and clear the session cookie.
pub async fn logout(headers: HeaderMap, Extension(gate): Extension<Arc<AuthGate>>) -> Response {
    let token = session_token(gate.config(), &headers);
    gate.logout(token.as_deref());

    // Always clear the cookie, even if the session record was missing.
    match clear_session_cookie(gate.config()) {
        Ok(cookie) => ([(SET_COOKIE, cookie)], Redirect::to("/login")).into_response(),
        Err(err) => {
            error!("Failed to build cookie: {err}");
            Redirect::to("/login").into_response()
        }
    }
}
