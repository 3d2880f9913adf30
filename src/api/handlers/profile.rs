use axum::{
    extract::Extension,
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use super::{cookies::session_token, login_error_location, LOGIN_REQUIRED_MESSAGE};
use crate::{auth::AuthGate, pages::Pages};

/// `GET /profile`: protected view bound to the session's username.
pub async fn profile(
    headers: HeaderMap,
    Extension(gate): Extension<Arc<AuthGate>>,
    Extension(pages): Extension<Arc<Pages>>,
) -> Response {
    let token = session_token(gate.config(), &headers);
    match gate.profile(token.as_deref()) {
        Some(username) => Html(pages.profile(&username)).into_response(),
        None => Redirect::to(&login_error_location(LOGIN_REQUIRED_MESSAGE)).into_response(),
    }
}
