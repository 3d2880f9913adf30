use axum::{
    extract::{Extension, Form, Query},
    http::{
        header::{LOCATION, SET_COOKIE},
        HeaderMap, StatusCode,
    },
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, instrument};

use super::{
    cookies::{session_cookie, session_token},
    login_error_location, INVALID_CREDENTIALS_MESSAGE,
};
use crate::{
    auth::{AuthError, AuthGate, SessionStore as _},
    pages::Pages,
};

#[derive(Deserialize, Debug, Default)]
pub struct LoginQuery {
    error: Option<String>,
}

// No Debug: the password must never reach a log line.
#[derive(Deserialize, Default)]
pub struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

/// `GET /login`: render the login view, or skip it for authenticated clients.
pub async fn login_page(
    headers: HeaderMap,
    Query(query): Query<LoginQuery>,
    Extension(gate): Extension<Arc<AuthGate>>,
    Extension(pages): Extension<Arc<Pages>>,
) -> Response {
    let token = session_token(gate.config(), &headers);
    if gate.context(token.as_deref()).is_authenticated() {
        return Redirect::to("/profile").into_response();
    }

    match query.error {
        Some(error) => (StatusCode::FORBIDDEN, Html(pages.login(Some(&error)))).into_response(),
        None => Html(pages.login(None)).into_response(),
    }
}

/// `POST /login`: verify credentials and hand out a signed session cookie.
#[instrument(skip_all)]
pub async fn login(
    headers: HeaderMap,
    Extension(gate): Extension<Arc<AuthGate>>,
    Extension(pages): Extension<Arc<Pages>>,
    Form(form): Form<LoginForm>,
) -> Response {
    // Password hashing is CPU bound; keep it off the async workers.
    let worker = Arc::clone(&gate);
    let outcome =
        tokio::task::spawn_blocking(move || worker.login(&form.username, &form.password)).await;

    let issued = match outcome {
        Ok(Ok(issued)) => issued,
        Ok(Err(AuthError::InvalidCredentials)) => return rejected(&pages),
        Ok(Err(err)) => {
            error!("Failed to open session: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
        Err(err) => {
            error!("Login task failed: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    // A fresh login replaces whatever session the client held before.
    if let Some(previous) = session_token(gate.config(), &headers) {
        gate.logout(Some(&previous));
    }

    match session_cookie(gate.config(), &issued.token) {
        Ok(cookie) => ([(SET_COOKIE, cookie)], Redirect::to("/profile")).into_response(),
        Err(err) => {
            error!("Failed to build session cookie: {err}");
            gate.sessions().delete(&issued.session_id);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Client error pointing back at the login view with a generic message.
fn rejected(pages: &Pages) -> Response {
    (
        StatusCode::FORBIDDEN,
        [(LOCATION, login_error_location(INVALID_CREDENTIALS_MESSAGE))],
        Html(pages.login(Some(INVALID_CREDENTIALS_MESSAGE))),
    )
        .into_response()
}
