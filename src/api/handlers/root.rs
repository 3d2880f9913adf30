use axum::{
    extract::{Extension, Query},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

use super::cookies::{has_cookies, session_token, PROBE_COOKIE};
use crate::auth::{AuthError, AuthGate};

pub(crate) const COOKIES_DISABLED_NOTICE: &str = "Cookies are disabled.";

#[derive(Deserialize, Debug, Default)]
pub struct RootQuery {
    cookie_probe: Option<String>,
}

/// `GET /`: send authenticated clients to their profile, everyone else to login.
///
/// A client without any cookie first gets a probe cookie; if it comes back
/// still empty-handed, cookies are off and a notice is shown instead of
/// redirecting again.
pub async fn root(
    headers: HeaderMap,
    Query(query): Query<RootQuery>,
    Extension(gate): Extension<Arc<AuthGate>>,
) -> Response {
    if !has_cookies(&headers) {
        if query.cookie_probe.is_some() {
            warn!("{}", AuthError::CookiesDisabled);
            return (StatusCode::OK, COOKIES_DISABLED_NOTICE).into_response();
        }
        return (
            [(SET_COOKIE, PROBE_COOKIE)],
            Redirect::to("/?cookie_probe=1"),
        )
            .into_response();
    }

    let token = session_token(gate.config(), &headers);
    if gate.context(token.as_deref()).is_authenticated() {
        Redirect::to("/profile").into_response()
    } else {
        Redirect::to("/login").into_response()
    }
}
