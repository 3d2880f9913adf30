//! Cookie header parsing and `Set-Cookie` construction.

use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};

use crate::auth::AuthConfig;

/// Set on the cookie support probe; its value is never inspected.
pub(crate) const PROBE_COOKIE: &str = "cookie_jar_probe=1; Path=/; HttpOnly; SameSite=Lax";

/// Whether the client sent any cookie at all.
pub(crate) fn has_cookies(headers: &HeaderMap) -> bool {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| !value.trim().is_empty())
}

/// First value of cookie `name` across all `Cookie` headers.
pub(crate) fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    for header in headers.get_all(COOKIE).iter() {
        let Ok(value) = header.to_str() else {
            continue;
        };
        for pair in value.split(';') {
            let Some((key, val)) = pair.trim().split_once('=') else {
                continue;
            };
            if key.trim() == name {
                let val = val.trim().trim_matches('"');
                if !val.is_empty() {
                    return Some(val.to_string());
                }
            }
        }
    }
    None
}

/// Session token presented by the request, if any.
pub(crate) fn session_token(config: &AuthConfig, headers: &HeaderMap) -> Option<String> {
    extract_cookie(headers, config.session_cookie_name())
}

/// Build the `HttpOnly` session cookie carrying a signed token.
pub(crate) fn session_cookie(
    config: &AuthConfig,
    token: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!(
        "{}={token}; Path=/; HttpOnly; SameSite=Lax",
        config.session_cookie_name()
    );
    let ttl_seconds = config.session_ttl_seconds();
    if ttl_seconds > 0 {
        cookie.push_str(&format!("; Max-Age={ttl_seconds}"));
    }
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Expire the session cookie on the client.
pub(crate) fn clear_session_cookie(config: &AuthConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        config.session_cookie_name()
    );
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(values: &[&'static str]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for value in values {
            headers.append(COOKIE, HeaderValue::from_static(value));
        }
        headers
    }

    #[test]
    fn extract_cookie_finds_named_value() {
        let headers = headers(&["theme=dark; sessionId=abc.def; other=1"]);
        assert_eq!(extract_cookie(&headers, "sessionId"), Some("abc.def".to_string()));
        assert_eq!(extract_cookie(&headers, "missing"), None);
    }

    #[test]
    fn extract_cookie_searches_every_header() {
        let headers = headers(&["theme=dark", "sessionId=token"]);
        assert_eq!(extract_cookie(&headers, "sessionId"), Some("token".to_string()));
    }

    #[test]
    fn extract_cookie_ignores_empty_and_prefix_matches() {
        let headers = headers(&["sessionIdx=nope; sessionId="]);
        assert_eq!(extract_cookie(&headers, "sessionId"), None);
    }

    #[test]
    fn has_cookies_requires_non_empty_header() {
        assert!(!has_cookies(&HeaderMap::new()));
        assert!(!has_cookies(&headers(&[" "])));
        assert!(has_cookies(&headers(&["a=b"])));
    }

    #[test]
    fn session_cookie_flags() {
        let config = AuthConfig::new().with_session_ttl_seconds(60);
        let cookie = session_cookie(&config, "abc.def").ok();
        assert_eq!(
            cookie.as_ref().and_then(|c| c.to_str().ok()),
            Some("sessionId=abc.def; Path=/; HttpOnly; SameSite=Lax; Max-Age=60")
        );

        let config = AuthConfig::new()
            .with_session_ttl_seconds(0)
            .with_session_cookie_secure(true);
        let cookie = session_cookie(&config, "abc.def").ok();
        assert_eq!(
            cookie.as_ref().and_then(|c| c.to_str().ok()),
            Some("sessionId=abc.def; Path=/; HttpOnly; SameSite=Lax; Secure")
        );
    }

    #[test]
    fn clear_cookie_targets_session_cookie() {
        let cookie = clear_session_cookie(&AuthConfig::new()).ok();
        assert_eq!(
            cookie.as_ref().and_then(|c| c.to_str().ok()),
            Some("sessionId=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
        );
    }
}
