//! Auth configuration shared by the gate and the HTTP layer.

const DEFAULT_SESSION_COOKIE_NAME: &str = "sessionId";
const DEFAULT_SESSION_TTL_SECONDS: u64 = 12 * 60 * 60;

#[derive(Clone, Debug)]
pub struct AuthConfig {
    session_cookie_name: String,
    session_ttl_seconds: u64,
    session_cookie_secure: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            session_cookie_name: DEFAULT_SESSION_COOKIE_NAME.to_string(),
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            session_cookie_secure: false,
        }
    }

    #[must_use]
    pub fn with_session_cookie_name(mut self, name: String) -> Self {
        self.session_cookie_name = name;
        self
    }

    /// Zero disables session expiry.
    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: u64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_session_cookie_secure(mut self, secure: bool) -> Self {
        self.session_cookie_secure = secure;
        self
    }

    #[must_use]
    pub fn session_cookie_name(&self) -> &str {
        &self.session_cookie_name
    }

    #[must_use]
    pub fn session_ttl_seconds(&self) -> u64 {
        self.session_ttl_seconds
    }

    #[must_use]
    pub fn session_cookie_secure(&self) -> bool {
        self.session_cookie_secure
    }
}
