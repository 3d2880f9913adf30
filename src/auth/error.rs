use thiserror::Error;

/// Failures produced by the authentication core.
///
/// `Tampered`, `UnknownSession` and `InvalidCredentials` are expected per-request
/// outcomes and are recovered at the gate; only the secret-key variants are
/// fatal, and only at startup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("token signature mismatch or malformed token")]
    Tampered,
    #[error("unknown session")]
    UnknownSession,
    #[error("invalid login credentials")]
    InvalidCredentials,
    #[error("cookies are disabled")]
    CookiesDisabled,
    #[error("cookie secret is not configured")]
    MissingSecret,
    #[error("cookie secret must be at least {min} bytes")]
    WeakSecret { min: usize },
    #[error("failed to generate session identifier")]
    Entropy,
    #[error("password hash error: {0}")]
    Hash(String),
}

impl AuthError {
    /// Outcomes that must be treated exactly like "no session present".
    #[must_use]
    pub const fn is_absent_session(&self) -> bool {
        matches!(self, Self::Tampered | Self::UnknownSession)
    }
}
