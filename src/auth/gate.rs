//! Auth gate: login, logout and access decisions.
//!
//! There is no per-client state on the server besides session records; a
//! request is `Anonymous` or `Authenticated` depending solely on the token it
//! presents. A token that fails verification, or that names a session the
//! store no longer holds, is treated exactly like no token at all.

use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    codec::TokenCodec,
    credentials::CredentialVerifier,
    error::AuthError,
    state::AuthConfig,
    store::{SessionRecord, SessionStore},
};

/// Per-request authentication state. Never persisted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthContext {
    pub raw_token: Option<String>,
    pub session_id: Option<String>,
    pub username: Option<String>,
}

impl AuthContext {
    #[must_use]
    pub fn status(&self) -> AuthStatus {
        if self.username.is_some() {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Anonymous
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status() == AuthStatus::Authenticated
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthStatus {
    Anonymous,
    Authenticated,
}

/// Result of a successful login: the signed token to hand to the client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssuedSession {
    pub username: String,
    pub session_id: String,
    pub token: String,
}

pub struct AuthGate {
    config: AuthConfig,
    codec: TokenCodec,
    sessions: Arc<dyn SessionStore>,
    verifier: CredentialVerifier,
}

impl AuthGate {
    #[must_use]
    pub fn new(
        config: AuthConfig,
        codec: TokenCodec,
        sessions: Arc<dyn SessionStore>,
        verifier: CredentialVerifier,
    ) -> Self {
        Self {
            config,
            codec,
            sessions,
            verifier,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    /// Resolve a presented token to its live session record.
    ///
    /// # Errors
    /// `Tampered` when the token fails verification, `UnknownSession` when
    /// the session is missing, deleted or expired.
    pub fn resolve(&self, raw_token: &str) -> Result<SessionRecord, AuthError> {
        let session_id = self.codec.verify(raw_token)?;
        self.sessions
            .lookup(&session_id)
            .ok_or(AuthError::UnknownSession)
    }

    /// Derive the auth context for a request from its session token, if any.
    #[must_use]
    pub fn context(&self, raw_token: Option<&str>) -> AuthContext {
        let Some(raw_token) = raw_token else {
            return AuthContext::default();
        };
        match self.resolve(raw_token) {
            Ok(record) => AuthContext {
                raw_token: Some(raw_token.to_string()),
                session_id: Some(record.session_id),
                username: Some(record.username),
            },
            Err(err) => {
                debug!("session token rejected: {err}");
                AuthContext {
                    raw_token: Some(raw_token.to_string()),
                    ..AuthContext::default()
                }
            }
        }
    }

    /// Verify credentials and open a new session.
    ///
    /// # Errors
    /// `InvalidCredentials` for an unknown user or wrong password (never
    /// distinguished), `Entropy` if a session id cannot be generated.
    #[instrument(skip(self, password))]
    pub fn login(&self, username: &str, password: &str) -> Result<IssuedSession, AuthError> {
        let Some(record) = self.verifier.verify(username, password) else {
            info!("login rejected");
            return Err(AuthError::InvalidCredentials);
        };
        let session_id = self.sessions.create(&record.username)?;
        let token = self.codec.sign(&session_id);
        info!("login succeeded");
        Ok(IssuedSession {
            username: record.username,
            session_id,
            token,
        })
    }

    /// End the session named by the token, if it verifies. Always leaves the
    /// caller `Anonymous`; repeated calls are harmless.
    #[instrument(skip_all)]
    pub fn logout(&self, raw_token: Option<&str>) -> AuthStatus {
        if let Some(raw_token) = raw_token {
            match self.codec.verify(raw_token) {
                Ok(session_id) => self.sessions.delete(&session_id),
                Err(err) => warn!("logout with rejected token: {err}"),
            }
        }
        AuthStatus::Anonymous
    }

    /// Username for a protected resource, or `None` when the request must be
    /// sent back to the login entry point.
    #[must_use]
    pub fn profile(&self, raw_token: Option<&str>) -> Option<String> {
        self.context(raw_token).username
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::credentials::{
        tests::{test_hash, test_params},
        CredentialRecord, MemoryCredentials,
    };
    use crate::auth::store::MemorySessionStore;
    use anyhow::Result;
    use secrecy::SecretString;

    fn gate() -> Result<AuthGate> {
        let mut credentials = MemoryCredentials::new();
        credentials.insert(CredentialRecord::new("alice", &test_hash("secret"))?)?;
        let verifier = CredentialVerifier::with_params(Arc::new(credentials), test_params())?;
        let codec = TokenCodec::new(&SecretString::from(
            "an-adequately-long-cookie-secret-value".to_string(),
        ))?;
        Ok(AuthGate::new(
            AuthConfig::new(),
            codec,
            Arc::new(MemorySessionStore::new()),
            verifier,
        ))
    }

    #[test]
    fn no_token_is_anonymous() -> Result<()> {
        let gate = gate()?;
        let context = gate.context(None);
        assert_eq!(context, AuthContext::default());
        assert_eq!(context.status(), AuthStatus::Anonymous);
        Ok(())
    }

    #[test]
    fn login_issues_resolvable_token() -> Result<()> {
        let gate = gate()?;
        let issued = gate.login("alice", "secret")?;
        assert_eq!(issued.username, "alice");
        assert!(issued.token.starts_with(&issued.session_id));

        let context = gate.context(Some(&issued.token));
        assert!(context.is_authenticated());
        assert_eq!(context.username(), Some("alice"));
        assert_eq!(context.session_id.as_deref(), Some(issued.session_id.as_str()));
        assert_eq!(gate.profile(Some(&issued.token)), Some("alice".to_string()));
        Ok(())
    }

    #[test]
    fn failed_login_creates_no_session() -> Result<()> {
        let gate = gate()?;
        assert_eq!(
            gate.login("alice", "wrong"),
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(
            gate.login("mallory", "secret"),
            Err(AuthError::InvalidCredentials)
        );
        assert!(gate.sessions().is_empty());
        Ok(())
    }

    #[test]
    fn tampered_token_is_anonymous() -> Result<()> {
        let gate = gate()?;
        let issued = gate.login("alice", "secret")?;
        let tampered = format!("x{}", issued.token);
        assert_eq!(gate.resolve(&tampered), Err(AuthError::Tampered));
        let context = gate.context(Some(&tampered));
        assert!(!context.is_authenticated());
        assert_eq!(context.raw_token.as_deref(), Some(tampered.as_str()));
        assert!(gate.profile(Some(&tampered)).is_none());
        Ok(())
    }

    #[test]
    fn valid_token_for_missing_session_is_anonymous() -> Result<()> {
        let gate = gate()?;
        let issued = gate.login("alice", "secret")?;
        gate.sessions().delete(&issued.session_id);
        assert_eq!(gate.resolve(&issued.token), Err(AuthError::UnknownSession));
        assert!(!gate.context(Some(&issued.token)).is_authenticated());
        Ok(())
    }

    #[test]
    fn logout_deletes_session_and_is_idempotent() -> Result<()> {
        let gate = gate()?;
        let issued = gate.login("alice", "secret")?;
        assert_eq!(gate.logout(Some(&issued.token)), AuthStatus::Anonymous);
        assert!(gate.profile(Some(&issued.token)).is_none());
        assert_eq!(gate.logout(Some(&issued.token)), AuthStatus::Anonymous);
        assert_eq!(gate.logout(None), AuthStatus::Anonymous);
        assert!(gate.sessions().is_empty());
        Ok(())
    }

    #[test]
    fn logout_with_forged_token_keeps_other_sessions() -> Result<()> {
        let gate = gate()?;
        let issued = gate.login("alice", "secret")?;
        // Unsigned session id must not be able to end someone else's session.
        gate.logout(Some(&issued.session_id));
        assert!(gate.context(Some(&issued.token)).is_authenticated());
        Ok(())
    }
}
