//! Session store: maps session identifiers to the user they were issued for.
//!
//! Records are only ever created or deleted, never updated. The in-memory
//! store is the default backing; anything implementing [`SessionStore`] can
//! replace it without touching the gate.

use base64ct::{Base64UrlUnpadded, Encoding};
use parking_lot::RwLock;
use rand::{rngs::OsRng, RngCore};
use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::debug;

use super::error::AuthError;

/// Random bytes per session identifier (256 bits).
const SESSION_ID_BYTES: usize = 32;

/// Server-held session state bound to a session identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionRecord {
    pub session_id: String,
    pub username: String,
    pub created_at_unix: u64,
}

/// Storage for live sessions.
///
/// Implementations must be safe for concurrent `create`, `lookup` and
/// `delete`; every operation touches a single key.
pub trait SessionStore: Send + Sync {
    /// Persist a new session for `username` and return its identifier.
    ///
    /// # Errors
    /// Returns `Entropy` if the OS random source fails.
    fn create(&self, username: &str) -> Result<String, AuthError>;

    /// Fetch a live session. Unknown, deleted and expired ids yield `None`.
    fn lookup(&self, session_id: &str) -> Option<SessionRecord>;

    /// Remove a session. Unknown ids are ignored.
    fn delete(&self, session_id: &str);

    /// Drop every expired session, returning how many were removed.
    fn purge_expired(&self) -> usize;

    /// Number of stored sessions, expired ones included until purged.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Generate a fresh, unguessable session identifier.
///
/// # Errors
/// Returns `Entropy` if the OS random source fails.
pub fn generate_session_id() -> Result<String, AuthError> {
    let mut bytes = [0u8; SESSION_ID_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|_| AuthError::Entropy)?;
    Ok(Base64UrlUnpadded::encode_string(&bytes))
}

pub(crate) fn now_unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}

/// Process-local session store guarded by a single readers-writer lock.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, SessionRecord>>,
    ttl: Option<Duration>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Expire sessions `ttl` after creation. A zero TTL disables expiry.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = (!ttl.is_zero()).then_some(ttl);
        self
    }

    #[must_use]
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    fn is_expired(&self, record: &SessionRecord, now: u64) -> bool {
        self.ttl
            .is_some_and(|ttl| now.saturating_sub(record.created_at_unix) >= ttl.as_secs())
    }

    #[cfg(test)]
    pub(crate) fn insert_record(&self, record: SessionRecord) {
        self.sessions
            .write()
            .insert(record.session_id.clone(), record);
    }
}

impl SessionStore for MemorySessionStore {
    fn create(&self, username: &str) -> Result<String, AuthError> {
        let session_id = generate_session_id()?;
        let record = SessionRecord {
            session_id: session_id.clone(),
            username: username.to_string(),
            created_at_unix: now_unix_seconds(),
        };
        self.sessions.write().insert(session_id.clone(), record);
        Ok(session_id)
    }

    fn lookup(&self, session_id: &str) -> Option<SessionRecord> {
        let now = now_unix_seconds();
        let record = self.sessions.read().get(session_id).cloned()?;
        if self.is_expired(&record, now) {
            debug!("session expired, purging");
            self.delete(session_id);
            return None;
        }
        Some(record)
    }

    fn delete(&self, session_id: &str) {
        self.sessions.write().remove(session_id);
    }

    fn purge_expired(&self) -> usize {
        if self.ttl.is_none() {
            return 0;
        }
        let now = now_unix_seconds();
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, record| !self.is_expired(record, now));
        before - sessions.len()
    }

    fn len(&self) -> usize {
        self.sessions.read().len()
    }
}
