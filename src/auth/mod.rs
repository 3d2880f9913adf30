//! Cookie session authentication core.
//!
//! The pieces compose leaf-first: [`TokenCodec`] signs session ids,
//! [`SessionStore`] owns session records, [`CredentialVerifier`] checks
//! submitted passwords, and [`AuthGate`] drives login, logout and access
//! decisions on top of them. Nothing here knows about HTTP.

pub mod codec;
pub mod credentials;
pub mod error;
pub mod gate;
mod state;
pub mod store;

pub use codec::{TokenCodec, MIN_SECRET_LEN};
pub use credentials::{
    hash_password, CredentialRecord, CredentialSource, CredentialVerifier, MemoryCredentials,
};
pub use error::AuthError;
pub use gate::{AuthContext, AuthGate, AuthStatus, IssuedSession};
pub use state::AuthConfig;
pub use store::{MemorySessionStore, SessionRecord, SessionStore};
