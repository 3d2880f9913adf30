//! Route handlers and the cookie plumbing they share.
//!
//! Handlers only translate between HTTP and the auth gate: every
//! authentication decision is made by [`crate::auth::AuthGate`].

pub mod cookies;
pub mod health;
pub mod login;
pub mod logout;
pub mod profile;
pub mod root;

use url::form_urlencoded::byte_serialize;

pub(crate) const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid login credentials.";
pub(crate) const LOGIN_REQUIRED_MESSAGE: &str = "Please login to view your profile.";

/// Login entry point carrying a user-facing error message.
pub(crate) fn login_error_location(message: &str) -> String {
    let encoded: String = byte_serialize(message.as_bytes()).collect();
    format!("/login?error={encoded}")
}
