//! # Cookie Jar (cookie session authentication)
//!
//! `cookie-jar` issues a signed session cookie after a successful login and
//! gates a protected profile page on it.
//!
//! ## Session Tokens
//!
//! The cookie carries `<session id>.<HMAC-SHA256 signature>`. The session id is
//! 256 bits from the OS random source; the signature makes client-side edits
//! detectable but does not hide the id. Any token that fails verification is
//! treated as if no cookie had been sent.
//!
//! ## Sessions
//!
//! Session records live server side and bind a session id to a username.
//! Logging out deletes the record and clears the cookie, so a copied cookie
//! cannot be replayed afterwards. Records expire after a configurable TTL.
//!
//! ## Credentials
//!
//! Users are loaded from a file of `username:<argon2 PHC>` lines; raw
//! passwords are never stored. The `hash-password` subcommand produces those
//! lines. Failed logins never reveal whether the username or the password was
//! wrong.

pub mod api;
pub mod auth;
pub mod cli;
pub mod pages;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
