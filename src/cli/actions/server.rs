use crate::{
    api,
    auth::{AuthConfig, AuthGate, CredentialVerifier, MemoryCredentials, MemorySessionStore, TokenCodec},
    pages::Pages,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::{path::PathBuf, sync::Arc, time::Duration};
use tracing::{info, warn};

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub cookie_secret: SecretString,
    pub users_file: PathBuf,
    pub pages_dir: Option<PathBuf>,
    pub session_ttl_seconds: u64,
    pub secure_cookies: bool,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the cookie secret is unusable, the users file or page
/// templates cannot be loaded, or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let codec = TokenCodec::new(&args.cookie_secret).context("Invalid cookie secret")?;

    let credentials = MemoryCredentials::from_file(&args.users_file)?;
    if credentials.is_empty() {
        warn!("Users file has no entries, every login will be rejected");
    }
    info!(users = credentials.len(), "Loaded credentials");

    let verifier = CredentialVerifier::new(Arc::new(credentials))
        .context("Failed to prepare credential verifier")?;

    let sessions = Arc::new(
        MemorySessionStore::new().with_ttl(Duration::from_secs(args.session_ttl_seconds)),
    );

    let config = AuthConfig::new()
        .with_session_ttl_seconds(args.session_ttl_seconds)
        .with_session_cookie_secure(args.secure_cookies);

    let gate = Arc::new(AuthGate::new(config, codec, sessions, verifier));

    let pages = match &args.pages_dir {
        Some(dir) => Pages::from_dir(dir)?,
        None => Pages::embedded(),
    };

    api::new(args.port, gate, Arc::new(pages)).await
}
