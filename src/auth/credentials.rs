//! Credential records and their verification.
//!
//! Only Argon2 PHC strings are ever stored; a submitted password is hashed
//! with the stored parameters and compared in constant time by `argon2`.

use anyhow::{anyhow, Context, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params,
};
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use std::{collections::HashMap, fs, path::Path, sync::Arc};
use tracing::{debug, instrument};

use super::error::AuthError;

/// A user as known to the credential source.
#[derive(Clone, Debug)]
pub struct CredentialRecord {
    pub username: String,
    password_hash: SecretString,
}

impl CredentialRecord {
    /// Build a record from a username and an Argon2 PHC string.
    ///
    /// # Errors
    /// Returns `Hash` if `password_hash` is not a valid PHC string.
    pub fn new(username: impl Into<String>, password_hash: &str) -> Result<Self, AuthError> {
        PasswordHash::new(password_hash).map_err(|err| AuthError::Hash(err.to_string()))?;
        Ok(Self {
            username: username.into(),
            password_hash: SecretString::from(password_hash.to_string()),
        })
    }

    fn password_hash(&self) -> &str {
        self.password_hash.expose_secret()
    }
}

/// Read-only lookup of credential records by username.
pub trait CredentialSource: Send + Sync {
    fn find(&self, username: &str) -> Option<CredentialRecord>;
}

/// Lightweight username check applied to every record loaded from a users file.
#[must_use]
pub fn valid_username(username: &str) -> bool {
    Regex::new(r"^[A-Za-z0-9._@-]{1,64}$").is_ok_and(|re| re.is_match(username))
}

/// Hash `password` with the default Argon2id parameters.
///
/// # Errors
/// Returns `Hash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    hash_password_with(&Argon2::default(), password)
}

/// Hash `password` with an explicit Argon2 instance.
///
/// # Errors
/// Returns `Hash` if hashing fails.
pub fn hash_password_with(argon2: &Argon2<'_>, password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|phc| phc.to_string())
        .map_err(|err| AuthError::Hash(err.to_string()))
}

fn password_matches(phc: &str, password: &str) -> bool {
    PasswordHash::new(phc).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

/// Credential source held in memory, typically loaded from a users file.
#[derive(Clone, Debug, Default)]
pub struct MemoryCredentials {
    users: HashMap<String, CredentialRecord>,
}

impl MemoryCredentials {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record.
    ///
    /// # Errors
    /// Returns an error for an invalid username or a duplicate one.
    pub fn insert(&mut self, record: CredentialRecord) -> Result<()> {
        if !valid_username(&record.username) {
            return Err(anyhow!("invalid username: {:?}", record.username));
        }
        if self.users.contains_key(&record.username) {
            return Err(anyhow!("duplicate username: {}", record.username));
        }
        self.users.insert(record.username.clone(), record);
        Ok(())
    }

    /// Parse `username:<phc>` lines. Blank lines and `#` comments are skipped.
    ///
    /// # Errors
    /// Returns an error naming the offending line.
    pub fn parse(contents: &str) -> Result<Self> {
        let mut credentials = Self::new();
        for (index, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line_no = index + 1;
            let (username, phc) = line
                .split_once(':')
                .with_context(|| format!("line {line_no}: expected username:hash"))?;
            let record = CredentialRecord::new(username.trim(), phc.trim())
                .with_context(|| format!("line {line_no}: invalid password hash"))?;
            credentials
                .insert(record)
                .with_context(|| format!("line {line_no}"))?;
        }
        Ok(credentials)
    }

    /// Load a users file from disk.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read users file: {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("Invalid users file: {}", path.display()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl CredentialSource for MemoryCredentials {
    fn find(&self, username: &str) -> Option<CredentialRecord> {
        self.users.get(username).cloned()
    }
}

/// Checks submitted credentials against a [`CredentialSource`].
pub struct CredentialVerifier {
    source: Arc<dyn CredentialSource>,
    // Verified against when the username is unknown so both paths cost the same.
    decoy_hash: String,
}

impl CredentialVerifier {
    /// # Errors
    /// Returns `Hash` if the decoy hash cannot be computed.
    pub fn new(source: Arc<dyn CredentialSource>) -> Result<Self, AuthError> {
        Self::with_params(source, Params::default())
    }

    /// Use explicit Argon2 parameters for the decoy hash. They should match
    /// the parameters of the stored hashes.
    ///
    /// # Errors
    /// Returns `Hash` if the decoy hash cannot be computed.
    pub fn with_params(source: Arc<dyn CredentialSource>, params: Params) -> Result<Self, AuthError> {
        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);
        let decoy_hash = hash_password_with(&argon2, "decoy-password")?;
        Ok(Self { source, decoy_hash })
    }

    /// Return the matching record, or `None` when the username is unknown or
    /// the password is wrong. The two cases are indistinguishable to callers.
    #[instrument(skip(self, password))]
    pub fn verify(&self, username: &str, password: &str) -> Option<CredentialRecord> {
        match self.source.find(username) {
            Some(record) if password_matches(record.password_hash(), password) => Some(record),
            Some(_) => {
                debug!("password mismatch");
                None
            }
            None => {
                let _ = password_matches(&self.decoy_hash, password);
                debug!("unknown username");
                None
            }
        }
    }
}
