//! Signed token codec.
//!
//! A token is `<payload>.<signature>`, where the signature is the unpadded
//! URL-safe base64 of `HMAC-SHA256(secret, payload)`. The payload travels in
//! plain text: clients can read it, but any modification is detected.

use base64ct::{Base64UrlUnpadded, Encoding};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use std::fmt;

use super::error::AuthError;

type HmacSha256 = Hmac<Sha256>;

/// Shortest accepted cookie secret, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

const SEPARATOR: char = '.';

/// Signs and verifies opaque payloads with a process-wide secret.
#[derive(Clone)]
pub struct TokenCodec {
    // Keyed state is prepared once; each operation works on a clone.
    mac: HmacSha256,
}

impl TokenCodec {
    /// Build a codec from the configured secret.
    ///
    /// # Errors
    /// Returns `MissingSecret` for an empty secret and `WeakSecret` when it is
    /// shorter than [`MIN_SECRET_LEN`].
    pub fn new(secret: &SecretString) -> Result<Self, AuthError> {
        let key = secret.expose_secret().as_bytes();
        if key.is_empty() {
            return Err(AuthError::MissingSecret);
        }
        if key.len() < MIN_SECRET_LEN {
            return Err(AuthError::WeakSecret {
                min: MIN_SECRET_LEN,
            });
        }
        let mac = HmacSha256::new_from_slice(key).map_err(|_| AuthError::MissingSecret)?;
        Ok(Self { mac })
    }

    /// Sign `payload`, producing a token safe to use as a cookie value.
    #[must_use]
    pub fn sign(&self, payload: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        let signature = Base64UrlUnpadded::encode_string(&mac.finalize().into_bytes());
        format!("{payload}{SEPARATOR}{signature}")
    }

    /// Verify `token` and return the payload it carries.
    ///
    /// The signature comparison is constant time.
    ///
    /// # Errors
    /// Returns `Tampered` when the delimiter is missing, the signature does not
    /// decode, or it does not match the payload.
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        let (payload, signature) = token
            .rsplit_once(SEPARATOR)
            .ok_or(AuthError::Tampered)?;
        let decoded = Base64UrlUnpadded::decode_vec(signature).map_err(|_| AuthError::Tampered)?;
        // Only the canonical encoding is accepted, so unused trailing bits
        // cannot be flipped. Both sides derive from client input only.
        if Base64UrlUnpadded::encode_string(&decoded) != signature {
            return Err(AuthError::Tampered);
        }
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        mac.verify_slice(&decoded)
            .map_err(|_| AuthError::Tampered)?;
        Ok(payload.to_string())
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}
