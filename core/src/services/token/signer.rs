//! Keyed SHA-1 signatures over token contents

use sha1::{Digest, Sha1};
use uuid::Uuid;

use crate::domain::entities::TokenCategory;

/// Length in bytes of a token signature
pub const SIGNATURE_LENGTH: usize = 20;

/// Signs token contents with the configured secret salt.
///
/// The digest input concatenates the category's text prefix, the canonical
/// hyphenated identifier, the salt, and the decimal expiration, with no
/// delimiters. The layout is fixed by already-issued tokens; the digest is
/// used strictly as a keyed MAC, not for collision resistance.
pub struct TokenSigner {
    salt: String,
}

impl TokenSigner {
    pub fn new(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }

    /// 20-byte digest over `(category, uuid, salt, expires)`.
    ///
    /// Categories without an embedded expiration sign `i64::MAX`.
    pub fn sign(&self, category: TokenCategory, uuid: &Uuid, expires: i64) -> [u8; SIGNATURE_LENGTH] {
        let mut hasher = Sha1::new();
        hasher.update(category.text_prefix().as_bytes());
        hasher.update(uuid.to_string().as_bytes());
        hasher.update(self.salt.as_bytes());
        hasher.update(expires.to_string().as_bytes());
        hasher.finalize().into()
    }

    /// Constant-time comparison against a presented signature
    pub fn verify(
        &self,
        category: TokenCategory,
        uuid: &Uuid,
        expires: i64,
        signature: &[u8],
    ) -> bool {
        constant_time_eq::constant_time_eq(&self.sign(category, uuid, expires), signature)
    }
}
