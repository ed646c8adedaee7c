//! Binary wire format for opaque tokens
//!
//! An encoded token is the category's two-character prefix followed by the
//! URL-safe base64 (unpadded) of: the 16-byte identifier, the big-endian
//! signed 64-bit absolute expiration (only for categories that carry one),
//! and the 20-byte signature.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use uuid::Uuid;

use crate::domain::entities::{TokenCategory, BASE64_PREFIX_LENGTH};
use crate::errors::TokenError;

use super::signer::{TokenSigner, SIGNATURE_LENGTH};

const UUID_LENGTH: usize = 16;
const EXPIRATION_LENGTH: usize = 8;

/// A successfully parsed and signature-verified token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedToken {
    pub category: TokenCategory,
    pub uuid: Uuid,
    /// Absolute expiration embedded in the body; `i64::MAX` when the
    /// category does not carry one
    pub expires: i64,
}

/// Encodes and decodes the opaque token string
pub struct TokenCodec {
    signer: TokenSigner,
}

impl TokenCodec {
    pub fn new(salt: impl Into<String>) -> Self {
        Self {
            signer: TokenSigner::new(salt),
        }
    }

    /// Encodes `uuid` as an opaque token of the given category.
    ///
    /// `expires` is the absolute expiration in epoch milliseconds. It is
    /// embedded only when the category carries expiration, but always enters
    /// the signature (as `i64::MAX` otherwise).
    pub fn encode(&self, category: TokenCategory, uuid: &Uuid, expires: i64) -> String {
        let expires = if category.carries_expiration() {
            expires
        } else {
            i64::MAX
        };

        let mut body = Vec::with_capacity(UUID_LENGTH + EXPIRATION_LENGTH + SIGNATURE_LENGTH);
        body.extend_from_slice(uuid.as_bytes());
        if category.carries_expiration() {
            body.extend_from_slice(&expires.to_be_bytes());
        }
        body.extend_from_slice(&self.signer.sign(category, uuid, expires));

        format!("{}{}", category.base64_prefix(), URL_SAFE_NO_PAD.encode(&body))
    }

    /// Parses and signature-verifies an opaque token.
    ///
    /// The signature is checked before any expiration reasoning happens, so
    /// the holder of a forged token cannot learn whether it would also have
    /// been expired.
    pub fn decode(&self, token: &str) -> Result<DecodedToken, TokenError> {
        let category = TokenCategory::from_base64_str(token)?;
        let body = URL_SAFE_NO_PAD
            .decode(&token[BASE64_PREFIX_LENGTH..])
            .map_err(|_| TokenError::BadToken {
                reason: String::from("body is not valid base64"),
            })?;

        let expected_len = UUID_LENGTH
            + SIGNATURE_LENGTH
            + if category.carries_expiration() {
                EXPIRATION_LENGTH
            } else {
                0
            };
        if body.len() != expected_len {
            return Err(TokenError::BadToken {
                reason: format!("body length {} does not match category", body.len()),
            });
        }

        let uuid = Uuid::from_slice(&body[..UUID_LENGTH]).map_err(|_| TokenError::BadToken {
            reason: String::from("malformed identifier"),
        })?;

        let mut offset = UUID_LENGTH;
        let mut expires = i64::MAX;
        if category.carries_expiration() {
            let raw: [u8; EXPIRATION_LENGTH] = body[offset..offset + EXPIRATION_LENGTH]
                .try_into()
                .map_err(|_| TokenError::BadToken {
                    reason: String::from("malformed expiration"),
                })?;
            expires = i64::from_be_bytes(raw);
            offset += EXPIRATION_LENGTH;
        }

        if !self.signer.verify(category, &uuid, expires, &body[offset..]) {
            return Err(TokenError::BadToken {
                reason: String::from("signature mismatch"),
            });
        }

        Ok(DecodedToken {
            category,
            uuid,
            expires,
        })
    }
}
