//! Token categories and their wire prefixes

use crate::errors::TokenError;

/// Number of prefix characters preceding the base64 body of an encoded token
pub const BASE64_PREFIX_LENGTH: usize = 2;

/// The four recognized token kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenCategory {
    Access,
    Refresh,
    Email,
    Offline,
}

impl TokenCategory {
    pub const ALL: [TokenCategory; 4] = [
        TokenCategory::Access,
        TokenCategory::Refresh,
        TokenCategory::Email,
        TokenCategory::Offline,
    ];

    /// Two-character prefix mixed into the signed string
    pub fn text_prefix(&self) -> &'static str {
        match self {
            TokenCategory::Access => "ac",
            TokenCategory::Refresh => "re",
            TokenCategory::Email => "em",
            TokenCategory::Offline => "of",
        }
    }

    /// Two-character prefix of the encoded output; the leading characters of
    /// the URL-safe base64 encoding of the text prefix
    pub fn base64_prefix(&self) -> &'static str {
        match self {
            TokenCategory::Access => "YW",
            TokenCategory::Refresh => "cm",
            TokenCategory::Email => "ZW",
            TokenCategory::Offline => "b2",
        }
    }

    /// Whether tokens of this category embed an absolute expiration
    pub fn carries_expiration(&self) -> bool {
        matches!(self, TokenCategory::Access)
    }

    /// Lowercase category name, used for configuration and logging
    pub fn name(&self) -> &'static str {
        match self {
            TokenCategory::Access => "access",
            TokenCategory::Refresh => "refresh",
            TokenCategory::Email => "email",
            TokenCategory::Offline => "offline",
        }
    }

    /// Resolves the category from the leading characters of an encoded token
    pub fn from_base64_str(token: &str) -> Result<TokenCategory, TokenError> {
        let prefix = token.get(..BASE64_PREFIX_LENGTH).ok_or_else(|| TokenError::BadToken {
            reason: String::from("token is too short"),
        })?;
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.base64_prefix() == prefix)
            .ok_or_else(|| TokenError::BadToken {
                reason: format!("unrecognized token prefix `{prefix}`"),
            })
    }
}
