//! Token records and the principals they are bound to

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Token type tag applied when callers do not specify one
pub const TOKEN_TYPE_ACCESS: &str = "access";

/// Kinds of principals a token can be issued to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthPrincipalType {
    AdminUser,
    ApplicationUser,
    Organization,
    Application,
}

impl AuthPrincipalType {
    /// Lowercase name persisted in the principal column
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthPrincipalType::AdminUser => "admin_user",
            AuthPrincipalType::ApplicationUser => "application_user",
            AuthPrincipalType::Organization => "organization",
            AuthPrincipalType::Application => "application",
        }
    }

    /// Parses a persisted principal-type name; unknown names yield `None`
    pub fn parse(name: &str) -> Option<AuthPrincipalType> {
        match name.to_ascii_lowercase().as_str() {
            "admin_user" => Some(AuthPrincipalType::AdminUser),
            "application_user" => Some(AuthPrincipalType::ApplicationUser),
            "organization" => Some(AuthPrincipalType::Organization),
            "application" => Some(AuthPrincipalType::Application),
            _ => None,
        }
    }
}

/// Principal a token was issued to
///
/// The three fields travel together; a token either has a full principal
/// or none at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthPrincipalInfo {
    pub principal_type: AuthPrincipalType,
    pub entity_id: Uuid,
    pub application_id: Uuid,
}

impl AuthPrincipalInfo {
    pub fn new(principal_type: AuthPrincipalType, entity_id: Uuid, application_id: Uuid) -> Self {
        Self {
            principal_type,
            entity_id,
            application_id,
        }
    }
}

/// Persistent record backing an issued token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    /// Time-ordered identifier; also the record's row key
    pub uuid: Uuid,

    /// Free-form type tag, `"access"` unless the caller specified one
    pub token_type: String,

    /// Milliseconds since epoch; equals the identifier's time field at creation
    pub created: i64,

    /// Milliseconds since epoch of the last successful validation
    pub accessed: i64,

    /// Longest observed gap between two consecutive validations, in milliseconds
    pub inactive: i64,

    /// Principal the token was issued to, if any
    pub principal: Option<AuthPrincipalInfo>,

    /// Opaque application-defined state
    pub state: HashMap<String, JsonValue>,
}

impl TokenInfo {
    /// Builds the record for a freshly issued token.
    ///
    /// `created` is the instant encoded in the identifier; `accessed` starts
    /// equal to it and `inactive` at zero.
    pub fn issued_at(
        uuid: Uuid,
        created: i64,
        token_type: Option<&str>,
        principal: Option<AuthPrincipalInfo>,
        state: Option<HashMap<String, JsonValue>>,
    ) -> Self {
        Self {
            uuid,
            token_type: token_type.unwrap_or(TOKEN_TYPE_ACCESS).to_string(),
            created,
            accessed: created,
            inactive: 0,
            principal,
            state: state.unwrap_or_default(),
        }
    }
}
