use super::*;
use serde::Deserialize;
use serde::Serialize;
use warden_core::ID;

/// Signed, self-describing bearer token as handed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Token {
    fn from(s: String) -> Self {
        Self(s)
    }
}
impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
impl From<Token> for String {
    fn from(t: Token) -> Self {
        t.0
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// JWT payload: subject, token kind, absolute expiry in unix seconds.
/// `type` stays a raw string so a foreign value reads as the wrong kind
/// rather than as a broken token.
/// `jti` makes every issuance a distinct string even within one second.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl Claims {
    pub fn new(subject: ID<Principal>, kind: Kind, ttl: std::time::Duration) -> Self {
        Self {
            sub: subject.to_string(),
            kind: kind.to_string(),
            exp: warden_core::now().saturating_add(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX)),
            jti: Some(uuid::Uuid::now_v7().to_string()),
        }
    }
    pub fn expired(&self) -> bool {
        self.exp <= warden_core::now()
    }
    /// `None` for a `type` that is neither access nor refresh.
    pub fn kind(&self) -> Option<Kind> {
        Kind::try_from(self.kind.as_str()).ok()
    }
    pub fn expires(&self) -> i64 {
        self.exp
    }
    /// Subject as a principal id. A signed token whose subject is not one
    /// of our ids was not issued for any principal we know.
    pub fn principal(&self) -> Result<ID<Principal>, AuthError> {
        self.sub
            .parse::<ID<Principal>>()
            .map_err(|_| AuthError::MalformedToken)
    }
}

/// A freshly signed token alongside the claims it carries.
#[derive(Debug, Clone)]
pub struct Issued {
    pub token: Token,
    pub kind: Kind,
    pub claims: Claims,
}

/// Access + refresh pair returned by login and password change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access: Token,
    pub refresh: Token,
}
