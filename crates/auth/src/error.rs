/// Every way a login, refresh, authorization, or password change can fail.
/// Display yields the message shown to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    InvalidCredentials,
    InactiveAccount,
    ExpiredToken,
    MalformedToken,
    MissingClaim(String),
    WrongTokenType,
    TokenNotRecognized,
    SamePasswordReuse,
    AlreadyRegistered,
    StoreUnavailable(String),
    DirectoryUnavailable(String),
    Internal(String),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "email or password incorrect"),
            Self::InactiveAccount => write!(f, "user is inactive"),
            Self::ExpiredToken => write!(f, "your token has expired, please log in again"),
            Self::MalformedToken => write!(f, "error when decoding the token, please check your request"),
            Self::MissingClaim(claim) => write!(f, "token is missing required claim: {}", claim),
            Self::WrongTokenType => write!(f, "incorrect token type"),
            Self::TokenNotRecognized => write!(f, "token invalid"),
            Self::SamePasswordReuse => write!(f, "new password should be different from the current one"),
            Self::AlreadyRegistered => write!(f, "email already registered"),
            Self::StoreUnavailable(e) => write!(f, "session store unavailable: {}", e),
            Self::DirectoryUnavailable(e) => write!(f, "user directory unavailable: {}", e),
            Self::Internal(e) => write!(f, "internal error: {}", e),
        }
    }
}

impl std::error::Error for AuthError {}

/// Failure talking to the backing key-value store.
/// Never interpreted as an empty result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError(pub String);

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "store error: {}", self.0)
    }
}

impl std::error::Error for StoreError {}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        Self::StoreUnavailable(e.0)
    }
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for StoreError {
    fn from(e: redis::RedisError) -> Self {
        Self(e.to_string())
    }
}

#[cfg(feature = "database")]
impl From<tokio_postgres::Error> for AuthError {
    fn from(e: tokio_postgres::Error) -> Self {
        Self::DirectoryUnavailable(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_never_look_like_token_errors() {
        let e = AuthError::from(StoreError("connection refused".into()));
        assert_eq!(e, AuthError::StoreUnavailable("connection refused".into()));
        assert!(e.to_string().contains("connection refused"));
    }
}
