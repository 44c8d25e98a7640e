use jsonwebtoken::Algorithm;
use std::time::Duration;

/// Problems building a [`Config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingSecret,
    UnsupportedAlgorithm(String),
    ZeroLifetime(&'static str),
    Invalid(&'static str, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingSecret => write!(f, "SECRET_KEY must be set and non-empty"),
            Self::UnsupportedAlgorithm(a) => write!(f, "unsupported signing algorithm: {}", a),
            Self::ZeroLifetime(name) => write!(f, "{} must be greater than zero", name),
            Self::Invalid(name, value) => write!(f, "invalid value for {}: {}", name, value),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Immutable signing and lifetime settings.
/// Built once at startup and handed to the codec and orchestrator.
#[derive(Clone)]
pub struct Config {
    secret: Vec<u8>,
    algorithm: Algorithm,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl Config {
    pub fn new(
        secret: &[u8],
        algorithm: Algorithm,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Result<Self, ConfigError> {
        if secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(ConfigError::UnsupportedAlgorithm(format!("{:?}", algorithm)));
        }
        if access_ttl.is_zero() {
            return Err(ConfigError::ZeroLifetime("access token lifetime"));
        }
        if refresh_ttl.is_zero() {
            return Err(ConfigError::ZeroLifetime("refresh token lifetime"));
        }
        Ok(Self {
            secret: secret.to_vec(),
            algorithm,
            access_ttl,
            refresh_ttl,
        })
    }

    /// Reads `SECRET_KEY` (required), `JWT_ALGORITHM`,
    /// `ACCESS_TOKEN_EXPIRE_MINUTES`, and `REFRESH_TOKEN_EXPIRE_MINUTES`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("SECRET_KEY").ok_or(ConfigError::MissingSecret)?;
        let algorithm = lookup("JWT_ALGORITHM")
            .unwrap_or_else(|| String::from(warden_core::JWT_ALGORITHM));
        let algorithm = algorithm
            .parse::<Algorithm>()
            .map_err(|_| ConfigError::UnsupportedAlgorithm(algorithm.clone()))?;
        // seconds must fit the signed `exp` claim
        let minutes = |key: &'static str, default: u64| match lookup(key) {
            None => Ok(default * 60),
            Some(v) => v
                .trim()
                .parse::<u64>()
                .ok()
                .and_then(|m| m.checked_mul(60))
                .filter(|secs| i64::try_from(*secs).is_ok())
                .ok_or(ConfigError::Invalid(key, v)),
        };
        let access = minutes(
            "ACCESS_TOKEN_EXPIRE_MINUTES",
            warden_core::ACCESS_TOKEN_EXPIRE_MINUTES,
        )?;
        let refresh = minutes(
            "REFRESH_TOKEN_EXPIRE_MINUTES",
            warden_core::REFRESH_TOKEN_EXPIRE_MINUTES,
        )?;
        Self::new(
            secret.as_bytes(),
            algorithm,
            Duration::from_secs(access),
            Duration::from_secs(refresh),
        )
    }

    pub fn secret(&self) -> &[u8] {
        &self.secret
    }
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }
    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}
