use super::*;
use jsonwebtoken::errors::ErrorKind;
use std::time::Duration;
use warden_core::ID;

/// Claims as they arrive off the wire, before presence checks.
#[derive(serde::Deserialize)]
struct Unchecked {
    sub: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    exp: Option<i64>,
    jti: Option<String>,
}

/// Signs and verifies bearer tokens with a shared secret.
pub struct TokenCodec {
    header: jsonwebtoken::Header,
    validation: jsonwebtoken::Validation,
    encoding: jsonwebtoken::EncodingKey,
    decoding: jsonwebtoken::DecodingKey,
}

impl TokenCodec {
    pub fn new(config: &Config) -> Self {
        let mut validation = jsonwebtoken::Validation::new(config.algorithm());
        // presence and expiry are checked here so each failure gets its own kind
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.leeway = 0;
        Self {
            header: jsonwebtoken::Header::new(config.algorithm()),
            validation,
            encoding: jsonwebtoken::EncodingKey::from_secret(config.secret()),
            decoding: jsonwebtoken::DecodingKey::from_secret(config.secret()),
        }
    }

    pub fn issue(&self, subject: ID<Principal>, kind: Kind, ttl: Duration) -> Result<Issued, AuthError> {
        let claims = Claims::new(subject, kind, ttl);
        jsonwebtoken::encode(&self.header, &claims, &self.encoding)
            .map(Token::from)
            .map(|token| Issued { token, kind, claims })
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// Verifies the signature first, then claim presence, then expiry.
    pub fn decode(&self, token: &Token) -> Result<Claims, AuthError> {
        let unchecked = jsonwebtoken::decode::<Unchecked>(token.as_str(), &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                ErrorKind::MissingRequiredClaim(claim) => AuthError::MissingClaim(claim.clone()),
                _ => AuthError::MalformedToken,
            })?;
        let sub = unchecked.sub.ok_or_else(|| AuthError::MissingClaim(String::from("sub")))?;
        let kind = unchecked.kind.ok_or_else(|| AuthError::MissingClaim(String::from("type")))?;
        let exp = unchecked.exp.ok_or_else(|| AuthError::MissingClaim(String::from("exp")))?;
        let claims = Claims {
            sub,
            kind,
            exp,
            jti: unchecked.jti,
        };
        if claims.expired() {
            return Err(AuthError::ExpiredToken);
        }
        Ok(claims)
    }
}
