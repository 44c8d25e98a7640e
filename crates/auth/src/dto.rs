use super::*;
use serde::Deserialize;
use serde::Serialize;
use warden_core::Unique;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
}

impl From<&Principal> for UserInfo {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.id().to_string(),
            email: principal.identifier().to_string(),
        }
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// OAuth2 password form: `username` carries the email.
#[derive(Deserialize)]
pub struct TokenForm {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: Token,
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: Token,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<Token>,
    pub token_type: &'static str,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access,
            refresh_token: Some(pair.refresh),
            token_type: "bearer",
        }
    }
}

impl From<Token> for TokenResponse {
    fn from(access: Token) -> Self {
        Self {
            access_token: access,
            refresh_token: None,
            token_type: "bearer",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_only_response_omits_refresh() {
        let json = serde_json::to_value(TokenResponse::from(Token::from("a.b.c"))).unwrap();
        assert_eq!(json, serde_json::json!({ "access_token": "a.b.c", "token_type": "bearer" }));
    }
    #[test]
    fn user_info_hides_credentials() {
        let principal = Principal::new(
            warden_core::ID::default(),
            String::from("alice@example.com"),
            String::from("$argon2id$secret"),
            true,
        );
        let json = serde_json::to_value(UserInfo::from(&principal)).unwrap();
        assert_eq!(json["email"], "alice@example.com");
        assert_eq!(json["id"], principal.id().to_string());
        assert!(json.get("hashword").is_none());
    }
    #[test]
    fn pair_response_carries_both() {
        let pair = TokenPair {
            access: Token::from("a"),
            refresh: Token::from("r"),
        };
        let json = serde_json::to_value(TokenResponse::from(pair)).unwrap();
        assert_eq!(json["refresh_token"], "r");
        assert_eq!(json["access_token"], "a");
    }
}
