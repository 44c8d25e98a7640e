use super::*;
use actix_web::FromRequest;
use actix_web::HttpRequest;
use actix_web::dev::Payload;
use actix_web::web;
use std::future::Future;
use std::pin::Pin;

/// Extractor for authenticated requests.
/// Validates the bearer access token against signature, registry, and directory.
pub struct Auth(pub Principal);

impl Auth {
    pub fn principal(&self) -> &Principal {
        &self.0
    }
}

impl FromRequest for Auth {
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;
    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let warden = req.app_data::<web::Data<Warden>>().cloned();
        let auth_header = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_owned());
        Box::pin(async move {
            let header = auth_header.ok_or_else(|| {
                actix_web::error::ErrorUnauthorized("missing authorization header")
            })?;
            let token = header.strip_prefix("Bearer ").ok_or_else(|| {
                actix_web::error::ErrorUnauthorized("invalid authorization format")
            })?;
            let warden = warden.ok_or_else(|| {
                actix_web::error::ErrorInternalServerError("auth service not configured")
            })?;
            let principal = warden.authorize(&Token::from(token)).await?;
            Ok(Auth(principal))
        })
    }
}
