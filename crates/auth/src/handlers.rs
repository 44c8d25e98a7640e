use super::*;
use actix_web::HttpResponse;
use actix_web::ResponseError;
use actix_web::http::StatusCode;
use actix_web::web;
use std::sync::Arc;
use tokio_postgres::Client;
use warden_core::Unique;

/// Orchestrator as deployed: Postgres directory, Redis registry.
pub type Warden = AuthOrchestrator<Arc<Client>, RedisStore>;

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials | Self::InactiveAccount | Self::SamePasswordReuse => {
                StatusCode::BAD_REQUEST
            }
            Self::AlreadyRegistered => StatusCode::CONFLICT,
            Self::ExpiredToken
            | Self::MalformedToken
            | Self::MissingClaim(_)
            | Self::TokenNotRecognized => StatusCode::FORBIDDEN,
            Self::WrongTokenType => StatusCode::NOT_FOUND,
            Self::StoreUnavailable(_) | Self::DirectoryUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        match status.is_server_error() {
            true => {
                log::error!("{}", self);
                HttpResponse::build(status).body("service unavailable")
            }
            false => HttpResponse::build(status).body(self.to_string()),
        }
    }
}

pub async fn register(
    warden: web::Data<Warden>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AuthError> {
    let principal = warden.register(&req.email, &req.password).await?;
    Ok(HttpResponse::Created().json(UserInfo::from(&principal)))
}

pub async fn login(
    warden: web::Data<Warden>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, AuthError> {
    let pair = warden.login(&req.email, &req.password).await?;
    Ok(HttpResponse::Ok().json(TokenResponse::from(pair)))
}

pub async fn token(
    warden: web::Data<Warden>,
    form: web::Form<TokenForm>,
) -> Result<HttpResponse, AuthError> {
    let access = warden.login_access(&form.username, &form.password).await?;
    Ok(HttpResponse::Ok().json(TokenResponse::from(access)))
}

pub async fn refresh(
    warden: web::Data<Warden>,
    req: web::Json<RefreshRequest>,
) -> Result<HttpResponse, actix_web::Error> {
    match warden.refresh(&req.refresh_token).await {
        Ok(access) => Ok(HttpResponse::Created().json(TokenResponse::from(access))),
        Err(e) => Err(refreshing(e)),
    }
}

/// A deactivated account behind a valid refresh token reads as not found.
fn refreshing(e: AuthError) -> actix_web::Error {
    match e {
        AuthError::InactiveAccount => actix_web::error::ErrorNotFound("user inactive"),
        e => actix_web::Error::from(e),
    }
}

pub async fn change_password(
    warden: web::Data<Warden>,
    auth: Auth,
    req: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, AuthError> {
    let pair = warden
        .change_password(
            auth.principal().id(),
            &req.current_password,
            &req.new_password,
        )
        .await?;
    Ok(HttpResponse::Ok().json(TokenResponse::from(pair)))
}
