use super::*;
use warden_core::ID;
use warden_core::Unique;

/// Login, refresh, authorization, and password change over a codec,
/// a session registry, and a principal directory.
///
/// Holds no per-request state. A bucket that is empty in the registry is
/// unseeded: tokens for it are trusted on signature alone and new ones are
/// not recorded. Password change seeds both buckets, after which the
/// registry is authoritative for that principal.
pub struct AuthOrchestrator<D, S> {
    config: Config,
    codec: TokenCodec,
    registry: SessionRegistry<S>,
    directory: D,
}

impl<D, S> AuthOrchestrator<D, S>
where
    D: PrincipalDirectory,
    S: KeyValueStore,
{
    pub fn new(config: Config, directory: D, store: S) -> Self {
        Self {
            codec: TokenCodec::new(&config),
            registry: SessionRegistry::new(store),
            config,
            directory,
        }
    }
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }
    pub fn registry(&self) -> &SessionRegistry<S> {
        &self.registry
    }
    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Creates an active principal. Issues no tokens and touches no bucket.
    pub async fn register(&self, identifier: &str, secret: &str) -> Result<Principal, AuthError> {
        let principal = self.directory.create(identifier, secret).await?;
        log::info!("principal {} registered", principal.id());
        Ok(principal)
    }

    pub async fn login(&self, identifier: &str, secret: &str) -> Result<TokenPair, AuthError> {
        let principal = self.authenticate(identifier, secret).await?;
        let access = self.issue(&principal, Kind::Access)?;
        let refresh = self.issue(&principal, Kind::Refresh)?;
        self.admit(&principal, &access).await?;
        self.admit(&principal, &refresh).await?;
        log::info!("principal {} logged in", principal.id());
        Ok(TokenPair {
            access: access.token,
            refresh: refresh.token,
        })
    }

    /// Password-form login yielding only an access token.
    pub async fn login_access(&self, identifier: &str, secret: &str) -> Result<Token, AuthError> {
        let principal = self.authenticate(identifier, secret).await?;
        let access = self.issue(&principal, Kind::Access)?;
        self.admit(&principal, &access).await?;
        log::info!("principal {} obtained an access token", principal.id());
        Ok(access.token)
    }

    /// Exchanges a refresh token for a new access token.
    /// The refresh token itself is neither reissued nor re-registered.
    pub async fn refresh(&self, token: &Token) -> Result<Token, AuthError> {
        let claims = self.codec.decode(token)?;
        if claims.kind() != Some(Kind::Refresh) {
            return Err(AuthError::WrongTokenType);
        }
        let id = claims.principal()?;
        self.recognize(id, Kind::Refresh, token).await?;
        let principal = self.active(id).await?;
        let access = self.issue(&principal, Kind::Access)?;
        self.admit(&principal, &access).await?;
        log::debug!("principal {} refreshed an access token", id);
        Ok(access.token)
    }

    /// Resolves the principal behind an access token.
    pub async fn authorize(&self, token: &Token) -> Result<Principal, AuthError> {
        let claims = self.codec.decode(token)?;
        if claims.kind() != Some(Kind::Access) {
            return Err(AuthError::WrongTokenType);
        }
        let id = claims.principal()?;
        self.recognize(id, Kind::Access, token).await?;
        self.active(id).await
    }

    /// Replaces the credential, revokes every outstanding token, and seeds
    /// both buckets with the freshly issued pair.
    pub async fn change_password(&self, id: ID<Principal>, current: &str, new: &str) -> Result<TokenPair, AuthError> {
        let principal = self
            .directory
            .get(id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        if !password::verify(current, principal.hashword()) {
            return Err(AuthError::InvalidCredentials);
        }
        if password::verify(new, principal.hashword()) {
            return Err(AuthError::SamePasswordReuse);
        }
        let hashword = password::hash(new)?;
        self.directory.update_credential_hash(id, &hashword).await?;
        self.registry.purge_all(id, Kind::Access).await?;
        self.registry.purge_all(id, Kind::Refresh).await?;
        let access = self.issue(&principal, Kind::Access)?;
        let refresh = self.issue(&principal, Kind::Refresh)?;
        self.seed(&principal, &access).await?;
        self.seed(&principal, &refresh).await?;
        log::info!("principal {} changed password", id);
        Ok(TokenPair {
            access: access.token,
            refresh: refresh.token,
        })
    }

    async fn authenticate(&self, identifier: &str, secret: &str) -> Result<Principal, AuthError> {
        match self.directory.authenticate(identifier, secret).await? {
            None => Err(AuthError::InvalidCredentials),
            Some(p) if !p.active() => Err(AuthError::InactiveAccount),
            Some(p) => Ok(p),
        }
    }

    async fn active(&self, id: ID<Principal>) -> Result<Principal, AuthError> {
        match self.directory.get(id).await? {
            None => Err(AuthError::InvalidCredentials),
            Some(p) if !p.active() => Err(AuthError::InactiveAccount),
            Some(p) => Ok(p),
        }
    }

    fn issue(&self, principal: &Principal, kind: Kind) -> Result<Issued, AuthError> {
        let ttl = match kind {
            Kind::Access => self.config.access_ttl(),
            Kind::Refresh => self.config.refresh_ttl(),
        };
        self.codec.issue(principal.id(), kind, ttl)
    }

    /// A seeded bucket must contain the presented token; an unseeded one is bypassed.
    async fn recognize(&self, id: ID<Principal>, kind: Kind, token: &Token) -> Result<(), AuthError> {
        let valid = self.registry.valid_tokens(id, kind).await?;
        if !valid.is_empty() && !valid.contains(token) {
            log::warn!("rejected unrecognized {} token for {}", kind, id);
            return Err(AuthError::TokenNotRecognized);
        }
        Ok(())
    }

    /// Registers only into buckets that are already seeded.
    async fn admit(&self, principal: &Principal, issued: &Issued) -> Result<(), AuthError> {
        let kind = issued.kind;
        match self.registry.valid_tokens(principal.id(), kind).await?.is_empty() {
            true => Ok(()),
            false => self.seed(principal, issued).await,
        }
    }

    async fn seed(&self, principal: &Principal, issued: &Issued) -> Result<(), AuthError> {
        self.registry
            .register(
                principal.id(),
                issued.kind,
                &issued.token,
                issued.claims.expires(),
            )
            .await
    }
}
