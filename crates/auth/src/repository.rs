use super::*;
use std::sync::Arc;
use tokio_postgres::Client;
use tokio_postgres::error::SqlState;
use warden_core::ID;
use warden_core::Unique;

pub const USERS: &str = "users";

/// Postgres-side schema bookkeeping beyond the directory capability.
#[allow(async_fn_in_trait)]
pub trait UserRepository {
    async fn migrate(&self) -> Result<(), AuthError>;
}

impl UserRepository for Arc<Client> {
    async fn migrate(&self) -> Result<(), AuthError> {
        self.batch_execute(const_format::concatcp!(
            "CREATE TABLE IF NOT EXISTS ",
            USERS,
            " (
                id          UUID PRIMARY KEY,
                email       VARCHAR(255) UNIQUE NOT NULL,
                hashword    TEXT NOT NULL,
                active      BOOLEAN NOT NULL DEFAULT TRUE
            );
            CREATE INDEX IF NOT EXISTS idx_users_email ON ",
            USERS,
            " (email);"
        ))
        .await
        .map_err(AuthError::from)
    }
}

fn hydrate(row: tokio_postgres::Row) -> Principal {
    Principal::new(
        ID::from(row.get::<_, uuid::Uuid>(0)),
        row.get::<_, String>(1),
        row.get::<_, String>(2),
        row.get::<_, bool>(3),
    )
}

#[async_trait::async_trait]
impl PrincipalDirectory for Arc<Client> {
    async fn create(&self, identifier: &str, password: &str) -> Result<Principal, AuthError> {
        let principal = Principal::new(
            ID::default(),
            identifier.to_lowercase(),
            password::hash(password)?,
            true,
        );
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                USERS,
                " (id, email, hashword, active) VALUES ($1, $2, $3, $4)"
            ),
            &[
                &principal.id().inner(),
                &principal.identifier(),
                &principal.hashword(),
                &principal.active(),
            ],
        )
        .await
        .map_err(|e| match e.code() == Some(&SqlState::UNIQUE_VIOLATION) {
            true => AuthError::AlreadyRegistered,
            false => AuthError::from(e),
        })?;
        Ok(principal)
    }

    async fn authenticate(&self, identifier: &str, secret: &str) -> Result<Option<Principal>, AuthError> {
        let identifier = identifier.to_lowercase();
        Ok(self
            .query_opt(
                const_format::concatcp!(
                    "SELECT id, email, hashword, active FROM ",
                    USERS,
                    " WHERE email = $1"
                ),
                &[&identifier],
            )
            .await?
            .map(hydrate)
            .filter(|p| password::verify(secret, p.hashword())))
    }

    async fn get(&self, id: ID<Principal>) -> Result<Option<Principal>, AuthError> {
        Ok(self
            .query_opt(
                const_format::concatcp!(
                    "SELECT id, email, hashword, active FROM ",
                    USERS,
                    " WHERE id = $1"
                ),
                &[&id.inner()],
            )
            .await?
            .map(hydrate))
    }

    async fn update_credential_hash(&self, id: ID<Principal>, hashword: &str) -> Result<(), AuthError> {
        match self
            .execute(
                const_format::concatcp!("UPDATE ", USERS, " SET hashword = $2 WHERE id = $1"),
                &[&id.inner(), &hashword],
            )
            .await?
        {
            0 => Err(AuthError::InvalidCredentials),
            _ => Ok(()),
        }
    }
}

/// Establishes a database connection from `DB_URL`.
pub async fn db() -> Result<Arc<Client>, AuthError> {
    log::info!("connecting to database");
    let tls = tokio_postgres::tls::NoTls;
    let ref url = std::env::var("DB_URL")
        .map_err(|_| AuthError::DirectoryUnavailable(String::from("DB_URL must be set")))?;
    let (client, connection) = tokio_postgres::connect(url, tls).await?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            log::error!("database connection closed: {}", e);
        }
    });
    Ok(Arc::new(client))
}
