use super::*;
use std::collections::HashMap;
use tokio::sync::RwLock;
use warden_core::ID;
use warden_core::Unique;

/// Where principals and their credential hashes live.
/// Lookups that find nothing return `Ok(None)`; `Err` means the directory itself failed.
#[async_trait::async_trait]
pub trait PrincipalDirectory: Send + Sync {
    /// Adds an active principal. Identifiers are matched case-insensitively,
    /// and one already taken yields `AlreadyRegistered`.
    async fn create(&self, identifier: &str, password: &str) -> Result<Principal, AuthError>;
    async fn authenticate(&self, identifier: &str, secret: &str) -> Result<Option<Principal>, AuthError>;
    async fn get(&self, id: ID<Principal>) -> Result<Option<Principal>, AuthError>;
    async fn update_credential_hash(&self, id: ID<Principal>, hashword: &str) -> Result<(), AuthError>;
}

/// Process-local directory, for tests and single-node setups.
#[derive(Default)]
pub struct MemoryDirectory {
    principals: RwLock<HashMap<ID<Principal>, Principal>>,
}

impl MemoryDirectory {
    pub async fn deactivate(&self, id: ID<Principal>) {
        if let Some(p) = self.principals.write().await.get_mut(&id) {
            *p = Principal::new(p.id(), p.identifier().to_string(), p.hashword().to_string(), false);
        }
    }
}

#[async_trait::async_trait]
impl PrincipalDirectory for MemoryDirectory {
    async fn create(&self, identifier: &str, password: &str) -> Result<Principal, AuthError> {
        let principal = Principal::new(
            ID::default(),
            identifier.to_lowercase(),
            password::hash(password)?,
            true,
        );
        let mut principals = self.principals.write().await;
        if principals.values().any(|p| p.identifier() == principal.identifier()) {
            return Err(AuthError::AlreadyRegistered);
        }
        principals.insert(principal.id(), principal.clone());
        Ok(principal)
    }
    async fn authenticate(&self, identifier: &str, secret: &str) -> Result<Option<Principal>, AuthError> {
        let identifier = identifier.to_lowercase();
        Ok(self
            .principals
            .read()
            .await
            .values()
            .find(|p| p.identifier() == identifier)
            .filter(|p| password::verify(secret, p.hashword()))
            .cloned())
    }
    async fn get(&self, id: ID<Principal>) -> Result<Option<Principal>, AuthError> {
        Ok(self.principals.read().await.get(&id).cloned())
    }
    async fn update_credential_hash(&self, id: ID<Principal>, hashword: &str) -> Result<(), AuthError> {
        match self.principals.write().await.get_mut(&id) {
            Some(p) => {
                *p = Principal::new(p.id(), p.identifier().to_string(), hashword.to_string(), p.active());
                Ok(())
            }
            None => Err(AuthError::InvalidCredentials),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn authenticate_matches_identifier_and_secret() {
        let directory = MemoryDirectory::default();
        let alice = directory.create("Alice@Example.com", "pw-alice").await.unwrap();
        let found = directory.authenticate("alice@example.com", "pw-alice").await.unwrap();
        assert_eq!(found.map(|p| p.id()), Some(alice.id()));
        assert_eq!(directory.authenticate("alice@example.com", "nope").await.unwrap(), None);
        assert_eq!(directory.authenticate("bob@example.com", "pw-alice").await.unwrap(), None);
    }
    #[tokio::test]
    async fn update_replaces_hash() {
        let directory = MemoryDirectory::default();
        let alice = directory.create("alice@example.com", "old").await.unwrap();
        let hashword = password::hash("new").unwrap();
        directory.update_credential_hash(alice.id(), &hashword).await.unwrap();
        assert!(directory.authenticate("alice@example.com", "new").await.unwrap().is_some());
        assert!(directory.authenticate("alice@example.com", "old").await.unwrap().is_none());
    }
    #[tokio::test]
    async fn create_rejects_taken_identifier() {
        let directory = MemoryDirectory::default();
        directory.create("alice@example.com", "pw").await.unwrap();
        assert_eq!(
            directory.create("ALICE@example.com", "other").await,
            Err(AuthError::AlreadyRegistered)
        );
        assert!(directory.authenticate("alice@example.com", "pw").await.unwrap().is_some());
    }
    #[tokio::test]
    async fn deactivate_keeps_identity() {
        let directory = MemoryDirectory::default();
        let alice = directory.create("alice@example.com", "pw").await.unwrap();
        directory.deactivate(alice.id()).await;
        let found = directory.get(alice.id()).await.unwrap().unwrap();
        assert!(!found.active());
        assert_eq!(found.identifier(), "alice@example.com");
    }
}
