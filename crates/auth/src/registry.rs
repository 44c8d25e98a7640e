use super::*;
use std::collections::HashSet;
use warden_core::ID;

/// Composite store key for one (principal, kind) bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bucket {
    principal: ID<Principal>,
    kind: Kind,
}

impl Bucket {
    pub fn new(principal: ID<Principal>, kind: Kind) -> Self {
        Self { principal, kind }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user:{}:{}", self.principal, self.kind)
    }
}

/// Tokens currently registered as valid, per principal and kind.
///
/// An empty bucket and an unreachable store are different answers:
/// the first is `Ok(empty)`, the second is `Err(StoreUnavailable)`.
pub struct SessionRegistry<S> {
    store: S,
}

impl<S> SessionRegistry<S>
where
    S: KeyValueStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Live tokens in the bucket. Expired entries are pruned on the way.
    pub async fn valid_tokens(&self, principal: ID<Principal>, kind: Kind) -> Result<HashSet<Token>, AuthError> {
        let ref key = Bucket::new(principal, kind).to_string();
        let now = warden_core::now();
        self.store
            .prune(key, now)
            .await
            .inspect_err(|e| log::warn!("registry prune failed for {}: {}", key, e))?;
        let members = self
            .store
            .members(key, now)
            .await
            .inspect_err(|e| log::warn!("registry read failed for {}: {}", key, e))?;
        Ok(members.into_iter().map(Token::from).collect())
    }

    /// Records `token` as valid until `expires` (unix seconds), which is the
    /// token's own `exp` claim. No deduplication across devices.
    pub async fn register(&self, principal: ID<Principal>, kind: Kind, token: &Token, expires: i64) -> Result<(), AuthError> {
        let ref key = Bucket::new(principal, kind).to_string();
        log::debug!("registering {} token for {}", kind, principal);
        self.store
            .add(key, token.as_str(), expires)
            .await
            .inspect_err(|e| log::warn!("registry write failed for {}: {}", key, e))
            .map_err(AuthError::from)
    }

    /// Removes every entry in the bucket.
    pub async fn purge_all(&self, principal: ID<Principal>, kind: Kind) -> Result<(), AuthError> {
        let ref key = Bucket::new(principal, kind).to_string();
        log::debug!("purging {} tokens for {}", kind, principal);
        self.store
            .clear(key)
            .await
            .inspect_err(|e| log::warn!("registry purge failed for {}: {}", key, e))
            .map_err(AuthError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SessionRegistry<MemoryStore> {
        SessionRegistry::new(MemoryStore::default())
    }

    #[test]
    fn bucket_key_is_stable() {
        let id = "0190d3a4-0000-7000-8000-000000000001".parse::<ID<Principal>>().unwrap();
        assert_eq!(
            Bucket::new(id, Kind::Refresh).to_string(),
            "user:0190d3a4-0000-7000-8000-000000000001:refresh"
        );
    }
    #[tokio::test]
    async fn empty_bucket_is_ok_and_empty() {
        let registry = registry();
        let tokens = registry
            .valid_tokens(ID::default(), Kind::Access)
            .await
            .unwrap();
        assert!(tokens.is_empty());
    }
    #[tokio::test]
    async fn register_is_additive() {
        let registry = registry();
        let id = ID::default();
        let later = warden_core::now() + 600;
        registry.register(id, Kind::Access, &Token::from("a"), later).await.unwrap();
        registry.register(id, Kind::Access, &Token::from("b"), later).await.unwrap();
        let tokens = registry.valid_tokens(id, Kind::Access).await.unwrap();
        assert_eq!(tokens.len(), 2);
        assert!(tokens.contains(&Token::from("a")));
        assert!(tokens.contains(&Token::from("b")));
    }
    #[tokio::test]
    async fn buckets_are_isolated_by_kind_and_principal() {
        let registry = registry();
        let (alice, bob) = (ID::default(), ID::default());
        let later = warden_core::now() + 600;
        registry.register(alice, Kind::Access, &Token::from("a"), later).await.unwrap();
        assert!(registry.valid_tokens(alice, Kind::Refresh).await.unwrap().is_empty());
        assert!(registry.valid_tokens(bob, Kind::Access).await.unwrap().is_empty());
    }
    #[tokio::test]
    async fn expired_entries_are_pruned_on_read() {
        let registry = registry();
        let id = ID::default();
        let now = warden_core::now();
        registry.register(id, Kind::Refresh, &Token::from("old"), now - 1).await.unwrap();
        registry.register(id, Kind::Refresh, &Token::from("new"), now + 600).await.unwrap();
        let ref key = Bucket::new(id, Kind::Refresh).to_string();
        assert_eq!(registry.store().len(key).await, 2);
        let tokens = registry.valid_tokens(id, Kind::Refresh).await.unwrap();
        assert_eq!(tokens, HashSet::from([Token::from("new")]));
        assert_eq!(registry.store().len(key).await, 1);
    }
    #[tokio::test]
    async fn purge_empties_only_that_bucket() {
        let registry = registry();
        let id = ID::default();
        let later = warden_core::now() + 600;
        registry.register(id, Kind::Access, &Token::from("a"), later).await.unwrap();
        registry.register(id, Kind::Refresh, &Token::from("r"), later).await.unwrap();
        registry.purge_all(id, Kind::Access).await.unwrap();
        assert!(registry.valid_tokens(id, Kind::Access).await.unwrap().is_empty());
        assert_eq!(registry.valid_tokens(id, Kind::Refresh).await.unwrap().len(), 1);
    }
    #[tokio::test]
    async fn outage_is_not_an_empty_bucket() {
        let registry = registry();
        registry.store().set_offline(true);
        let err = registry
            .valid_tokens(ID::default(), Kind::Refresh)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::StoreUnavailable(_)));
    }
}
