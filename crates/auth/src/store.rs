use super::*;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use tokio::sync::RwLock;

/// Key-value capability the session registry runs on: a set of members per
/// key, each member carrying its own absolute expiry in unix seconds.
///
/// Every call is one independent round trip. An unreachable backend is an
/// `Err`, never an empty listing.
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Adds (or re-stamps) `member` under `key`, live while `expires > now`.
    async fn add(&self, key: &str, member: &str, expires: i64) -> Result<(), StoreError>;
    /// Drops members whose expiry is at or before `now`.
    async fn prune(&self, key: &str, now: i64) -> Result<(), StoreError>;
    /// Members still live at `now`.
    async fn members(&self, key: &str, now: i64) -> Result<Vec<String>, StoreError>;
    /// Removes the whole key.
    async fn clear(&self, key: &str) -> Result<(), StoreError>;
}

/// In-process store. Can be switched offline to simulate an outage.
#[derive(Default)]
pub struct MemoryStore {
    buckets: RwLock<HashMap<String, HashMap<String, i64>>>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }
    /// Raw entry count under `key`, expired members included.
    pub async fn len(&self, key: &str) -> usize {
        self.buckets.read().await.get(key).map_or(0, |b| b.len())
    }
    fn reachable(&self) -> Result<(), StoreError> {
        match self.offline.load(Ordering::SeqCst) {
            true => Err(StoreError(String::from("memory store is offline"))),
            false => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryStore {
    async fn add(&self, key: &str, member: &str, expires: i64) -> Result<(), StoreError> {
        self.reachable()?;
        self.buckets
            .write()
            .await
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string(), expires);
        Ok(())
    }
    async fn prune(&self, key: &str, now: i64) -> Result<(), StoreError> {
        self.reachable()?;
        let mut buckets = self.buckets.write().await;
        if let Some(bucket) = buckets.get_mut(key) {
            bucket.retain(|_, expires| *expires > now);
            if bucket.is_empty() {
                buckets.remove(key);
            }
        }
        Ok(())
    }
    async fn members(&self, key: &str, now: i64) -> Result<Vec<String>, StoreError> {
        self.reachable()?;
        Ok(self
            .buckets
            .read()
            .await
            .get(key)
            .map(|bucket| {
                bucket
                    .iter()
                    .filter(|(_, expires)| **expires > now)
                    .map(|(member, _)| member.clone())
                    .collect()
            })
            .unwrap_or_default())
    }
    async fn clear(&self, key: &str) -> Result<(), StoreError> {
        self.reachable()?;
        self.buckets.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn members_respect_expiry() {
        let store = MemoryStore::default();
        store.add("k", "live", 200).await.unwrap();
        store.add("k", "dead", 100).await.unwrap();
        assert_eq!(store.members("k", 100).await.unwrap(), vec![String::from("live")]);
        assert_eq!(store.len("k").await, 2);
        store.prune("k", 100).await.unwrap();
        assert_eq!(store.len("k").await, 1);
    }
    #[tokio::test]
    async fn clear_drops_everything() {
        let store = MemoryStore::default();
        store.add("k", "a", 200).await.unwrap();
        store.add("k", "b", 200).await.unwrap();
        store.clear("k").await.unwrap();
        assert!(store.members("k", 0).await.unwrap().is_empty());
    }
    #[tokio::test]
    async fn offline_is_an_error_not_empty() {
        let store = MemoryStore::default();
        store.set_offline(true);
        assert!(store.members("k", 0).await.is_err());
        assert!(store.add("k", "a", 1).await.is_err());
        assert!(store.clear("k").await.is_err());
        store.set_offline(false);
        assert!(store.members("k", 0).await.unwrap().is_empty());
    }
}
