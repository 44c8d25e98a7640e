use super::*;
use redis::AsyncCommands;

/// Sorted set per bucket key: member = token, score = expiry seconds.
#[derive(Clone)]
pub struct RedisStore {
    client: redis::Client,
}

impl RedisStore {
    pub fn new(url: &str) -> Result<Self, StoreError> {
        Ok(Self {
            client: redis::Client::open(url)?,
        })
    }
    /// Connects using `REDIS_URL`, defaulting to a local instance.
    pub fn from_env() -> Result<Self, StoreError> {
        const REDIS_URL: &str = "redis://localhost:6379";
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| String::from(REDIS_URL));
        Self::new(&url)
    }
    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, StoreError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }
}

#[async_trait::async_trait]
impl KeyValueStore for RedisStore {
    async fn add(&self, key: &str, member: &str, expires: i64) -> Result<(), StoreError> {
        let mut conn = self.connection().await?;
        // key lives as long as its longest-lived member
        let _: () = redis::pipe()
            .zadd(key, member, expires)
            .ignore()
            .cmd("EXPIREAT")
            .arg(key)
            .arg(expires)
            .arg("NX")
            .ignore()
            .cmd("EXPIREAT")
            .arg(key)
            .arg(expires)
            .arg("GT")
            .ignore()
            .query_async(&mut conn)
            .await?;
        Ok(())
    }
    async fn prune(&self, key: &str, now: i64) -> Result<(), StoreError> {
        let mut conn = self.connection().await?;
        let _: () = conn.zrembyscore(key, "-inf", now).await?;
        Ok(())
    }
    async fn members(&self, key: &str, now: i64) -> Result<Vec<String>, StoreError> {
        let mut conn = self.connection().await?;
        let members: Vec<String> = conn.zrangebyscore(key, format!("({}", now), "+inf").await?;
        Ok(members)
    }
    async fn clear(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.connection().await?;
        let _: () = conn.del(key).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_url_is_a_store_error() {
        assert!(RedisStore::new("not a url").is_err());
    }

    // the tests below need a Redis 7 server at REDIS_URL:
    // cargo test -p warden-auth --features redis -- --ignored

    fn key() -> String {
        format!("test:{}", uuid::Uuid::now_v7())
    }
    async fn expiretime(store: &RedisStore, key: &str) -> i64 {
        let mut conn = store.connection().await.unwrap();
        redis::cmd("EXPIRETIME")
            .arg(key)
            .query_async(&mut conn)
            .await
            .unwrap()
    }

    #[tokio::test]
    #[ignore]
    async fn members_respect_expiry() {
        let store = RedisStore::from_env().unwrap();
        let ref key = key();
        let now = warden_core::now();
        store.add(key, "live", now + 200).await.unwrap();
        store.add(key, "dead", now + 100).await.unwrap();
        // exclusive at the boundary
        assert_eq!(store.members(key, now + 100).await.unwrap(), vec![String::from("live")]);
        assert_eq!(store.members(key, now + 99).await.unwrap().len(), 2);
        // inclusive at the boundary
        store.prune(key, now + 100).await.unwrap();
        assert_eq!(store.members(key, now).await.unwrap(), vec![String::from("live")]);
        store.clear(key).await.unwrap();
    }
    #[tokio::test]
    #[ignore]
    async fn key_expiry_tracks_longest_member() {
        let store = RedisStore::from_env().unwrap();
        let ref key = key();
        let now = warden_core::now();
        store.add(key, "a", now + 100).await.unwrap();
        assert_eq!(expiretime(&store, key).await, now + 100);
        store.add(key, "b", now + 300).await.unwrap();
        assert_eq!(expiretime(&store, key).await, now + 300);
        store.add(key, "c", now + 200).await.unwrap();
        assert_eq!(expiretime(&store, key).await, now + 300);
        store.clear(key).await.unwrap();
    }
    #[tokio::test]
    #[ignore]
    async fn clear_drops_everything() {
        let store = RedisStore::from_env().unwrap();
        let ref key = key();
        let now = warden_core::now();
        store.add(key, "a", now + 200).await.unwrap();
        store.add(key, "b", now + 200).await.unwrap();
        store.clear(key).await.unwrap();
        assert!(store.members(key, 0).await.unwrap().is_empty());
        // -2: no such key
        assert_eq!(expiretime(&store, key).await, -2);
    }
    #[tokio::test]
    #[ignore]
    async fn unreachable_server_is_an_error_not_empty() {
        let store = RedisStore::new("redis://127.0.0.1:1").unwrap();
        assert!(store.members("k", 0).await.is_err());
        assert!(store.add("k", "a", 1).await.is_err());
        assert!(store.clear("k").await.is_err());
    }
}
