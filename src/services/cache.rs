use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// Multi-tier cache manager
///
/// L1 is an in-process cache, L2 is redis and shared across instances.
/// Without a redis URL (or when redis is unreachable at start-up) only L1
/// is used.
pub struct CacheManager {
    // ConnectionManager multiplexes one connection and is cheap to clone
    redis: Option<ConnectionManager>,
    l1_cache: moka::future::Cache<String, Vec<u8>>,
    ttl_secs: u64,
}

impl CacheManager {
    /// Create an in-process only cache
    pub fn local(l1_size: u64, ttl_secs: u64) -> Self {
        let l1_cache = moka::future::CacheBuilder::new(l1_size)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            redis: None,
            l1_cache,
            ttl_secs,
        }
    }

    /// Create a cache manager backed by redis
    pub async fn new(redis_url: &str, l1_size: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = redis::aio::ConnectionManager::new(client).await?;

        let mut manager = Self::local(l1_size, ttl_secs);
        manager.redis = Some(redis);

        Ok(manager)
    }

    /// Connect to redis if possible, falling back to L1 only
    pub async fn connect_or_local(redis_url: Option<&str>, l1_size: u64, ttl_secs: u64) -> Self {
        let Some(url) = redis_url else {
            return Self::local(l1_size, ttl_secs);
        };

        match Self::new(url, l1_size, ttl_secs).await {
            Ok(manager) => manager,
            Err(e) => {
                tracing::error!("Failed to connect to Redis ({}), using in-process cache only", e);
                Self::local(l1_size, ttl_secs)
            }
        }
    }

    pub fn has_shared_tier(&self) -> bool {
        self.redis.is_some()
    }

    /// Get a value from cache (L1 first, then L2)
    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        if let Some(bytes) = self.l1_cache.get(key).await {
            tracing::trace!("L1 cache hit: {}", key);
            return Ok(serde_json::from_slice(&bytes)?);
        }

        if let Some(redis) = &self.redis {
            let mut conn = redis.clone();
            let value: Option<String> = redis::cmd("GET")
                .arg(key)
                .query_async(&mut conn)
                .await?;

            if let Some(json) = value {
                tracing::trace!("L2 cache hit: {}", key);

                // Populate L1 cache
                let bytes = json.as_bytes().to_vec();
                self.l1_cache.insert(key.to_string(), bytes).await;

                return Ok(serde_json::from_str(&json)?);
            }
        }

        tracing::trace!("Cache miss: {}", key);
        Err(CacheError::CacheMiss(key.to_string()))
    }

    /// Set a value in cache (both tiers)
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let json = serde_json::to_string(value)?;

        self.l1_cache
            .insert(key.to_string(), json.as_bytes().to_vec())
            .await;

        if let Some(redis) = &self.redis {
            let mut conn = redis.clone();
            redis::cmd("SETEX")
                .arg(key)
                .arg(self.ttl_secs)
                .arg(json)
                .query_async::<()>(&mut conn)
                .await?;
        }

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    /// Delete a value from both cache tiers
    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.l1_cache.invalidate(key).await;

        if let Some(redis) = &self.redis {
            let mut conn = redis.clone();
            redis::cmd("DEL")
                .arg(key)
                .query_async::<()>(&mut conn)
                .await?;
        }
        Ok(())
    }

    /// Invalidate all cache entries matching a pattern
    pub async fn invalidate_pattern(&self, pattern: &str) -> Result<(), CacheError> {
        // L1 has no pattern lookup, drop everything
        self.l1_cache.invalidate_all();

        if let Some(redis) = &self.redis {
            let mut conn = redis.clone();
            let keys: Vec<String> = redis::cmd("KEYS")
                .arg(pattern)
                .query_async(&mut conn)
                .await?;

            if !keys.is_empty() {
                redis::cmd("DEL")
                    .arg(keys)
                    .query_async::<()>(&mut conn)
                    .await?;
            }
        }

        tracing::debug!("Invalidated cache pattern: {}", pattern);
        Ok(())
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            l1_size: self.l1_cache.entry_count(),
            shared_tier: self.has_shared_tier(),
            ttl_secs: self.ttl_secs,
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub l1_size: u64,
    pub shared_tier: bool,
    pub ttl_secs: u64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Venues able to host a group of this size
    pub fn venues_for_group(participant_count: u32) -> String {
        format!("venues:group:{}", participant_count)
    }

    /// Pattern covering every venue key
    pub fn all_venues() -> &'static str {
        "venues:*"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Venue;

    #[tokio::test]
    async fn test_local_cache_set_get() {
        let cache = CacheManager::local(100, 60);
        let key = CacheKey::venues_for_group(12);
        let venues = vec![Venue::new("v1", 40.0, 10, 20).with_attribute("city", "Hamburg")];

        cache.set(&key, &venues).await.unwrap();
        let cached: Vec<Venue> = cache.get(&key).await.unwrap();
        assert_eq!(cached, venues);

        cache.delete(&key).await.unwrap();
        assert!(matches!(
            cache.get::<Vec<Venue>>(&key).await,
            Err(CacheError::CacheMiss(_))
        ));
        assert!(!cache.stats().shared_tier);
    }

    #[tokio::test]
    async fn test_invalidate_pattern_clears_l1() {
        let cache = CacheManager::local(100, 60);
        cache.set(&CacheKey::venues_for_group(1), &1u32).await.unwrap();
        cache.set(&CacheKey::venues_for_group(2), &2u32).await.unwrap();

        cache.invalidate_pattern(CacheKey::all_venues()).await.unwrap();

        assert!(cache.get::<u32>(&CacheKey::venues_for_group(1)).await.is_err());
        assert!(cache.get::<u32>(&CacheKey::venues_for_group(2)).await.is_err());
    }

    #[tokio::test]
    async fn test_connect_without_redis_url() {
        let cache = CacheManager::connect_or_local(None, 10, 30).await;
        assert!(!cache.has_shared_tier());
        assert_eq!(cache.stats().ttl_secs, 30);
    }

    #[tokio::test]
    #[ignore = "Requires Redis"]
    async fn test_redis_cache_set_get() {
        let cache = CacheManager::new("redis://127.0.0.1:6379", 1000, 60)
            .await
            .expect("Failed to create cache");

        let key = "test_key";
        let value = "test_value";

        cache.set(key, &value).await.unwrap();
        let result: String = cache.get(key).await.unwrap();
        assert_eq!(result, value);

        cache.delete(key).await.unwrap();
        assert!(cache.get::<String>(key).await.is_err());
    }

    #[test]
    fn test_cache_key_builder() {
        assert_eq!(CacheKey::venues_for_group(20), "venues:group:20");
        assert_eq!(CacheKey::all_venues(), "venues:*");
    }
}
