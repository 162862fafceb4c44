use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// In-process cache for the skill and role catalogues
///
/// Entries are stored as serialized JSON and expire after the configured
/// TTL. Writers invalidate the matching key after a successful insert.
pub struct CatalogCache {
    entries: moka::future::Cache<String, Vec<u8>>,
}

impl CatalogCache {
    pub fn new(max_entries: u64, ttl_secs: u64) -> Self {
        let entries = moka::future::CacheBuilder::new(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { entries }
    }

    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        match self.entries.get(key).await {
            Some(bytes) => {
                tracing::trace!("Cache hit: {}", key);
                Ok(serde_json::from_slice(&bytes)?)
            }
            None => {
                tracing::trace!("Cache miss: {}", key);
                Err(CacheError::CacheMiss(key.to_string()))
            }
        }
    }

    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let bytes = serde_json::to_vec(value)?;
        self.entries.insert(key.to_string(), bytes).await;

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    pub async fn delete(&self, key: &str) {
        self.entries.invalidate(key).await;
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    pub fn skills() -> &'static str {
        "catalog:skills"
    }

    pub fn roles() -> &'static str {
        "catalog:job_roles"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobSkill;

    #[tokio::test]
    async fn test_cache_set_get_delete() {
        let cache = CatalogCache::new(16, 60);
        let skills = vec![JobSkill {
            id: 1,
            name: "Rust".to_string(),
        }];

        assert!(matches!(
            cache.get::<Vec<JobSkill>>(CacheKey::skills()).await,
            Err(CacheError::CacheMiss(_))
        ));

        cache.set(CacheKey::skills(), &skills).await.unwrap();
        let cached: Vec<JobSkill> = cache.get(CacheKey::skills()).await.unwrap();
        assert_eq!(cached, skills);

        cache.delete(CacheKey::skills()).await;
        assert!(cache.get::<Vec<JobSkill>>(CacheKey::skills()).await.is_err());
    }

    #[test]
    fn test_cache_key_builder() {
        assert_eq!(CacheKey::skills(), "catalog:skills");
        assert_eq!(CacheKey::roles(), "catalog:job_roles");
    }
}
