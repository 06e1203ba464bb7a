use crate::domain_model::expiry_after;
use crate::domain_port::{ExpiringCache, StoreError};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::time::Duration;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Process-local expiring cache. Expired entries are dropped when read;
/// nothing sweeps them in the background.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: DashMap<String, CacheEntry>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait::async_trait]
impl ExpiringCache for InMemoryCache {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        let expires_at = expiry_after(Utc::now(), ttl)
            .ok_or_else(|| StoreError::Unavailable(format!("ttl out of range: {ttl:?}")))?;
        let entry = CacheEntry {
            value: value.to_string(),
            expires_at,
        };
        self.entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let now = Utc::now();
        {
            if let Some(entry) = self.entries.get(key) {
                if entry.is_live_at(now) {
                    return Ok(Some(entry.value.clone()));
                }
            }
        }
        self.entries.remove_if(key, |_, entry| !entry.is_live_at(now));
        Ok(None)
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}
