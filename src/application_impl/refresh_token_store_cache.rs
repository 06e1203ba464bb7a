use crate::domain_model::{RefreshRecord, expiry_after};
use crate::domain_port::{ExpiringCache, RefreshTokenStore, StoreError};
use crate::logger::*;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

pub const REFRESH_KEY_PREFIX: &str = "RefreshToken";

/// Refresh token state kept in an expiring cache, one record per login under
/// `RefreshToken<login>`.
pub struct CacheRefreshTokenStore {
    cache: Arc<dyn ExpiringCache>,
}

impl CacheRefreshTokenStore {
    pub fn new(cache: Arc<dyn ExpiringCache>) -> Self {
        CacheRefreshTokenStore { cache }
    }

    fn key(login: &str) -> String {
        format!("{}{}", REFRESH_KEY_PREFIX, login)
    }
}

#[async_trait::async_trait]
impl RefreshTokenStore for CacheRefreshTokenStore {
    async fn put(&self, login: &str, token: &str, ttl: Duration) -> Result<(), StoreError> {
        let expires_at = expiry_after(Utc::now(), ttl)
            .ok_or_else(|| StoreError::Unavailable(format!("ttl out of range: {ttl:?}")))?;
        let record = RefreshRecord {
            login: login.to_string(),
            token: token.to_string(),
            expires_at,
        };
        let value = serde_json::to_string(&record)
            .map_err(|e| StoreError::Unavailable(format!("encode refresh record: {e}")))?;
        self.cache.set(&Self::key(login), &value, ttl).await
    }

    async fn is_valid(&self, login: &str, presented: &str) -> Result<bool, StoreError> {
        let Some(value) = self.cache.get(&Self::key(login)).await? else {
            return Ok(false);
        };

        let record: RefreshRecord = match serde_json::from_str(&value) {
            Ok(record) => record,
            Err(e) => {
                warn!(login, "unreadable refresh record: {}", e);
                return Ok(false);
            }
        };

        Ok(record.login == login && record.is_live_at(Utc::now()) && record.matches(presented))
    }

    async fn delete(&self, login: &str) -> Result<(), StoreError> {
        self.cache.delete(&Self::key(login)).await
    }
}
