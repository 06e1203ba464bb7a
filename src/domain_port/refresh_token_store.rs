use crate::domain_port::StoreError;
use std::time::Duration;

#[async_trait::async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Overwrite whatever is stored for `login` with `token`, live for `ttl`.
    async fn put(&self, login: &str, token: &str, ttl: Duration) -> Result<(), StoreError>;
    /// True only for a live record whose token equals `presented` exactly.
    async fn is_valid(&self, login: &str, presented: &str) -> Result<bool, StoreError>;
    /// Idempotent.
    async fn delete(&self, login: &str) -> Result<(), StoreError>;
}
