use crate::domain_model::*;
use crate::domain_port::{DecodedToken, RefreshTokenStore, SignerError, StoreError, TokenSigner};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct TokenLifetimes {
    pub access: Duration,
    pub refresh: Duration,
}

/// Mints access/refresh pairs and keeps the refresh store pointing at the one
/// refresh token each login may use next.
///
/// Session writes are delete-then-put. The two calls are not atomic: two
/// refreshes racing on one login can leave either caller's token stored.
pub struct TokenIssuer {
    signer: Arc<dyn TokenSigner>,
    store: Arc<dyn RefreshTokenStore>,
    keys: SigningMaterial,
    lifetimes: TokenLifetimes,
}

impl TokenIssuer {
    pub fn new(
        signer: Arc<dyn TokenSigner>,
        store: Arc<dyn RefreshTokenStore>,
        keys: SigningMaterial,
        lifetimes: TokenLifetimes,
    ) -> Self {
        TokenIssuer {
            signer,
            store,
            keys,
            lifetimes,
        }
    }

    pub fn mint_pair(&self, claims: &ClaimSet) -> Result<TokenPair, SignerError> {
        self.mint_pair_at(claims, Utc::now())
    }

    fn mint_pair_at(&self, claims: &ClaimSet, now: DateTime<Utc>) -> Result<TokenPair, SignerError> {
        let access_expires_at = expiry_after(now, self.lifetimes.access)
            .ok_or_else(|| SignerError::Encoding("access lifetime out of range".to_string()))?;
        let refresh_expires_at = expiry_after(now, self.lifetimes.refresh)
            .ok_or_else(|| SignerError::Encoding("refresh lifetime out of range".to_string()))?;

        let access = self
            .signer
            .issue(claims, now, access_expires_at, self.keys.access())?;
        let refresh = self
            .signer
            .issue(claims, now, refresh_expires_at, self.keys.refresh())?;

        Ok(TokenPair {
            access_token: AccessToken(access),
            refresh_token: RefreshToken(refresh),
            access_expires_at,
        })
    }

    pub async fn record_new_session(
        &self,
        login: &str,
        refresh_token: &RefreshToken,
    ) -> Result<(), StoreError> {
        self.replace_session(login, refresh_token).await
    }

    pub async fn rotate_session(
        &self,
        login: &str,
        new_refresh_token: &RefreshToken,
    ) -> Result<(), StoreError> {
        self.replace_session(login, new_refresh_token).await
    }

    // Deleting first means a failed put leaves no record rather than the old one.
    async fn replace_session(&self, login: &str, token: &RefreshToken) -> Result<(), StoreError> {
        self.store.delete(login).await?;
        self.store
            .put(login, token.as_str(), self.lifetimes.refresh)
            .await
    }

    pub async fn session_is_valid(&self, login: &str, presented: &str) -> Result<bool, StoreError> {
        self.store.is_valid(login, presented).await
    }

    pub async fn end_session(&self, login: &str) -> Result<(), StoreError> {
        self.store.delete(login).await
    }

    pub fn decode_refresh(&self, token: &str) -> Result<DecodedToken, SignerError> {
        self.signer.decode_unverified(token)
    }

    pub fn verify_access(&self, token: &str) -> Result<ClaimSet, SignerError> {
        self.signer.verify(token, self.keys.access())
    }

    pub fn verify_refresh(&self, token: &str) -> Result<ClaimSet, SignerError> {
        self.signer.verify(token, self.keys.refresh())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::{CacheRefreshTokenStore, JwtHs256Signer};
    use crate::infra_memory::{InMemoryCache, RecordingCache};

    const LIFETIMES: TokenLifetimes = TokenLifetimes {
        access: Duration::from_secs(300),
        refresh: Duration::from_secs(3600),
    };

    fn issuer_over(cache: Arc<dyn crate::domain_port::ExpiringCache>) -> TokenIssuer {
        TokenIssuer::new(
            Arc::new(JwtHs256Signer::new("identity.test", "identity.clients")),
            Arc::new(CacheRefreshTokenStore::new(cache)),
            SigningMaterial::new("access-secret-0123456789", "refresh-secret-0123456789").unwrap(),
            LIFETIMES,
        )
    }

    fn issuer() -> TokenIssuer {
        issuer_over(Arc::new(InMemoryCache::new()))
    }

    #[test]
    fn mint_pair_computes_access_expiry() {
        let issuer = issuer();
        let now = Utc::now();
        let pair = issuer.mint_pair_at(&ClaimSet::new("alice"), now).unwrap();

        assert!(!pair.access_token.0.is_empty());
        assert!(!pair.refresh_token.0.is_empty());
        assert_eq!(pair.access_expires_at, now + LIFETIMES.access);

        let refresh = issuer.decode_refresh(pair.refresh_token.as_str()).unwrap();
        assert_eq!(
            refresh.expires_at.timestamp(),
            (now + LIFETIMES.refresh).timestamp()
        );
    }

    #[test]
    fn pair_tokens_are_signed_with_separate_keys() {
        let issuer = issuer();
        let pair = issuer.mint_pair(&ClaimSet::new("alice")).unwrap();

        assert_eq!(issuer.verify_access(pair.access_token.as_str()).unwrap().login(), "alice");
        assert_eq!(issuer.verify_refresh(pair.refresh_token.as_str()).unwrap().login(), "alice");
        assert!(issuer.verify_access(pair.refresh_token.as_str()).is_err());
        assert!(issuer.verify_refresh(pair.access_token.as_str()).is_err());
    }

    #[test]
    fn oversized_lifetime_is_an_error() {
        let issuer = TokenIssuer::new(
            Arc::new(JwtHs256Signer::new("identity.test", "identity.clients")),
            Arc::new(CacheRefreshTokenStore::new(Arc::new(InMemoryCache::new()))),
            SigningMaterial::new("access-secret-0123456789", "refresh-secret-0123456789").unwrap(),
            TokenLifetimes {
                access: Duration::from_secs(300),
                refresh: Duration::from_secs(10_000_000_000_000),
            },
        );
        assert!(matches!(
            issuer.mint_pair(&ClaimSet::new("alice")),
            Err(SignerError::Encoding(_))
        ));
    }

    #[tokio::test]
    async fn new_session_accepts_only_its_token() {
        let issuer = issuer();
        let pair = issuer.mint_pair(&ClaimSet::new("alice")).unwrap();
        issuer.record_new_session("alice", &pair.refresh_token).await.unwrap();

        assert!(issuer.session_is_valid("alice", pair.refresh_token.as_str()).await.unwrap());
        assert!(!issuer.session_is_valid("alice", pair.access_token.as_str()).await.unwrap());
        assert!(!issuer.session_is_valid("alice", "anything-else").await.unwrap());
    }

    #[tokio::test]
    async fn rotation_invalidates_previous_token() {
        let issuer = issuer();
        let first = RefreshToken("rt-1".to_string());
        let second = RefreshToken("rt-2".to_string());
        issuer.record_new_session("alice", &first).await.unwrap();

        issuer.rotate_session("alice", &second).await.unwrap();

        assert!(!issuer.session_is_valid("alice", "rt-1").await.unwrap());
        assert!(issuer.session_is_valid("alice", "rt-2").await.unwrap());
    }

    #[tokio::test]
    async fn end_session_clears_record() {
        let issuer = issuer();
        issuer
            .record_new_session("alice", &RefreshToken("rt-1".to_string()))
            .await
            .unwrap();

        issuer.end_session("alice").await.unwrap();
        issuer.end_session("alice").await.unwrap();

        assert!(!issuer.session_is_valid("alice", "rt-1").await.unwrap());
    }

    #[tokio::test]
    async fn failed_put_leaves_no_stale_record() {
        let cache = Arc::new(RecordingCache::new());
        let issuer = issuer_over(cache.clone());
        issuer
            .record_new_session("alice", &RefreshToken("rt-1".to_string()))
            .await
            .unwrap();

        cache.fail_sets(true);
        let err = issuer
            .rotate_session("alice", &RefreshToken("rt-2".to_string()))
            .await;
        assert!(matches!(err, Err(StoreError::Unavailable(_))));
        assert_eq!(cache.deletes(), 2);

        cache.fail_sets(false);
        assert!(!issuer.session_is_valid("alice", "rt-1").await.unwrap());
        assert!(!issuer.session_is_valid("alice", "rt-2").await.unwrap());
    }
}
