use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_mysql::*;
use crate::infra_redis::*;
use crate::logger::*;
use crate::settings::Settings;
use anyhow::anyhow;
use sqlx::{MySql, Pool};
use std::sync::Arc;

pub struct Server {
    pub identity_service: Arc<dyn IdentityService>,
    pool: Option<Pool<MySql>>,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        match settings.identity.backend.as_str() {
            "fake" => {
                warn!("identity backend is fake; tokens are not signed");
                Ok(Self::with_service(Arc::new(FakeIdentityService::new())))
            }
            "real" => {
                let cache = build_cache(settings).await?;
                let (user_repo, pool) = build_user_repo(settings).await?;
                let issuer = build_issuer(settings, cache)?;

                info!("server started");
                Ok(Self {
                    identity_service: Arc::new(RealIdentityService::new(user_repo, issuer)),
                    pool,
                })
            }
            other => Err(anyhow!("Unknown identity backend: {}", other)),
        }
    }

    pub fn with_service(identity_service: Arc<dyn IdentityService>) -> Self {
        Self {
            identity_service,
            pool: None,
        }
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}

async fn build_cache(settings: &Settings) -> anyhow::Result<Arc<dyn ExpiringCache>> {
    let cache = &settings.cache;
    match cache.backend.as_str() {
        "memory" => Ok(Arc::new(InMemoryCache::new())),
        "redis" => {
            let url = cache
                .redis_url
                .as_deref()
                .ok_or_else(|| anyhow!("cache.redis_url is required for the redis backend"))?;
            let redis = RedisCache::connect(url, cache.key_prefix.clone()).await?;
            info!("refresh tokens stored in redis");
            Ok(Arc::new(redis))
        }
        other => Err(anyhow!("Unknown cache backend: {}", other)),
    }
}

async fn build_user_repo(
    settings: &Settings,
) -> anyhow::Result<(Arc<dyn UserRepo>, Option<Pool<MySql>>)> {
    let user = &settings.user;
    match user.backend.as_str() {
        "memory" => Ok((Arc::new(InMemoryUserRepo::new()), None)),
        "mysql" => {
            let url = user
                .mysql_url
                .as_deref()
                .ok_or_else(|| anyhow!("user.mysql_url is required for the mysql backend"))?;
            let pool = Pool::<MySql>::connect(url).await?;
            Ok((Arc::new(MySqlUserRepo::new(pool.clone())), Some(pool)))
        }
        other => Err(anyhow!("Unknown user backend: {}", other)),
    }
}

fn build_issuer(settings: &Settings, cache: Arc<dyn ExpiringCache>) -> anyhow::Result<TokenIssuer> {
    let token = &settings.token;
    token.validate()?;

    let signer: Arc<dyn TokenSigner> =
        Arc::new(JwtHs256Signer::new(&token.issuer, &token.audience));
    let store: Arc<dyn RefreshTokenStore> = Arc::new(CacheRefreshTokenStore::new(cache));

    Ok(TokenIssuer::new(
        signer,
        store,
        token.signing_material()?,
        TokenLifetimes {
            access: token.access_lifetime(),
            refresh: token.refresh_lifetime(),
        },
    ))
}
