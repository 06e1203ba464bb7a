//! Walks one session through login, two refreshes and a replayed token,
//! entirely against the in-memory backends.
//!
//! $ cargo run --bin rotation_demo

use refresh_identity::application_impl::*;
use refresh_identity::application_port::*;
use refresh_identity::domain_model::SigningMaterial;
use refresh_identity::infra_memory::{InMemoryCache, InMemoryUserRepo};
use refresh_identity::logger::*;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let logger = Logger::new_bootstrap();
    logger.reload_from_config(&LogConfig {
        filter: "rotation_demo=info,refresh_identity=debug".to_string(),
    })?;

    let issuer = TokenIssuer::new(
        Arc::new(JwtHs256Signer::new("rotation-demo", "rotation-demo-clients")),
        Arc::new(CacheRefreshTokenStore::new(Arc::new(InMemoryCache::new()))),
        SigningMaterial::new("demo-access-key-0000", "demo-refresh-key-0000")?,
        TokenLifetimes {
            access: Duration::from_secs(60),
            refresh: Duration::from_secs(600),
        },
    );
    let service = RealIdentityService::new(Arc::new(InMemoryUserRepo::new()), issuer);

    service
        .signup(SignupInput {
            login: "alice".to_string(),
            password: "hunter12".to_string(),
            email: "alice@example.com".to_string(),
        })
        .await?;

    let first = service
        .login(LoginInput {
            login: "alice".to_string(),
            password: "hunter12".to_string(),
        })
        .await?;
    info!(expires = %first.access_expires_at, "logged in");

    let second = service.refresh(first.refresh_token.as_str()).await?;
    info!("first refresh accepted");

    match service.refresh(first.refresh_token.as_str()).await {
        Err(e) => info!("replayed token rejected: {}", e),
        Ok(_) => error!("replayed token was accepted"),
    }

    let third = service.refresh(second.refresh_token.as_str()).await?;
    let claims = service.authenticate(third.access_token.as_str()).await?;
    info!(login = claims.login(), "latest access token verified");

    service.logout(claims.login()).await?;
    match service.refresh(third.refresh_token.as_str()).await {
        Err(e) => info!("refresh after logout rejected: {}", e),
        Ok(_) => error!("refresh after logout was accepted"),
    }

    Ok(())
}
