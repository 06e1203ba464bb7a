use crate::application_port::*;
use crate::domain_model::*;
use chrono::{Duration, Utc};

const FAKE_ACCESS_PREFIX: &str = "fake-access-token:";
const FAKE_REFRESH_PREFIX: &str = "fake-refresh-token:";

#[derive(Debug, Default)]
pub struct FakeIdentityService;

impl FakeIdentityService {
    pub fn new() -> Self {
        Self
    }
}

// Accepts any credentials; tokens are the login behind a fixed prefix.
// Enough to drive a client without a cache or user store running.
#[async_trait::async_trait]
impl IdentityService for FakeIdentityService {
    async fn signup(&self, _request: SignupInput) -> Result<(), AuthError> {
        Ok(())
    }

    async fn login(&self, request: LoginInput) -> Result<TokenPair, AuthError> {
        Ok(get_fake_pair(&request.login))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        match refresh_token.strip_prefix(FAKE_REFRESH_PREFIX) {
            Some(login) if !login.is_empty() => Ok(get_fake_pair(login)),
            _ => Err(AuthError::RefreshTokenMalformed),
        }
    }

    async fn logout(&self, _login: &str) -> Result<(), AuthError> {
        Ok(())
    }

    async fn authenticate(&self, access_token: &str) -> Result<ClaimSet, AuthError> {
        match access_token.strip_prefix(FAKE_ACCESS_PREFIX) {
            Some(login) if !login.is_empty() => Ok(ClaimSet::new(login)),
            _ => Err(AuthError::AccessTokenInvalid),
        }
    }
}

fn get_fake_pair(login: &str) -> TokenPair {
    TokenPair {
        access_token: AccessToken(format!("{FAKE_ACCESS_PREFIX}{login}")),
        refresh_token: RefreshToken(format!("{FAKE_REFRESH_PREFIX}{login}")),
        access_expires_at: Utc::now() + Duration::days(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fake_tokens_round_trip_the_login() {
        let service = FakeIdentityService::new();
        let pair = service
            .login(LoginInput {
                login: "alice".to_string(),
                password: String::new(),
            })
            .await
            .unwrap();

        let claims = service.authenticate(pair.access_token.as_str()).await.unwrap();
        assert_eq!(claims.login(), "alice");
        assert!(service.refresh(pair.refresh_token.as_str()).await.is_ok());
        assert!(matches!(
            service.refresh("garbage").await,
            Err(AuthError::RefreshTokenMalformed)
        ));
    }
}
