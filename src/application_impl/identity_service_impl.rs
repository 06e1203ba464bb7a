use crate::application_impl::{IdentityResolver, TokenIssuer};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::UserRepo;
use crate::logger::*;
use chrono::Utc;
use std::sync::Arc;

const MIN_PASSWORD_LEN: usize = 8;

pub struct RealIdentityService {
    user_repo: Arc<dyn UserRepo>,
    resolver: IdentityResolver,
    issuer: TokenIssuer,
}

impl RealIdentityService {
    pub fn new(user_repo: Arc<dyn UserRepo>, issuer: TokenIssuer) -> Self {
        Self {
            resolver: IdentityResolver::new(user_repo.clone()),
            user_repo,
            issuer,
        }
    }

    fn validate_signup(request: &SignupInput) -> Result<(), AuthError> {
        if request.login.trim().is_empty() {
            return Err(AuthError::InvalidInput("login is required".to_string()));
        }
        if request.email.trim().is_empty() {
            return Err(AuthError::InvalidInput("email is required".to_string()));
        }
        if request.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::InvalidInput(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }

    fn mint(&self, claims: &ClaimSet) -> Result<TokenPair, AuthError> {
        self.issuer
            .mint_pair(claims)
            .map_err(|e| AuthError::InternalError(e.to_string()))
    }
}

#[async_trait::async_trait]
impl IdentityService for RealIdentityService {
    async fn signup(&self, request: SignupInput) -> Result<(), AuthError> {
        Self::validate_signup(&request)?;

        if self.user_repo.login_exists(&request.login).await? {
            return Err(AuthError::LoginTaken);
        }

        let SignupInput {
            login,
            password,
            email,
        } = request;
        self.user_repo
            .create(NewUser {
                login: login.clone(),
                password,
                email,
            })
            .await?;

        info!(login = %login, "user registered");
        Ok(())
    }

    async fn login(&self, request: LoginInput) -> Result<TokenPair, AuthError> {
        let LoginInput { login, password } = request;

        let claims = self
            .resolver
            .resolve_by_credentials(&login, &password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let pair = self.mint(&claims)?;
        self.issuer
            .record_new_session(claims.login(), &pair.refresh_token)
            .await?;

        info!(login = claims.login(), "session started");
        Ok(pair)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        // The signature is not checked here; the store comparison below is
        // what decides whether this token is still the active one.
        let presented = self.issuer.decode_refresh(refresh_token).map_err(|e| {
            warn!("invalid refresh token: {}", e);
            AuthError::RefreshTokenMalformed
        })?;

        if presented.is_expired_at(Utc::now()) {
            warn!("refresh token expired");
            return Err(AuthError::RefreshTokenExpired);
        }

        let Some(login) = presented.login().filter(|l| !l.is_empty()) else {
            warn!("refresh token carries no login");
            return Err(AuthError::RefreshTokenMalformed);
        };

        // An unknown login can never hold a session, so it fails the same way
        // a stale token does.
        let Some(claims) = self.resolver.resolve_by_login(login).await? else {
            return Err(AuthError::RefreshTokenMismatch);
        };

        if !self.issuer.session_is_valid(login, refresh_token).await? {
            warn!(login, "refresh token does not match the active session");
            return Err(AuthError::RefreshTokenMismatch);
        }

        let pair = self.mint(&claims)?;
        self.issuer
            .rotate_session(login, &pair.refresh_token)
            .await?;

        info!(login, "session rotated");
        Ok(pair)
    }

    async fn logout(&self, login: &str) -> Result<(), AuthError> {
        self.issuer.end_session(login).await?;
        info!(login, "session ended");
        Ok(())
    }

    async fn authenticate(&self, access_token: &str) -> Result<ClaimSet, AuthError> {
        self.issuer.verify_access(access_token).map_err(|e| {
            debug!("access token rejected: {}", e);
            AuthError::AccessTokenInvalid
        })
    }
}
