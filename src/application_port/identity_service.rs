use crate::domain_model::*;
use crate::domain_port::{StoreError, UserRepoError};

/// Errors surfaced by the identity flows. None of the client-facing variants
/// tells a caller whether a login exists.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("login is taken")]
    LoginTaken,
    #[error("invalid request: {0}")]
    InvalidInput(String),
    #[error("refresh token expired")]
    RefreshTokenExpired,
    #[error("invalid refresh token")]
    RefreshTokenMalformed,
    #[error("refresh token does not match the active session")]
    RefreshTokenMismatch,
    #[error("access token invalid")]
    AccessTokenInvalid,
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("internal error: {0}")]
    InternalError(String),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(e) => AuthError::StoreUnavailable(e),
        }
    }
}

impl From<UserRepoError> for AuthError {
    fn from(err: UserRepoError) -> Self {
        match err {
            UserRepoError::LoginTaken => AuthError::LoginTaken,
            UserRepoError::Unavailable(e) => AuthError::StoreUnavailable(e),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SignupInput {
    pub login: String,
    pub password: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct LoginInput {
    pub login: String,
    pub password: String,
}

#[async_trait::async_trait]
pub trait IdentityService: Send + Sync {
    async fn signup(&self, request: SignupInput) -> Result<(), AuthError>;
    async fn login(&self, request: LoginInput) -> Result<TokenPair, AuthError>;
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError>;
    async fn logout(&self, login: &str) -> Result<(), AuthError>;
    /// Verify an access token and return the identity it carries.
    async fn authenticate(&self, access_token: &str) -> Result<ClaimSet, AuthError>;
}
