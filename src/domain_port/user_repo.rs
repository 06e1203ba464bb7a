use crate::domain_model::*;

#[derive(Debug, thiserror::Error)]
pub enum UserRepoError {
    #[error("login is taken")]
    LoginTaken,
    #[error("user store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait::async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_login(&self, login: &str) -> Result<Option<UserRecord>, UserRepoError>;

    async fn login_exists(&self, login: &str) -> Result<bool, UserRepoError> {
        Ok(self.find_by_login(login).await?.is_some())
    }

    async fn create(&self, user: NewUser) -> Result<UserRecord, UserRepoError>;
}
