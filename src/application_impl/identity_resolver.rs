use crate::domain_model::*;
use crate::domain_port::{UserRepo, UserRepoError};
use crate::logger::*;
use std::sync::Arc;

/// Maps a login to the claims placed in its tokens.
pub struct IdentityResolver {
    user_repo: Arc<dyn UserRepo>,
}

impl IdentityResolver {
    pub fn new(user_repo: Arc<dyn UserRepo>) -> Self {
        IdentityResolver { user_repo }
    }

    pub async fn resolve_by_credentials(
        &self,
        login: &str,
        password: &str,
    ) -> Result<Option<ClaimSet>, UserRepoError> {
        let Some(user) = self.user_repo.find_by_login(login).await? else {
            warn!(login, "user not found");
            return Ok(None);
        };

        if !user.check_password(password) {
            warn!(login, "password mismatch");
            return Ok(None);
        }

        Ok(Some(Self::claims_for(&user)))
    }

    /// Used by the refresh flow, which trusts a login read from the presented
    /// token. The refresh store comparison is what authenticates that login.
    pub async fn resolve_by_login(&self, login: &str) -> Result<Option<ClaimSet>, UserRepoError> {
        let Some(user) = self.user_repo.find_by_login(login).await? else {
            warn!(login, "user not found");
            return Ok(None);
        };
        Ok(Some(Self::claims_for(&user)))
    }

    fn claims_for(user: &UserRecord) -> ClaimSet {
        ClaimSet::new(user.login.clone())
    }
}
