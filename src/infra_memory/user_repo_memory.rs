use crate::domain_model::*;
use crate::domain_port::{UserRepo, UserRepoError};
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

#[derive(Debug, Default)]
pub struct InMemoryUserRepo {
    users: DashMap<String, UserRecord>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserRepo for InMemoryUserRepo {
    async fn find_by_login(&self, login: &str) -> Result<Option<UserRecord>, UserRepoError> {
        Ok(self.users.get(login).map(|user| user.value().clone()))
    }

    async fn create(&self, user: NewUser) -> Result<UserRecord, UserRepoError> {
        match self.users.entry(user.login.clone()) {
            Entry::Occupied(_) => Err(UserRepoError::LoginTaken),
            Entry::Vacant(slot) => {
                let record = user.into_record(Utc::now());
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }
}
