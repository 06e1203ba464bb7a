use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub login: String,
    pub password: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    // Plain string equality: passwords are stored as given at sign-up.
    pub fn check_password(&self, presented: &str) -> bool {
        self.password == presented
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub login: String,
    pub password: String,
    pub email: String,
}

impl NewUser {
    pub fn into_record(self, created_at: DateTime<Utc>) -> UserRecord {
        UserRecord {
            login: self.login,
            password: self.password,
            email: self.email,
            created_at,
        }
    }
}
