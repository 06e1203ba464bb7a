use super::util::is_dup_key;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};

pub struct MySqlUserRepo {
    pool: MySqlPool,
}

impl MySqlUserRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlUserRepo { pool }
    }
}

#[async_trait::async_trait]
impl UserRepo for MySqlUserRepo {
    async fn find_by_login(&self, login: &str) -> Result<Option<UserRecord>, UserRepoError> {
        let row = sqlx::query(
            r#"
SELECT login, password, email, created_at
FROM user
WHERE login = ?
"#,
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserRepoError::Unavailable(format!("query user: {e}")))?;

        Ok(row.map(|row| UserRecord {
            login: row.get::<String, _>("login"),
            password: row.get::<String, _>("password"),
            email: row.get::<String, _>("email"),
            created_at: row.get::<DateTime<Utc>, _>("created_at"),
        }))
    }

    async fn login_exists(&self, login: &str) -> Result<bool, UserRepoError> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM user WHERE login = ?"#)
            .bind(login)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| UserRepoError::Unavailable(e.to_string()))?;

        Ok(count > 0)
    }

    async fn create(&self, user: NewUser) -> Result<UserRecord, UserRepoError> {
        let record = user.into_record(Utc::now());

        sqlx::query(
            r#"
INSERT INTO user (login, password, email, created_at, updated_at)
VALUES (?, ?, ?, ?, ?)
"#,
        )
        .bind(&record.login)
        .bind(&record.password)
        .bind(&record.email)
        .bind(record.created_at)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_dup_key(&e) {
                UserRepoError::LoginTaken
            } else {
                UserRepoError::Unavailable(e.to_string())
            }
        })?;

        Ok(record)
    }
}
