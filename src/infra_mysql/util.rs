use sqlx::mysql::MySqlDatabaseError;

// ER_DUP_ENTRY. The only unique index on `user` is `login`, so a duplicate
// here always means the login was taken between the existence check and the
// insert.
const ER_DUP_ENTRY: u16 = 1062;

pub fn is_dup_key(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db
            .try_downcast_ref::<MySqlDatabaseError>()
            .is_some_and(|e| e.number() == ER_DUP_ENTRY),
        _ => false,
    }
}
