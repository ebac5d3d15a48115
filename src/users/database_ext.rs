mod raw_user;

use crate::{
    database::{is_unique_violation, Database},
    error::Error as ClubrollError,
    users::User,
};
use anyhow::{anyhow, bail};
use raw_user::RawUser;
use sqlx::{query, query_as, Pool, Sqlite, SqliteConnection};

/// A database extension for the users-related operations.
pub struct UsersDatabaseExt<'pool> {
    pool: &'pool Pool<Sqlite>,
}

impl<'pool> UsersDatabaseExt<'pool> {
    pub fn new(pool: &'pool Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Retrieves user with the specified ID.
    pub async fn get_user(&self, id: i64) -> anyhow::Result<Option<User>> {
        query_as::<_, RawUser>(r#"SELECT * FROM users WHERE id = ?1"#)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    /// Retrieves user with the specified email, the lookup is case-insensitive.
    pub async fn get_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        query_as::<_, RawUser>(r#"SELECT * FROM users WHERE email = ?1"#)
            .bind(email)
            .fetch_optional(self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    /// Inserts user and returns its ID.
    pub async fn insert_user(&self, user: &User) -> anyhow::Result<i64> {
        let mut conn = self.pool.acquire().await?;
        insert_user(&mut conn, user).await
    }
}

/// Inserts user using the specified connection, so that it can take part in a wider transaction.
pub(crate) async fn insert_user(conn: &mut SqliteConnection, user: &User) -> anyhow::Result<i64> {
    let result = query(
        r#"
INSERT INTO users (email, password_hash, is_staff, is_superuser, created_at)
VALUES ( ?1, ?2, ?3, ?4, ?5 )
        "#,
    )
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.is_staff)
    .bind(user.is_superuser)
    .bind(user.created_at)
    .execute(&mut *conn)
    .await;

    match result {
        Ok(result) => Ok(result.last_insert_rowid()),
        Err(err) if is_unique_violation(&err) => bail!(ClubrollError::client_with_root_cause(
            anyhow!(err).context(format!("User with such email ('{}') already exists.", user.email))
        )),
        Err(err) => bail!(ClubrollError::from(anyhow!(err).context(format!(
            "Couldn't create user ('{}') due to unknown reason.",
            user.email
        )))),
    }
}

impl Database {
    /// Returns a database extension for the users operations.
    pub fn users(&self) -> UsersDatabaseExt<'_> {
        UsersDatabaseExt::new(&self.pool)
    }
}
