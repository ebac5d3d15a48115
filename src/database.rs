use crate::config::DatabaseConfig;
use anyhow::Context;
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite, SqlitePool};
use time::OffsetDateTime;

#[derive(Clone)]
pub struct Database {
    pub(crate) pool: Pool<Sqlite>,
}

/// Common methods for the primary database, extensions are implemented separately in every module.
impl Database {
    /// Opens database "connection".
    pub async fn create(pool: SqlitePool) -> anyhow::Result<Self> {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .with_context(|| "Failed to migrate database")?;

        Ok(Database { pool })
    }

    /// Connects to the database described by the config and runs migrations.
    pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await
            .with_context(|| format!("Failed to connect to database ({}).", config.url))?;

        Self::create(pool).await
    }

    /// Returns current UTC time, truncated to seconds to match the database precision.
    pub fn utc_now() -> anyhow::Result<OffsetDateTime> {
        Ok(OffsetDateTime::now_utc().replace_nanosecond(0)?)
    }
}

impl AsRef<Database> for Database {
    fn as_ref(&self) -> &Self {
        self
    }
}

/// Checks whether the error is a violation of a unique constraint.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|database_error| database_error.is_unique_violation())
}
