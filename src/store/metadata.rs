use crate::error::ApiError;
use crate::util::db::Db;
use chrono::{DateTime, SecondsFormat, Utc};

/// Key of the single tracked metadata row.
pub const LAST_REFRESHED_KEY: &str = "last_refreshed_at";

pub struct MetadataStore<'a> {
    db: &'a Db,
}

impl<'a> MetadataStore<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// Overwrite the refresh timestamp (created on first refresh).
    pub async fn set_last_refreshed(&self, ts: DateTime<Utc>) -> Result<(), ApiError> {
        sqlx::query(
            "INSERT INTO metadata (key, value) VALUES (?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(LAST_REFRESHED_KEY)
        .bind(ts.to_rfc3339_opts(SecondsFormat::Millis, true))
        .execute(&self.db.pool)
        .await?;
        Ok(())
    }

    /// ISO-8601 timestamp of the last successful refresh, if any.
    pub async fn last_refreshed(&self) -> Result<Option<String>, ApiError> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM metadata WHERE key = ?")
            .bind(LAST_REFRESHED_KEY)
            .fetch_optional(&self.db.pool)
            .await?;
        Ok(value)
    }
}
