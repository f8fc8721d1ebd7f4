use anyhow::{Context, Result};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::entities::{cache_entries, retrieval_cache};

/// Backed by two tables: `retrieval_cache` for query-result id lists and
/// `cache_entries` for arbitrary JSON values. Reads filter out expired rows;
/// eviction is left to the scheduled cleanup job.
pub struct CacheRepository {
    conn: DatabaseConnection,
}

impl CacheRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Cached form ids for a query hash. Expired rows count as a miss.
    pub async fn get_retrieval(&self, query_hash: &str) -> Result<Option<Vec<i32>>> {
        let now = chrono::Utc::now().to_rfc3339();

        let row = retrieval_cache::Entity::find()
            .filter(retrieval_cache::Column::QueryHash.eq(query_hash))
            .filter(retrieval_cache::Column::ExpiresAt.gt(&now))
            .one(&self.conn)
            .await
            .context("Failed to query retrieval cache")?;

        row.map(|r| {
            serde_json::from_str(&r.form_ids)
                .with_context(|| format!("Corrupt retrieval cache row for hash {query_hash}"))
        })
        .transpose()
    }

    /// Upsert the id list for a query hash, resetting its expiry.
    /// Racing writers on the same hash: last writer wins.
    pub async fn put_retrieval(
        &self,
        query_hash: &str,
        user_id: i32,
        form_ids: &[i32],
        ttl_seconds: i64,
    ) -> Result<()> {
        let now = chrono::Utc::now();

        let active = retrieval_cache::ActiveModel {
            query_hash: Set(query_hash.to_string()),
            user_id: Set(user_id),
            form_ids: Set(
                serde_json::to_string(form_ids).context("Failed to serialize cached form ids")?
            ),
            created_at: Set(now.to_rfc3339()),
            expires_at: Set((now + chrono::Duration::seconds(ttl_seconds)).to_rfc3339()),
            ..Default::default()
        };

        retrieval_cache::Entity::insert(active)
            .on_conflict(
                OnConflict::column(retrieval_cache::Column::QueryHash)
                    .update_columns([
                        retrieval_cache::Column::UserId,
                        retrieval_cache::Column::FormIds,
                        retrieval_cache::Column::CreatedAt,
                        retrieval_cache::Column::ExpiresAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await
            .context("Failed to upsert retrieval cache row")?;

        Ok(())
    }

    /// Cached JSON value for a key. Expired rows count as a miss.
    pub async fn get_value(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let now = chrono::Utc::now().to_rfc3339();

        let row = cache_entries::Entity::find()
            .filter(cache_entries::Column::Key.eq(key))
            .filter(cache_entries::Column::ExpiresAt.gt(&now))
            .one(&self.conn)
            .await
            .context("Failed to query cache entry")?;

        row.map(|r| {
            serde_json::from_str(&r.value)
                .with_context(|| format!("Corrupt cache entry for key {key}"))
        })
        .transpose()
    }

    /// Upsert a JSON value under a key, resetting its expiry
    pub async fn put_value(
        &self,
        key: &str,
        value: &serde_json::Value,
        ttl_seconds: i64,
    ) -> Result<()> {
        let now = chrono::Utc::now();

        let active = cache_entries::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
            created_at: Set(now.to_rfc3339()),
            expires_at: Set((now + chrono::Duration::seconds(ttl_seconds)).to_rfc3339()),
            ..Default::default()
        };

        cache_entries::Entity::insert(active)
            .on_conflict(
                OnConflict::column(cache_entries::Column::Key)
                    .update_columns([
                        cache_entries::Column::Value,
                        cache_entries::Column::CreatedAt,
                        cache_entries::Column::ExpiresAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await
            .context("Failed to upsert cache entry")?;

        Ok(())
    }

    /// Drop expired rows from both cache tables.
    /// Returns (retrieval rows, value rows) removed.
    pub async fn clear_expired(&self) -> Result<(u64, u64)> {
        let now = chrono::Utc::now().to_rfc3339();

        let retrieval = retrieval_cache::Entity::delete_many()
            .filter(retrieval_cache::Column::ExpiresAt.lte(&now))
            .exec(&self.conn)
            .await
            .context("Failed to clear expired retrieval cache rows")?
            .rows_affected;

        let values = cache_entries::Entity::delete_many()
            .filter(cache_entries::Column::ExpiresAt.lte(&now))
            .exec(&self.conn)
            .await
            .context("Failed to clear expired cache entries")?
            .rows_affected;

        Ok((retrieval, values))
    }
}
