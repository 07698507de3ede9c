use cardapio_shared::user::Session;
use sea_query::{Expr, ExprTrait, OnConflict, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::{Serialize, de::DeserializeOwned};
use sqlx::SqlitePool;
use time::OffsetDateTime;

use crate::table::KvStore as KvStoreTable;

pub const SESSION_KEY: &str = "auth.session";

/// Persisted string key-value store.
#[derive(Clone)]
pub struct KvStore {
    pool: SqlitePool,
}

impl KvStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let statement = Query::select()
            .column(KvStoreTable::Value)
            .from(KvStoreTable::Table)
            .and_where(Expr::col(KvStoreTable::Key).eq(key))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let row = sqlx::query_as_with::<_, (String,), _>(&sql, values)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(value,)| value))
    }

    /// Inserts or replaces the value stored under `key`.
    pub async fn set(&self, key: &str, value: impl Into<String>) -> anyhow::Result<()> {
        let value: String = value.into();
        let updated_at = OffsetDateTime::now_utc().unix_timestamp();
        let statement = Query::insert()
            .into_table(KvStoreTable::Table)
            .columns([
                KvStoreTable::Key,
                KvStoreTable::Value,
                KvStoreTable::UpdatedAt,
            ])
            .values([key.into(), value.into(), updated_at.into()])?
            .on_conflict(
                OnConflict::column(KvStoreTable::Key)
                    .update_columns([KvStoreTable::Value, KvStoreTable::UpdatedAt])
                    .to_owned(),
            )
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.pool).await?;

        Ok(())
    }

    /// Returns whether something was removed.
    pub async fn remove(&self, key: &str) -> anyhow::Result<bool> {
        let statement = Query::delete()
            .from_table(KvStoreTable::Table)
            .and_where(Expr::col(KvStoreTable::Key).eq(key))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let res = sqlx::query_with(&sql, values).execute(&self.pool).await?;

        Ok(res.rows_affected() > 0)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> anyhow::Result<Option<T>> {
        let Some(value) = self.get(key).await? else {
            return Ok(None);
        };

        Ok(Some(serde_json::from_str(&value)?))
    }

    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T) -> anyhow::Result<()> {
        self.set(key, serde_json::to_string(value)?).await
    }
}

/// The signed-in session, kept under [`SESSION_KEY`].
#[derive(Clone)]
pub struct SessionStore(KvStore);

impl SessionStore {
    pub fn new(store: KvStore) -> Self {
        Self(store)
    }

    pub async fn load(&self) -> anyhow::Result<Option<Session>> {
        match self.0.get_json(SESSION_KEY).await {
            Ok(session) => Ok(session),
            Err(err) if err.is::<serde_json::Error>() => {
                tracing::warn!(err = %err, "discarding unreadable session");
                self.0.remove(SESSION_KEY).await?;

                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    pub async fn save(&self, session: &Session) -> anyhow::Result<()> {
        self.0.set_json(SESSION_KEY, session).await?;

        tracing::info!(user_id = %session.user_id, "session saved");

        Ok(())
    }

    pub async fn clear(&self) -> anyhow::Result<bool> {
        self.0.remove(SESSION_KEY).await
    }
}
