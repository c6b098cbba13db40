//! PostgreSQL implementation of UpdateStore.
//!
//! Persists processed updates to the `telegram_update` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use crate::config::DatabaseConfig;
use crate::domain::foundation::{DomainError, ErrorCode, UpdateId, UserId};
use crate::domain::update::Update;
use crate::ports::{UpdateRecord, UpdateStore};

/// PostgreSQL implementation of UpdateStore.
#[derive(Clone)]
pub struct PostgresUpdateStore {
    pool: PgPool,
}

impl PostgresUpdateStore {
    /// Creates a new PostgresUpdateStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool sized from `config`, creating the schema if missing.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout())
            .idle_timeout(config.idle_timeout())
            .connect(&config.url)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to connect to database: {}", e),
                )
            })?;

        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Creates the `telegram_update` table when it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS telegram_update (
                id BIGINT PRIMARY KEY,
                update_type TEXT,
                sender_id BIGINT,
                chat_id BIGINT,
                received_at TIMESTAMPTZ NOT NULL,
                payload JSONB NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to create telegram_update table: {}", e),
            )
        })?;

        Ok(())
    }
}

#[async_trait]
impl UpdateStore for PostgresUpdateStore {
    async fn is_connected(&self) -> bool {
        if self.pool.is_closed() {
            return false;
        }
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    async fn find_update(&self, update_id: UpdateId) -> Result<Option<UpdateRecord>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, update_type, sender_id, chat_id, received_at, payload
            FROM telegram_update
            WHERE id = $1
            "#,
        )
        .bind(update_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch update: {}", e),
            )
        })?;

        row.map(row_to_record).transpose()
    }

    async fn record_update(&self, update: &Update) -> Result<(), DomainError> {
        let record = UpdateRecord::from_update(update);

        sqlx::query(
            r#"
            INSERT INTO telegram_update (
                id, update_type, sender_id, chat_id, received_at, payload
            ) VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(record.update_id.value())
        .bind(record.update_type.as_deref())
        .bind(record.sender_id.map(|id| id.value()))
        .bind(record.chat_id)
        .bind(record.received_at)
        .bind(sqlx::types::Json(&record.payload))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert update: {}", e),
            )
        })?;

        Ok(())
    }

    async fn last_update_id(&self) -> Result<Option<UpdateId>, DomainError> {
        let last: Option<i64> = sqlx::query_scalar("SELECT MAX(id) FROM telegram_update")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to fetch last update id: {}", e),
                )
            })?;

        Ok(last.map(UpdateId::new))
    }
}

fn row_to_record(row: PgRow) -> Result<UpdateRecord, DomainError> {
    let map_err = |e: sqlx::Error| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to read update row: {}", e),
        )
    };

    let id: i64 = row.try_get("id").map_err(map_err)?;
    let update_type: Option<String> = row.try_get("update_type").map_err(map_err)?;
    let sender_id: Option<i64> = row.try_get("sender_id").map_err(map_err)?;
    let chat_id: Option<i64> = row.try_get("chat_id").map_err(map_err)?;
    let received_at: DateTime<Utc> = row.try_get("received_at").map_err(map_err)?;
    let payload: sqlx::types::Json<Value> = row.try_get("payload").map_err(map_err)?;

    Ok(UpdateRecord {
        update_id: UpdateId::new(id),
        update_type,
        sender_id: sender_id.and_then(|id| UserId::new(id).ok()),
        chat_id,
        received_at,
        payload: payload.0,
    })
}
