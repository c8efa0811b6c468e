//! PostgreSQL implementation of the TokenRepository trait.
//!
//! Tokens are stored verbatim in `jwt_token`; lookups are by the unique
//! access or refresh token column.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{Executor, PgPool, Postgres, Row, Transaction};

use tg_core::domain::entities::token::TokenRecord;
use tg_core::errors::DomainError;
use tg_core::repositories::{TokenRepository, TokenTransaction};

use super::store_error;

const SELECT_COLUMNS: &str =
    "SELECT id, subject_id, access_token, refresh_token, created_at, expires_at, is_revoked FROM jwt_token";

/// PostgreSQL implementation of TokenRepository
#[derive(Clone)]
pub struct PgTokenRepository {
    /// Database connection pool
    pool: PgPool,
}

impl PgTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Convert database row to TokenRecord entity
    fn row_to_record(row: &PgRow) -> Result<TokenRecord, DomainError> {
        let decode = |e: sqlx::Error| store_error("decode jwt_token row", e);
        Ok(TokenRecord {
            id: row.try_get("id").map_err(decode)?,
            subject_id: row.try_get("subject_id").map_err(decode)?,
            access_token: row.try_get("access_token").map_err(decode)?,
            refresh_token: row.try_get("refresh_token").map_err(decode)?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(decode)?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(decode)?,
            is_revoked: row.try_get("is_revoked").map_err(decode)?,
        })
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<TokenRecord>, DomainError> {
        let query = format!("{} WHERE {} = $1 LIMIT 1", SELECT_COLUMNS, column);
        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("find token", e))?;

        row.as_ref().map(Self::row_to_record).transpose()
    }
}

async fn insert<'e, E>(executor: E, mut record: TokenRecord) -> Result<TokenRecord, DomainError>
where
    E: Executor<'e, Database = Postgres>,
{
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO jwt_token (
            subject_id, access_token, refresh_token, created_at, expires_at, is_revoked
        ) VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(&record.subject_id)
    .bind(&record.access_token)
    .bind(&record.refresh_token)
    .bind(record.created_at)
    .bind(record.expires_at)
    .bind(record.is_revoked)
    .fetch_one(executor)
    .await
    .map_err(|e| store_error("save token", e))?;

    record.id = id;
    Ok(record)
}

async fn delete_where<'e, E>(executor: E, column: &str, value: &str) -> Result<u64, DomainError>
where
    E: Executor<'e, Database = Postgres>,
{
    let query = format!("DELETE FROM jwt_token WHERE {} = $1", column);
    let result = sqlx::query(&query)
        .bind(value)
        .execute(executor)
        .await
        .map_err(|e| store_error("delete token", e))?;
    Ok(result.rows_affected())
}

#[async_trait]
impl TokenRepository for PgTokenRepository {
    async fn save(&self, record: TokenRecord) -> Result<TokenRecord, DomainError> {
        insert(&self.pool, record).await
    }

    async fn find_by_access_token(
        &self,
        access_token: &str,
    ) -> Result<Option<TokenRecord>, DomainError> {
        self.find_one("access_token", access_token).await
    }

    async fn find_by_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<TokenRecord>, DomainError> {
        self.find_one("refresh_token", refresh_token).await
    }

    async fn delete_by_access_token(&self, access_token: &str) -> Result<u64, DomainError> {
        delete_where(&self.pool, "access_token", access_token).await
    }

    async fn begin(&self) -> Result<Box<dyn TokenTransaction>, DomainError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| store_error("begin transaction", e))?;
        Ok(Box::new(PgTokenTransaction { tx }))
    }
}

/// Transaction over `jwt_token`
///
/// sqlx rolls the transaction back when this is dropped uncommitted.
pub struct PgTokenTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl TokenTransaction for PgTokenTransaction {
    async fn save(&mut self, record: TokenRecord) -> Result<TokenRecord, DomainError> {
        insert(&mut *self.tx, record).await
    }

    async fn delete_by_access_token(&mut self, access_token: &str) -> Result<u64, DomainError> {
        delete_where(&mut *self.tx, "access_token", access_token).await
    }

    async fn delete_by_refresh_token(
        &mut self,
        refresh_token: &str,
    ) -> Result<u64, DomainError> {
        delete_where(&mut *self.tx, "refresh_token", refresh_token).await
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        self.tx
            .commit()
            .await
            .map_err(|e| store_error("commit transaction", e))
    }

    async fn rollback(self: Box<Self>) -> Result<(), DomainError> {
        self.tx
            .rollback()
            .await
            .map_err(|e| store_error("rollback transaction", e))
    }
}
