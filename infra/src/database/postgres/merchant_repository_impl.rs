//! PostgreSQL reader for the merchant registry

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use tg_core::domain::entities::merchant::Merchant;
use tg_core::errors::DomainError;
use tg_core::repositories::MerchantRepository;

use super::store_error;

#[derive(Clone)]
pub struct PgMerchantRepository {
    pool: PgPool,
}

impl PgMerchantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_merchant(row: &PgRow) -> Result<Merchant, DomainError> {
        let decode = |e: sqlx::Error| store_error("decode merchant row", e);
        Ok(Merchant {
            code: row.try_get("code").map_err(decode)?,
            company_name: row.try_get("company_name").map_err(decode)?,
            address: row.try_get("address").map_err(decode)?,
            email: row.try_get("email").map_err(decode)?,
            phone: row.try_get("phone").map_err(decode)?,
            website: row.try_get("website").map_err(decode)?,
            is_active: row.try_get("is_active").map_err(decode)?,
            date_joined: row
                .try_get::<Option<DateTime<Utc>>, _>("date_joined")
                .map_err(decode)?,
        })
    }
}

#[async_trait]
impl MerchantRepository for PgMerchantRepository {
    async fn find_active_codes(&self) -> Result<Vec<String>, DomainError> {
        sqlx::query_scalar("SELECT code FROM merchant WHERE is_active = TRUE ORDER BY code ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| store_error("load active merchants", e))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Merchant>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT code, company_name, address, email, phone, website, is_active, date_joined
            FROM merchant
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_error("find merchant", e))?;

        row.as_ref().map(Self::row_to_merchant).transpose()
    }
}
