use super::RateStore;
use crate::exchange_rate::{ExchangeRate, NewExchangeRate};
use anyhow::Context;
use async_trait::async_trait;
use log::info;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

const COLUMNS: &str = "id, r030, txt, rate, cc, exchangedate";

/// Postgres-backed store over the `exchange_rates` table.
pub struct PgRateStore {
    pool: PgPool,
}

impl PgRateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool and apply pending migrations.
    pub async fn connect(url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .context("Can't connect to the rate database")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Can't apply database migrations")?;

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl RateStore for PgRateStore {
    async fn find_all(&self, limit: i64) -> anyhow::Result<Vec<ExchangeRate>> {
        let sql = format!("SELECT {COLUMNS} FROM exchange_rates ORDER BY id DESC LIMIT $1");
        let rows = sqlx::query_as::<_, ExchangeRate>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_latest_by_code(&self, code: &str) -> anyhow::Result<Option<ExchangeRate>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM exchange_rates WHERE cc = $1 ORDER BY id DESC LIMIT 1"
        );
        let row = sqlx::query_as::<_, ExchangeRate>(&sql)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_distinct_first_by_code(
        &self,
        code: &str,
    ) -> anyhow::Result<Option<ExchangeRate>> {
        let sql = format!(
            "SELECT DISTINCT ON (cc) {COLUMNS} FROM exchange_rates WHERE cc = $1 ORDER BY cc, id ASC"
        );
        let row = sqlx::query_as::<_, ExchangeRate>(&sql)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn save_all(&self, batch: &[NewExchangeRate]) -> anyhow::Result<u64> {
        if batch.is_empty() {
            return Ok(0);
        }

        let batch_id = Uuid::new_v4();
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO exchange_rates (r030, txt, rate, cc, exchangedate, batch_id) ",
        );
        builder.push_values(batch, |mut row, rate| {
            row.push_bind(rate.r030)
                .push_bind(rate.txt.clone())
                .push_bind(rate.rate)
                .push_bind(rate.cc.clone())
                .push_bind(rate.exchangedate.clone())
                .push_bind(batch_id);
        });

        let mut tx = self.pool.begin().await?;
        let written = builder.build().execute(&mut *tx).await?.rows_affected();
        tx.commit().await.context("Can't commit rate batch")?;

        info!("Stored batch {} with {} rates", batch_id, written);
        Ok(written)
    }
}
