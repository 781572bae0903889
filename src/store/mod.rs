pub mod memory;
pub mod postgres;

use crate::exchange_rate::{ExchangeRate, NewExchangeRate};
use async_trait::async_trait;

pub use memory::MemoryRateStore;
pub use postgres::PgRateStore;

/// Durable table of rate observations.
///
/// Reads must observe either all or none of a batch written by `save_all`.
#[async_trait]
pub trait RateStore: Send + Sync {
    /// Up to `limit` observations, newest first.
    async fn find_all(&self, limit: i64) -> anyhow::Result<Vec<ExchangeRate>>;

    /// The observation with the highest id for `code`.
    async fn find_latest_by_code(&self, code: &str) -> anyhow::Result<Option<ExchangeRate>>;

    /// The first observation for `code` in insertion order.
    async fn find_distinct_first_by_code(&self, code: &str)
    -> anyhow::Result<Option<ExchangeRate>>;

    /// Append a whole batch atomically, returning the number of rows written.
    async fn save_all(&self, batch: &[NewExchangeRate]) -> anyhow::Result<u64>;
}
