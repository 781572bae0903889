use super::RateStore;
use crate::exchange_rate::{ExchangeRate, NewExchangeRate};
use anyhow::anyhow;
use async_trait::async_trait;
use std::sync::RwLock;

/// In-process store keeping rows in insertion order.
#[derive(Default)]
pub struct MemoryRateStore {
    rows: RwLock<Vec<ExchangeRate>>,
}

impl MemoryRateStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_rows<T>(&self, f: impl FnOnce(&[ExchangeRate]) -> T) -> anyhow::Result<T> {
        let rows = self
            .rows
            .read()
            .map_err(|_| anyhow!("memory rate store lock poisoned"))?;
        Ok(f(&rows))
    }
}

#[async_trait]
impl RateStore for MemoryRateStore {
    async fn find_all(&self, limit: i64) -> anyhow::Result<Vec<ExchangeRate>> {
        let limit = usize::try_from(limit).unwrap_or(0);
        self.read_rows(|rows| rows.iter().rev().take(limit).cloned().collect())
    }

    async fn find_latest_by_code(&self, code: &str) -> anyhow::Result<Option<ExchangeRate>> {
        self.read_rows(|rows| rows.iter().rev().find(|r| r.cc == code).cloned())
    }

    async fn find_distinct_first_by_code(
        &self,
        code: &str,
    ) -> anyhow::Result<Option<ExchangeRate>> {
        self.read_rows(|rows| rows.iter().find(|r| r.cc == code).cloned())
    }

    async fn save_all(&self, batch: &[NewExchangeRate]) -> anyhow::Result<u64> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| anyhow!("memory rate store lock poisoned"))?;

        let mut next_id = rows.last().map_or(1, |r| r.id + 1);
        for rate in batch {
            rows.push(rate.clone().into_stored(next_id));
            next_id += 1;
        }

        Ok(batch.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::contract;

    async fn seeded() -> MemoryRateStore {
        let store = MemoryRateStore::new();
        contract::seed(&store).await;
        store
    }

    #[tokio::test]
    async fn test_ids_increase_across_batches() {
        let store = seeded().await;
        let all = store.find_all(10).await.unwrap();

        let ids: Vec<i64> = all.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![4, 3, 2, 1]);
    }

    #[tokio::test]
    async fn test_find_all_respects_limit() {
        contract::find_all_newest_first(&seeded().await).await;
    }

    #[tokio::test]
    async fn test_latest_and_first_differ() {
        contract::latest_and_first_differ(&seeded().await).await;
    }

    #[tokio::test]
    async fn test_unknown_code() {
        contract::unknown_code(&seeded().await).await;
    }

    #[tokio::test]
    async fn test_empty_batch() {
        contract::empty_batch_writes_nothing(&seeded().await).await;
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = MemoryRateStore::new();
        assert!(store.find_all(61).await.unwrap().is_empty());
    }
}
