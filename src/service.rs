//! Query operations exposed to the HTTP boundary.

use std::sync::Arc;

use crate::cross_rate::CrossRateCalculator;
use crate::error::{RateError, RateResult};
use crate::exchange_rate::{ExchangeRate, FromToRate};
use crate::rate_list::RateListBuilder;
use crate::resolver::{RateResolver, ResolutionStrategy};
use crate::store::RateStore;

pub struct RateService {
    store: Arc<dyn RateStore>,
    resolver: RateResolver,
    calculator: CrossRateCalculator,
    list_builder: RateListBuilder,
    snapshot_limit: i64,
}

impl RateService {
    pub fn new(
        store: Arc<dyn RateStore>,
        base_currency: &str,
        strategy: ResolutionStrategy,
        snapshot_limit: i64,
    ) -> Self {
        Self {
            resolver: RateResolver::new(store.clone(), strategy),
            calculator: CrossRateCalculator::new(base_currency),
            list_builder: RateListBuilder::new(base_currency),
            store,
            snapshot_limit,
        }
    }

    pub fn base_currency(&self) -> &str {
        self.calculator.base()
    }

    /// The current snapshot, newest first.
    pub async fn get_all(&self) -> RateResult<Vec<ExchangeRate>> {
        let snapshot = self.store.find_all(self.snapshot_limit).await?;
        if snapshot.is_empty() {
            return Err(RateError::empty_listing());
        }
        Ok(snapshot)
    }

    /// The current snapshot with every rate restated against `code`.
    pub async fn get_all_relative_to(&self, code: &str) -> RateResult<Vec<ExchangeRate>> {
        let snapshot = self.get_all().await?;
        self.list_builder
            .relative_to(code, &snapshot, &self.resolver)
            .await
    }

    pub async fn get_cross_rate(&self, from: &str, to: &str) -> RateResult<FromToRate> {
        self.calculator.cross_rate(from, to, &self.resolver).await
    }
}
