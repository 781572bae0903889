//! Restating a whole snapshot relative to another currency.

use log::debug;

use crate::error::RateResult;
use crate::exchange_rate::ExchangeRate;
use crate::resolver::ResolveRate;

#[derive(Debug, Clone)]
pub struct RateListBuilder {
    base: String,
}

impl RateListBuilder {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// Every snapshot row re-expressed against `reference`.
    ///
    /// The reference rate comes from `resolver`, so the row it uses is the
    /// one the active resolution strategy picks. The reference's own rows in
    /// the snapshot equal `1.0` only when they are that same row.
    pub async fn relative_to(
        &self,
        reference: &str,
        snapshot: &[ExchangeRate],
        resolver: &dyn ResolveRate,
    ) -> RateResult<Vec<ExchangeRate>> {
        if reference == self.base {
            return Ok(snapshot.to_vec());
        }

        let reference_rate = resolver.resolve(reference).await?.rate;
        debug!(
            "Rebasing {} rows onto {} at {}",
            snapshot.len(),
            reference,
            reference_rate
        );
        Ok(rebase(reference_rate, snapshot))
    }
}

/// Copies of `snapshot` with each rate replaced by `reference_rate / rate`.
pub fn rebase(reference_rate: f64, snapshot: &[ExchangeRate]) -> Vec<ExchangeRate> {
    snapshot
        .iter()
        .map(|row| row.with_rate(reference_rate / row.rate))
        .collect()
}
