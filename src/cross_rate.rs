//! Conversion factors between two currencies via the base currency.

use log::debug;

use crate::error::RateResult;
use crate::exchange_rate::FromToRate;
use crate::resolver::ResolveRate;

/// Derives `from -> to` factors from rates quoted as base-currency-per-unit.
#[derive(Debug, Clone)]
pub struct CrossRateCalculator {
    base: String,
}

impl CrossRateCalculator {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Units of `to` bought by one unit of `from`.
    ///
    /// Identical codes short-circuit to exactly `1.0` without touching the
    /// resolver. Any missing leg fails the whole computation.
    pub async fn cross_rate(
        &self,
        from: &str,
        to: &str,
        resolver: &dyn ResolveRate,
    ) -> RateResult<FromToRate> {
        if from == to {
            return Ok(FromToRate::new(from, to, 1.0));
        }

        let rate = if from == self.base {
            1.0 / resolver.resolve(to).await?.rate
        } else if to == self.base {
            resolver.resolve(from).await?.rate
        } else {
            let from_rate = resolver.resolve(from).await?.rate;
            let to_rate = resolver.resolve(to).await?.rate;
            from_rate / to_rate
        };

        debug!("Cross rate {} -> {} = {}", from, to, rate);
        Ok(FromToRate::new(from, to, rate))
    }
}
