use serde::{Deserialize, Serialize};

/// One stored observation of a currency priced in the base currency.
///
/// `rate` is the number of base-currency units per one unit of `cc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ExchangeRate {
    pub id: i64,
    pub r030: i32,
    pub txt: String,
    pub rate: f64,
    pub cc: String,
    pub exchangedate: String,
}

impl ExchangeRate {
    /// Copy of this observation carrying a different rate.
    pub fn with_rate(&self, rate: f64) -> Self {
        Self {
            rate,
            ..self.clone()
        }
    }
}

/// An observation as it arrives from upstream, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExchangeRate {
    pub r030: i32,
    pub txt: String,
    pub rate: f64,
    pub cc: String,
    pub exchangedate: String,
}

impl NewExchangeRate {
    pub fn into_stored(self, id: i64) -> ExchangeRate {
        ExchangeRate {
            id,
            r030: self.r030,
            txt: self.txt,
            rate: self.rate,
            cc: self.cc,
            exchangedate: self.exchangedate,
        }
    }
}

/// Conversion factor between two currencies: one `from` buys `rate` of `to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FromToRate {
    pub from: String,
    pub to: String,
    pub rate: f64,
}

impl FromToRate {
    pub fn new(from: &str, to: &str, rate: f64) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            rate,
        }
    }
}
