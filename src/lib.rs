pub mod api;
pub mod config;
pub mod cross_rate;
pub mod error;
pub mod exchange_rate;
pub mod nbu;
pub mod rate_list;
pub mod refresh;
pub mod resolver;
pub mod service;
pub mod store;

pub use error::{RateError, RateResult};
pub use exchange_rate::{ExchangeRate, FromToRate, NewExchangeRate};
