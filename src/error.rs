//! Error types for rate lookups.

use thiserror::Error;

pub const NO_RATES_FOUND: &str = "No exchange rates found";

/// Errors surfaced by rate resolution and derivation.
#[derive(Debug, Error)]
pub enum RateError {
    /// No observation could back the requested answer.
    #[error("{0}")]
    NotFound(String),

    /// The rate store itself failed.
    #[error("Rate store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl RateError {
    pub fn empty_listing() -> Self {
        Self::NotFound(NO_RATES_FOUND.to_string())
    }

    pub fn unknown_currency(code: &str) -> Self {
        Self::NotFound(format!("No exchange rate found for {code}"))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type for rate operations.
pub type RateResult<T> = Result<T, RateError>;
