//! Error types for the pricing engine
//!
//! Solver non-convergence and integration clamping are not errors here: they
//! travel inside `VolatilityResult` and `PriceResult` so that one option leg
//! can fail without blocking the other.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PricingError {
    /// Invalid inputs or prices outside the no-arbitrage bounds
    #[error("Domain error: {0}")]
    Domain(String),

    #[error("Numerical error: {0}")]
    Numerical(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type PricingResult<T> = Result<T, PricingError>;

impl PricingError {
    pub fn domain(msg: impl Into<String>) -> Self {
        Self::Domain(msg.into())
    }

    pub fn numerical(msg: impl Into<String>) -> Self {
        Self::Numerical(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for errors caused by the request itself rather than the engine
    pub fn is_domain(&self) -> bool {
        matches!(self, Self::Domain(_))
    }
}
