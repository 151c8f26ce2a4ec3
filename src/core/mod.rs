//! Core data types for the pricing engine
//!
//! Defines fundamental types:
//! - ContractTerms / MarketQuote: validated contract and market inputs
//! - Greeks: Black-Scholes sensitivities
//! - EngineConfig: solver and quadrature budgets
//! - PricingError: error taxonomy

pub mod option;
pub mod greeks;
pub mod config;
pub mod error;

pub use option::*;
pub use greeks::*;
pub use config::*;
pub use error::*;
