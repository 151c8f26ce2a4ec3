//! Pricing Models
//!
//! Implements:
//! - Black-Scholes (pricing, Greeks)
//! - Implied volatility (Newton-Raphson with bisection fallback)
//! - Heston stochastic volatility (characteristic function)
//! - Heston semi-analytic pricer (Gauss-Legendre quadrature)

pub mod black_scholes;
pub mod implied_vol;
pub mod heston;
pub mod heston_pricer;

pub use black_scholes::{greeks, price};
pub use implied_vol::*;
pub use heston::*;
pub use heston_pricer::*;
