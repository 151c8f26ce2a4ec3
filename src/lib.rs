//! # vanilla-risk - European option analytics
//!
//! Implied volatility, Black-Scholes Greeks and semi-analytic Heston prices
//! for one European call/put pair at a time.
//!
//! ## Overview
//!
//! Given observed market prices the engine:
//! - **Recovers implied volatility**: Newton-Raphson seeded at 30% with a
//!   bisection fallback and an explicit convergence flag
//! - **Computes Greeks**: closed-form delta, gamma, theta (per day), vega and
//!   rho (per 1%)
//! - **Prices under Heston**: Gil-Pelaez inversion of the characteristic
//!   function with fixed-order Gauss-Legendre quadrature
//!
//! ## Usage
//!
//! ```rust
//! use vanilla_risk::prelude::*;
//!
//! let call = ContractTerms::from_days(24756.75, 24750.0, 2, 0.05, 0.0, OptionType::Call).unwrap();
//! let put = call.with_side(OptionType::Put);
//!
//! let facade = PricingFacade::with_defaults().unwrap();
//! let report = facade.evaluate_with(call, put, 177.15, 214.35, &HestonSpec::default());
//!
//! let call_leg = report.call.unwrap();
//! assert!(call_leg.implied_vol.converged);
//! println!("call IV: {:?}", call_leg.implied_vol.volatility);
//! ```
//!
//! ## What This Engine Does NOT Do
//!
//! - American exercise or exotic payoffs
//! - Volatility surface calibration
//! - Monte Carlo or PDE pricing
//! - Calendars, holidays or multi-curve discounting

pub mod core;
pub mod models;
pub mod numerics;
pub mod pricing;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        ContractTerms, EngineConfig, Greeks, MarketQuote, OptionType, PricingError,
        PricingResult, QuadratureConfig, SolverConfig,
    };

    // Models
    pub use crate::models::{
        characteristic_function,
        greeks as bs_greeks,
        price as bs_price,
        HestonParams,
        HestonPricer,
        ImpliedVolSolver,
        NumericWarning,
        PriceResult,
        SolverMethod,
        VolatilityResult,
    };

    // Numerics
    pub use crate::numerics::{norm_cdf, norm_pdf};

    // Facade
    pub use crate::pricing::{HestonSpec, LegReport, PricingFacade, PricingReport};
}

// Re-export main types at crate root
pub use crate::core::{PricingError, PricingResult};
pub use crate::pricing::PricingFacade;
