//! Engine configuration
//!
//! Iteration and quadrature budgets for the solver and the Heston pricer.
//! These budgets are also the termination guarantee of every numerical loop.

use serde::{Deserialize, Serialize};

use super::error::{PricingError, PricingResult};

/// Full engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Implied volatility solver
    pub solver: SolverConfig,
    /// Heston characteristic function integration
    pub quadrature: QuadratureConfig,
}

impl EngineConfig {
    /// Fewer nodes and a looser tolerance
    pub fn fast() -> Self {
        Self {
            solver: SolverConfig {
                price_tolerance: 1e-4,
                vol_tolerance: 1e-6,
                max_iterations: 50,
                ..Default::default()
            },
            quadrature: QuadratureConfig {
                nodes: 32,
                ..Default::default()
            },
        }
    }

    /// More nodes and a tighter tolerance
    pub fn precise() -> Self {
        Self {
            solver: SolverConfig {
                price_tolerance: 1e-9,
                vol_tolerance: 1e-10,
                max_iterations: 200,
                ..Default::default()
            },
            quadrature: QuadratureConfig {
                nodes: 128,
                ..Default::default()
            },
        }
    }

    pub fn validate(&self) -> PricingResult<()> {
        self.solver.validate()?;
        self.quadrature.validate()
    }
}

/// Implied volatility solver configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Newton seed, a market-agnostic prior
    /// Default: 0.3
    pub initial_guess: f64,

    /// Iteration budget, applied to each of the Newton and bisection phases
    /// Default: 100
    pub max_iterations: u32,

    /// Stop when |model price - market price| is below this
    /// Default: 1e-6
    pub price_tolerance: f64,

    /// Also require the remaining Newton step |diff| / vega to be below this
    /// Default: 1e-8
    pub vol_tolerance: f64,

    /// Below this vega (per unit vol) a Newton step is unstable
    /// Default: 1e-8
    pub min_vega: f64,

    /// Volatility search interval (lower_bound, upper_bound)
    /// Default: (1e-6, 5.0)
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            initial_guess: 0.3,
            max_iterations: 100,
            price_tolerance: 1e-6,
            vol_tolerance: 1e-8,
            min_vega: 1e-8,
            lower_bound: 1e-6,
            upper_bound: 5.0,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> PricingResult<()> {
        if !(self.lower_bound > 0.0 && self.lower_bound < self.upper_bound)
            || !self.upper_bound.is_finite()
        {
            return Err(PricingError::config(format!(
                "solver bounds must satisfy 0 < lower < upper, got ({}, {})",
                self.lower_bound, self.upper_bound
            )));
        }
        if !(self.initial_guess > self.lower_bound && self.initial_guess < self.upper_bound) {
            return Err(PricingError::config(format!(
                "initial guess {} lies outside the solver bounds",
                self.initial_guess
            )));
        }
        if self.max_iterations == 0 {
            return Err(PricingError::config("max_iterations must be > 0"));
        }
        if !(self.price_tolerance > 0.0) {
            return Err(PricingError::config("price_tolerance must be > 0"));
        }
        if !(self.vol_tolerance > 0.0) {
            return Err(PricingError::config("vol_tolerance must be > 0"));
        }
        if !(self.min_vega >= 0.0) {
            return Err(PricingError::config("min_vega must be >= 0"));
        }
        Ok(())
    }
}

/// Gauss-Legendre integration configuration for the Heston pricer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadratureConfig {
    /// Number of Gauss-Legendre nodes
    /// Default: 64
    pub nodes: usize,

    /// Truncation point of the semi-infinite frequency integral
    /// Default: 100.0
    pub upper_bound: f64,

    /// Widen the truncation point when the characteristic function has not
    /// decayed by `upper_bound` (short maturities, low variance)
    /// Default: true
    pub extend_for_short_maturity: bool,
}

impl Default for QuadratureConfig {
    fn default() -> Self {
        Self {
            nodes: 64,
            upper_bound: 100.0,
            extend_for_short_maturity: true,
        }
    }
}

impl QuadratureConfig {
    pub fn with_nodes(nodes: usize) -> Self {
        Self {
            nodes,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> PricingResult<()> {
        if self.nodes == 0 {
            return Err(PricingError::config("quadrature nodes must be > 0"));
        }
        if !(self.upper_bound > 0.0) || !self.upper_bound.is_finite() {
            return Err(PricingError::config(format!(
                "integration upper bound must be positive, got {}",
                self.upper_bound
            )));
        }
        Ok(())
    }
}
