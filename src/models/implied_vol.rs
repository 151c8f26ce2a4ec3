//! Implied volatility solver
//!
//! Inverts the Black-Scholes formula with Newton-Raphson, falling back to
//! bisection when vega is too small or a step leaves the search interval.
//! Failure to converge is reported in the result, not as an error.

use serde::{Deserialize, Serialize};

use super::black_scholes;
use crate::core::{MarketQuote, PricingResult, SolverConfig};

/// Root-finding method that produced the final iterate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverMethod {
    Newton,
    Bisection,
}

/// Outcome of an implied volatility solve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilityResult {
    /// Annualized implied volatility, `None` when not found
    pub volatility: Option<f64>,
    pub converged: bool,
    /// Newton and bisection iterations combined
    pub iterations: u32,
    pub method: SolverMethod,
}

impl VolatilityResult {
    fn found(volatility: f64, iterations: u32, method: SolverMethod) -> Self {
        Self {
            volatility: Some(volatility),
            converged: true,
            iterations,
            method,
        }
    }

    fn not_found(iterations: u32, method: SolverMethod) -> Self {
        Self {
            volatility: None,
            converged: false,
            iterations,
            method,
        }
    }
}

/// Newton-Raphson / bisection hybrid
#[derive(Debug, Clone, Copy, Default)]
pub struct ImpliedVolSolver {
    config: SolverConfig,
}

impl ImpliedVolSolver {
    pub fn new(config: SolverConfig) -> PricingResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Price and step both small
    ///
    /// A price match alone is not enough: far out of the money every vol
    /// near the seed prices within tolerance of a tiny premium.
    fn accepts(&self, diff: f64, vega: f64) -> bool {
        diff.abs() < self.config.price_tolerance && diff.abs() <= self.config.vol_tolerance * vega
    }

    /// Solve for the volatility that reproduces the quoted price
    ///
    /// Quotes outside the no-arbitrage bounds are rejected with a domain
    /// error before any iteration.
    pub fn solve(&self, quote: &MarketQuote) -> PricingResult<VolatilityResult> {
        quote.check_arbitrage()?;

        let cfg = &self.config;
        let terms = quote.terms();
        let target = quote.price();
        let mut vol = cfg.initial_guess;
        let mut iterations = 0;

        // Newton-Raphson iteration
        while iterations < cfg.max_iterations {
            let diff = black_scholes::price(terms, vol)? - target;
            let vega = black_scholes::vega_raw(terms, vol)?;
            if self.accepts(diff, vega) {
                tracing::debug!(vol, iterations, "implied vol converged (newton)");
                return Ok(VolatilityResult::found(vol, iterations, SolverMethod::Newton));
            }
            iterations += 1;

            if vega < cfg.min_vega {
                tracing::debug!(vol, vega, "vega too small, switching to bisection");
                break;
            }

            let next = vol - diff / vega;
            if !(next > cfg.lower_bound && next < cfg.upper_bound) {
                tracing::debug!(vol, next, "newton step left the bracket, switching to bisection");
                break;
            }
            vol = next;
        }

        self.bisect(quote, iterations)
    }

    /// Bisection on [lower_bound, upper_bound]; BS prices increase with vol
    ///
    /// Stops on the same price/step test as Newton, or once the bracket is
    /// narrower than `vol_tolerance` with the price inside tolerance.
    fn bisect(&self, quote: &MarketQuote, newton_iterations: u32) -> PricingResult<VolatilityResult> {
        let cfg = &self.config;
        let terms = quote.terms();
        let target = quote.price();
        let mut low = cfg.lower_bound;
        let mut high = cfg.upper_bound;
        let mut iterations = newton_iterations;

        let low_diff = black_scholes::price(terms, low)? - target;
        let high_diff = black_scholes::price(terms, high)? - target;
        if self.accepts(low_diff, black_scholes::vega_raw(terms, low)?) {
            return Ok(VolatilityResult::found(low, iterations, SolverMethod::Bisection));
        }
        if self.accepts(high_diff, black_scholes::vega_raw(terms, high)?) {
            return Ok(VolatilityResult::found(high, iterations, SolverMethod::Bisection));
        }
        if low_diff > 0.0 || high_diff < 0.0 {
            tracing::warn!(
                side = %terms.side(),
                price = target,
                "market price not attainable within the volatility bracket"
            );
            return Ok(VolatilityResult::not_found(iterations, SolverMethod::Bisection));
        }

        for _ in 0..cfg.max_iterations {
            iterations += 1;
            let mid = 0.5 * (low + high);
            let diff = black_scholes::price(terms, mid)? - target;
            let narrow = high - low < cfg.vol_tolerance && diff.abs() < cfg.price_tolerance;

            if narrow || self.accepts(diff, black_scholes::vega_raw(terms, mid)?) {
                tracing::debug!(vol = mid, iterations, "implied vol converged (bisection)");
                return Ok(VolatilityResult::found(mid, iterations, SolverMethod::Bisection));
            }

            if diff > 0.0 {
                high = mid;
            } else {
                low = mid;
            }
        }

        tracing::warn!(
            side = %terms.side(),
            price = target,
            iterations,
            "implied volatility solver did not converge"
        );
        Ok(VolatilityResult::not_found(iterations, SolverMethod::Bisection))
    }
}
