//! Pricing facade
//!
//! One entry point for a call/put pair: implied vol from the market price,
//! Greeks at that vol, and an independent Heston price. Each leg succeeds or
//! fails on its own.

use serde::{Deserialize, Serialize};

use crate::core::{ContractTerms, EngineConfig, Greeks, MarketQuote, OptionType, PricingError, PricingResult};
use crate::models::black_scholes;
use crate::models::{HestonParams, HestonPricer, ImpliedVolSolver, PriceResult, VolatilityResult};
use crate::models::{SEED_KAPPA, SEED_RHO, SEED_SIGMA};

/// Where the Heston parameters of a leg come from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HestonSpec {
    /// Independently calibrated parameters, used for both legs
    Explicit(HestonParams),
    /// v0 = θ = (leg implied vol)², other parameters fixed
    SeededFromImpliedVol { kappa: f64, sigma: f64, rho: f64 },
}

impl Default for HestonSpec {
    fn default() -> Self {
        Self::SeededFromImpliedVol {
            kappa: SEED_KAPPA,
            sigma: SEED_SIGMA,
            rho: SEED_RHO,
        }
    }
}

impl HestonSpec {
    /// Parameters for a leg, `None` when seeding needs a vol that was not found
    pub fn resolve(&self, implied_vol: Option<f64>) -> Option<HestonParams> {
        match *self {
            HestonSpec::Explicit(params) => Some(params),
            HestonSpec::SeededFromImpliedVol { kappa, sigma, rho } => {
                implied_vol.map(|vol| HestonParams::seeded_from_vol(vol, kappa, sigma, rho))
            }
        }
    }
}

/// Results for one option
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegReport {
    pub quote: MarketQuote,
    pub implied_vol: VolatilityResult,
    /// Greeks at the implied vol, `None` if it was not found
    pub greeks: Option<Greeks>,
    /// `None` if the parameters are seeded from an implied vol that was not found
    pub heston: Option<PriceResult>,
}

/// Results for a call/put pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingReport {
    pub call: PricingResult<LegReport>,
    pub put: PricingResult<LegReport>,
}

/// Orchestrates the solver, Black-Scholes Greeks and the Heston pricer
#[derive(Debug, Clone)]
pub struct PricingFacade {
    solver: ImpliedVolSolver,
    heston: HestonPricer,
}

impl PricingFacade {
    pub fn new(config: EngineConfig) -> PricingResult<Self> {
        config.validate()?;
        Ok(Self {
            solver: ImpliedVolSolver::new(config.solver)?,
            heston: HestonPricer::new(config.quadrature)?,
        })
    }

    pub fn with_defaults() -> PricingResult<Self> {
        Self::new(EngineConfig::default())
    }

    pub fn solver(&self) -> &ImpliedVolSolver {
        &self.solver
    }

    pub fn heston_pricer(&self) -> &HestonPricer {
        &self.heston
    }

    /// Evaluate both legs with one explicit Heston parameter set
    pub fn evaluate(
        &self,
        call_terms: ContractTerms,
        put_terms: ContractTerms,
        call_price: f64,
        put_price: f64,
        params: &HestonParams,
    ) -> PricingReport {
        self.evaluate_with(call_terms, put_terms, call_price, put_price, &HestonSpec::Explicit(*params))
    }

    /// Evaluate both legs, choosing Heston parameters per `spec`
    pub fn evaluate_with(
        &self,
        call_terms: ContractTerms,
        put_terms: ContractTerms,
        call_price: f64,
        put_price: f64,
        spec: &HestonSpec,
    ) -> PricingReport {
        let call_leg = || self.evaluate_side(call_terms, call_price, OptionType::Call, spec);
        let put_leg = || self.evaluate_side(put_terms, put_price, OptionType::Put, spec);

        #[cfg(feature = "parallel")]
        let (call, put) = rayon::join(call_leg, put_leg);
        #[cfg(not(feature = "parallel"))]
        let (call, put) = (call_leg(), put_leg());

        PricingReport { call, put }
    }

    fn evaluate_side(
        &self,
        terms: ContractTerms,
        price: f64,
        expected: OptionType,
        spec: &HestonSpec,
    ) -> PricingResult<LegReport> {
        if terms.side() != expected {
            return Err(PricingError::domain(format!(
                "{expected} leg was given {} contract terms",
                terms.side()
            )));
        }
        let quote = MarketQuote::new(terms, price)?;
        self.evaluate_leg(&quote, spec)
    }

    /// Implied vol, Greeks and Heston price for a single quote
    pub fn evaluate_leg(&self, quote: &MarketQuote, spec: &HestonSpec) -> PricingResult<LegReport> {
        let terms = quote.terms();
        tracing::debug!(side = %terms.side(), price = quote.price(), "evaluating leg");

        let implied_vol = self.solver.solve(quote)?;
        let greeks = implied_vol
            .volatility
            .map(|vol| black_scholes::greeks(terms, vol))
            .transpose()?;
        let heston = spec
            .resolve(implied_vol.volatility)
            .map(|params| self.heston.price(terms, &params))
            .transpose()?;

        Ok(LegReport {
            quote: *quote,
            implied_vol,
            greeks,
            heston,
        })
    }
}
