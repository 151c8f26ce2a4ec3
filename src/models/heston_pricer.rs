//! Semi-analytic Heston pricer
//!
//! Gil-Pelaez inversion of the characteristic function on a truncated
//! frequency domain, integrated with a fixed-order Gauss-Legendre rule:
//!
//! C = ½(S·e^{-qT} - K·e^{-rT})
//!   + e^{-rT}/π · ∫_0^U Re[e^{iu·ln(S/K)} (S·ψ(u-i) - K·ψ(u)) / (iu)] du
//!
//! where ψ is the log-return characteristic function. This is
//! S·e^{-qT}·P1 - K·e^{-rT}·P2 with both probabilities folded into one
//! integrand. Puts come from put-call parity on the same integral, so the
//! pair is parity-consistent to rounding.

use std::f64::consts::PI;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use super::heston::{log_return_characteristic, HestonParams};
use crate::core::{ContractTerms, OptionType, PricingResult, QuadratureConfig};
use crate::numerics::complex::expi;
use crate::numerics::GaussLegendre;

/// ln of the target decay of ψ at the truncation point, |ψ(U)| ≈ e^{-36}
const TAIL_LOG_DECAY: f64 = 36.0;
/// Floor on integrated variance when sizing the domain
const MIN_INTEGRATED_VARIANCE: f64 = 1e-10;
/// Hard cap on the extended truncation point
const MAX_INTEGRATION_LIMIT: f64 = 1e4;

/// Numerical trouble that was repaired rather than raised
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NumericWarning {
    /// Quadrature returned a negative price, reported as zero
    NegativePriceClamped { raw: f64 },
    /// Quadrature returned NaN or infinity, reported as zero
    NonFinitePrice,
}

impl std::fmt::Display for NumericWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumericWarning::NegativePriceClamped { raw } => {
                write!(f, "negative model price {raw:.6e} clamped to zero")
            }
            NumericWarning::NonFinitePrice => f.write_str("non-finite model price replaced by zero"),
        }
    }
}

/// Heston price of one option
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceResult {
    /// Net present value, never negative
    pub npv: f64,
    pub side: OptionType,
    /// Parameters the price was computed with
    pub params: HestonParams,
    pub warning: Option<NumericWarning>,
}

impl PriceResult {
    fn from_raw(raw: f64, side: OptionType, params: HestonParams) -> Self {
        let (npv, warning) = if !raw.is_finite() {
            (0.0, Some(NumericWarning::NonFinitePrice))
        } else if raw < 0.0 {
            (0.0, Some(NumericWarning::NegativePriceClamped { raw }))
        } else {
            (raw, None)
        };

        if let Some(w) = warning {
            tracing::warn!(%side, warning = %w, "heston price clamped");
        }

        Self { npv, side, params, warning }
    }

    pub fn is_clamped(&self) -> bool {
        self.warning.is_some()
    }
}

/// European option pricer for the Heston model
#[derive(Debug, Clone)]
pub struct HestonPricer {
    config: QuadratureConfig,
    rule: GaussLegendre,
}

impl HestonPricer {
    pub fn new(config: QuadratureConfig) -> PricingResult<Self> {
        config.validate()?;
        let rule = GaussLegendre::new(config.nodes)?;
        Ok(Self { config, rule })
    }

    pub fn config(&self) -> &QuadratureConfig {
        &self.config
    }

    /// Upper end of the frequency integral
    ///
    /// ψ(u) decays roughly like exp(-V·u²/2) with V the integrated variance.
    /// For short maturities that is far slower than the configured bound
    /// assumes, so the bound is widened until the tail is negligible.
    pub fn integration_limit(&self, terms: &ContractTerms, params: &HestonParams) -> f64 {
        let base = self.config.upper_bound;
        if !self.config.extend_for_short_maturity {
            return base;
        }
        let variance = params
            .expected_integrated_variance(terms.time())
            .max(MIN_INTEGRATED_VARIANCE);
        let tail = (2.0 * TAIL_LOG_DECAY / variance).sqrt();
        base.max(tail.min(MAX_INTEGRATION_LIMIT))
    }

    /// Call value straight from the quadrature, before clamping
    fn raw_call(&self, terms: &ContractTerms, params: &HestonParams) -> f64 {
        let spot = terms.spot();
        let strike = terms.strike();
        let (time, rate, div) = (terms.time(), terms.rate(), terms.div_yield());
        let log_ratio = (spot / strike).ln();
        let i = Complex64::i();

        let limit = self.integration_limit(terms, params);
        tracing::debug!(limit, nodes = self.rule.order(), "integrating heston characteristic function");

        let integral = self.rule.integrate(0.0, limit, |u| {
            let w = Complex64::new(u, 0.0);
            let psi_shifted = log_return_characteristic(w - i, time, rate, div, params);
            let psi = log_return_characteristic(w, time, rate, div, params);
            let numerator = expi(u * log_ratio) * (spot * psi_shifted - strike * psi);
            (numerator / (i * u)).re
        });

        0.5 * terms.parity_spread() + (-rate * time).exp() / PI * integral
    }

    /// Price the option on the side given by `terms`
    pub fn price(&self, terms: &ContractTerms, params: &HestonParams) -> PricingResult<PriceResult> {
        params.validate()?;
        let call = self.raw_call(terms, params);
        let raw = match terms.side() {
            OptionType::Call => call,
            OptionType::Put => call - terms.parity_spread(),
        };
        Ok(PriceResult::from_raw(raw, terms.side(), *params))
    }

    /// Call and put from a single integration
    pub fn price_pair(
        &self,
        terms: &ContractTerms,
        params: &HestonParams,
    ) -> PricingResult<(PriceResult, PriceResult)> {
        params.validate()?;
        let call = self.raw_call(terms, params);
        let put = call - terms.parity_spread();
        Ok((
            PriceResult::from_raw(call, OptionType::Call, *params),
            PriceResult::from_raw(put, OptionType::Put, *params),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::black_scholes;
    use approx::assert_abs_diff_eq;

    fn pricer() -> HestonPricer {
        HestonPricer::new(QuadratureConfig::default()).unwrap()
    }

    fn terms(spot: f64, strike: f64, time: f64, rate: f64, div: f64) -> ContractTerms {
        ContractTerms::new(spot, strike, time, rate, div, OptionType::Call).unwrap()
    }

    #[test]
    fn test_heston_price() {
        let params = HestonParams::new(0.04, 2.0, 0.04, 0.3, -0.7);
        let t = terms(100.0, 100.0, 0.5, 0.05, 0.01);
        let (call, put) = pricer().price_pair(&t, &params).unwrap();

        assert!(call.npv > 0.0);
        assert!(put.npv > 0.0);
        assert!(call.warning.is_none() && put.warning.is_none());
        assert_abs_diff_eq!(call.npv - put.npv, t.parity_spread(), epsilon = 1e-9);
    }

    #[test]
    fn test_price_matches_price_pair() {
        let params = HestonParams::new(0.05, 1.5, 0.06, 0.6, -0.8);
        let t = terms(100.0, 110.0, 0.5, 0.03, 0.0);
        let p = pricer();
        let (call, put) = p.price_pair(&t, &params).unwrap();
        assert_eq!(p.price(&t, &params).unwrap().npv, call.npv);
        assert_eq!(p.price(&t.with_side(OptionType::Put), &params).unwrap().npv, put.npv);
    }

    #[test]
    fn test_reduces_to_black_scholes() {
        let t = terms(100.0, 100.0, 1.0, 0.05, 0.01);
        let bs = black_scholes::price(&t, 0.2).unwrap();

        let exact = HestonParams::new(0.04, 2.0, 0.04, 0.0, 0.0);
        assert_abs_diff_eq!(pricer().price(&t, &exact).unwrap().npv, bs, epsilon = 1e-6);

        let nearly = HestonParams::new(0.04, 2.0, 0.04, 1e-4, 0.0);
        assert_abs_diff_eq!(pricer().price(&t, &nearly).unwrap().npv, bs, epsilon = 1e-3);
    }

    #[test]
    fn test_negative_correlation_skew() {
        // Negative rho fattens the left tail: OTM puts gain relative to BS
        let params = HestonParams::new(0.04, 2.0, 0.04, 0.6, -0.8);
        let put = terms(100.0, 80.0, 0.5, 0.0, 0.0).with_side(OptionType::Put);
        let heston = pricer().price(&put, &params).unwrap().npv;
        let bs = black_scholes::price(&put, 0.2).unwrap();
        assert!(heston > bs, "heston {heston} vs bs {bs}");
    }

    #[test]
    fn test_node_count_insensitivity() {
        let params = HestonParams::new(0.04, 2.0, 0.04, 0.3, -0.7);
        let t = terms(100.0, 100.0, 1.0, 0.05, 0.01);
        let coarse = HestonPricer::new(QuadratureConfig::with_nodes(32)).unwrap();
        let fine = HestonPricer::new(QuadratureConfig::with_nodes(128)).unwrap();
        let diff = coarse.price(&t, &params).unwrap().npv - fine.price(&t, &params).unwrap().npv;
        assert!(diff.abs() < 1e-4, "diff = {diff}");
    }

    #[test]
    fn test_node_count_insensitivity_short_dated() {
        // Two-day index option: the widened domain is where the nodes are spread thinnest
        let t = ContractTerms::from_days(24756.75, 24750.0, 2, 0.05, 0.0, OptionType::Call).unwrap();
        let params = HestonParams::seeded_from_vol_default(0.233);
        let coarse = HestonPricer::new(QuadratureConfig::with_nodes(32)).unwrap();
        let fine = HestonPricer::new(QuadratureConfig::with_nodes(128)).unwrap();

        assert!(fine.integration_limit(&t, &params) > 400.0);
        let coarse_npv = coarse.price(&t, &params).unwrap().npv;
        let fine_npv = fine.price(&t, &params).unwrap().npv;
        assert!((coarse_npv - fine_npv).abs() < 1e-4, "diff = {}", coarse_npv - fine_npv);
        assert_abs_diff_eq!(fine_npv, 177.11, epsilon = 0.1);
    }

    #[test]
    fn test_integration_limit() {
        let p = pricer();
        let params = HestonParams::new(0.04, 2.0, 0.04, 0.3, -0.7);

        // One year: the configured bound is already wide enough
        assert_eq!(p.integration_limit(&terms(100.0, 100.0, 1.0, 0.0, 0.0), &params), 100.0);

        // Two days: widened
        let short = terms(100.0, 100.0, 2.0 / 365.0, 0.0, 0.0);
        assert!(p.integration_limit(&short, &params) > 500.0);

        let fixed = HestonPricer::new(QuadratureConfig {
            extend_for_short_maturity: false,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(fixed.integration_limit(&short, &params), 100.0);

        // Zero variance hits the cap
        let flat = HestonParams::new(0.0, 1.0, 0.0, 0.0, 0.0);
        assert_eq!(p.integration_limit(&short, &flat), MAX_INTEGRATION_LIMIT);
    }

    #[test]
    fn test_clamping() {
        let params = HestonParams::new(0.04, 2.0, 0.04, 0.3, -0.7);
        let clamped = PriceResult::from_raw(-1e-7, OptionType::Put, params);
        assert_eq!(clamped.npv, 0.0);
        assert_eq!(clamped.warning, Some(NumericWarning::NegativePriceClamped { raw: -1e-7 }));
        assert!(clamped.is_clamped());

        let nan = PriceResult::from_raw(f64::NAN, OptionType::Call, params);
        assert_eq!(nan.npv, 0.0);
        assert_eq!(nan.warning, Some(NumericWarning::NonFinitePrice));

        let fine = PriceResult::from_raw(1.25, OptionType::Call, params);
        assert_eq!(fine.npv, 1.25);
        assert!(!fine.is_clamped());
    }

    #[test]
    fn test_far_otm_call() {
        // Negative rho thins the right tail: far OTM calls lose against BS
        let params = HestonParams::new(0.04, 2.0, 0.04, 0.3, -0.5);
        let t = terms(100.0, 140.0, 0.25, 0.0, 0.0);
        let result = pricer().price(&t, &params).unwrap();
        assert!(result.npv >= 0.0);
        assert!(result.npv < black_scholes::price(&t, 0.2).unwrap());

        let fine = HestonPricer::new(QuadratureConfig::with_nodes(256)).unwrap();
        assert_abs_diff_eq!(result.npv, fine.price(&t, &params).unwrap().npv, epsilon = 1e-8);
    }

    #[test]
    fn test_invalid_params_rejected() {
        let t = terms(100.0, 100.0, 1.0, 0.0, 0.0);
        let bad = HestonParams::new(0.04, -1.0, 0.04, 0.3, -0.7);
        assert!(pricer().price(&t, &bad).unwrap_err().is_domain());
    }

    #[test]
    fn test_zero_nodes_rejected() {
        assert!(HestonPricer::new(QuadratureConfig::with_nodes(0)).is_err());
    }
}
