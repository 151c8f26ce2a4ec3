//! Heston Stochastic Volatility Model
//!
//! The Heston model assumes variance follows a mean-reverting square-root process:
//!
//! dS = (r - q) * S * dt + √v * S * dW_S
//! dv = κ(θ - v) * dt + σ_v * √v * dW_v
//!
//! where:
//! - S: spot price
//! - v: instantaneous variance
//! - κ: mean reversion speed
//! - θ: long-term variance
//! - σ_v: volatility of volatility (vol-of-vol)
//! - ρ: correlation between spot and variance Brownians
//!
//! The characteristic function uses the "little trap" formulation of
//! Albrecher et al., which stays on one branch of the complex logarithm for
//! all maturities.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::core::{ContractTerms, PricingError, PricingResult};
use crate::numerics::complex::{ln_1p, sqrt_right_half};

/// Mean reversion used when seeding parameters from an implied vol
pub const SEED_KAPPA: f64 = 2.0;
/// Vol-of-vol used when seeding parameters from an implied vol
pub const SEED_SIGMA: f64 = 0.5;
/// Spot/variance correlation used when seeding parameters from an implied vol
pub const SEED_RHO: f64 = -0.75;

/// Heston model parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HestonParams {
    /// Initial variance (v0)
    pub v0: f64,
    /// Mean reversion speed (κ)
    pub kappa: f64,
    /// Long-term variance (θ)
    pub theta: f64,
    /// Volatility of volatility (σ_v)
    pub sigma: f64,
    /// Correlation between spot and variance (ρ)
    pub rho: f64,
}

impl HestonParams {
    /// Create new Heston parameters
    pub fn new(v0: f64, kappa: f64, theta: f64, sigma: f64, rho: f64) -> Self {
        Self { v0, kappa, theta, sigma, rho }
    }

    /// Flat variance seeded from a Black-Scholes vol: v0 = θ = vol²
    ///
    /// Not a calibration. Callers with calibrated parameters should build
    /// them directly.
    pub fn seeded_from_vol(vol: f64, kappa: f64, sigma: f64, rho: f64) -> Self {
        let variance = vol * vol;
        Self::new(variance, kappa, variance, sigma, rho)
    }

    /// `seeded_from_vol` with κ = 2.0, σ_v = 0.5, ρ = -0.75
    pub fn seeded_from_vol_default(vol: f64) -> Self {
        Self::seeded_from_vol(vol, SEED_KAPPA, SEED_SIGMA, SEED_RHO)
    }

    /// Check Feller condition: 2κθ ≥ σ²
    ///
    /// Diagnostic only. When it fails the variance process can touch zero
    /// and the analytic price loses accuracy, but pricing still proceeds.
    pub fn feller_condition(&self) -> bool {
        2.0 * self.kappa * self.theta >= self.sigma * self.sigma
    }

    /// Validate parameters
    pub fn validate(&self) -> PricingResult<()> {
        let all = [self.v0, self.kappa, self.theta, self.sigma, self.rho];
        if all.iter().any(|x| !x.is_finite()) {
            return Err(PricingError::domain("heston parameters must be finite"));
        }
        if self.v0 < 0.0 {
            return Err(PricingError::domain("heston v0 must be >= 0"));
        }
        if self.kappa <= 0.0 {
            return Err(PricingError::domain("heston kappa must be > 0"));
        }
        if self.theta < 0.0 {
            return Err(PricingError::domain("heston theta must be >= 0"));
        }
        if self.sigma < 0.0 {
            return Err(PricingError::domain("heston sigma must be >= 0"));
        }
        if !(-1.0..=1.0).contains(&self.rho) {
            return Err(PricingError::domain("heston rho must be in [-1, 1]"));
        }
        Ok(())
    }

    /// E[∫_0^T v_t dt] = θT + (v0 - θ)(1 - e^{-κT})/κ
    pub fn expected_integrated_variance(&self, time: f64) -> f64 {
        self.theta * time + (self.v0 - self.theta) * (1.0 - (-self.kappa * time).exp()) / self.kappa
    }
}

/// Characteristic function of the log-return, E[exp(iu ln(S_T/S_0))]
///
/// Valid for complex `u`; the pricer evaluates it at `u` and `u - i`.
pub fn log_return_characteristic(
    u: Complex64,
    time: f64,
    rate: f64,
    div_yield: f64,
    params: &HestonParams,
) -> Complex64 {
    let i = Complex64::i();
    let iu = i * u;
    // ξ = iu + u², so that the Black-Scholes exponent is -ξ·v·T/2
    let xi = iu + u * u;
    let drift = iu * ((rate - div_yield) * time);

    let p = params;
    if p.sigma <= f64::EPSILON {
        // Deterministic variance: log-return is Gaussian
        let variance = p.expected_integrated_variance(time);
        return (drift - 0.5 * xi * variance).exp();
    }

    let sigma2 = p.sigma * p.sigma;
    let beta = p.kappa - p.rho * p.sigma * iu;
    let d = sqrt_right_half(beta * beta + sigma2 * xi);

    // β - d rewritten as -σ²ξ/(β + d) to avoid cancellation for small σ
    let beta_plus_d = beta + d;
    let beta_minus_d = -sigma2 * xi / beta_plus_d;
    let g = beta_minus_d / beta_plus_d;
    let exp_neg_dt = (-d * time).exp();
    let one_minus_exp = 1.0 - exp_neg_dt;

    // ln((1 - g e^{-dT}) / (1 - g)) = ln(1 + g(1 - e^{-dT})/(1 - g))
    let log_term = ln_1p(g * one_minus_exp / (1.0 - g));

    let kappa_theta = p.kappa * p.theta;
    let c = -kappa_theta * xi * time / beta_plus_d - (2.0 * kappa_theta / sigma2) * log_term;
    let d_coef = -xi / beta_plus_d * one_minus_exp / (1.0 - g * exp_neg_dt);

    (drift + c + d_coef * p.v0).exp()
}

/// Characteristic function of log-spot, φ(u) = E[exp(iu ln S_T)]
pub fn characteristic_function(u: Complex64, terms: &ContractTerms, params: &HestonParams) -> Complex64 {
    let i = Complex64::i();
    let ln_spot = terms.spot().ln();
    (i * u * ln_spot).exp()
        * log_return_characteristic(u, terms.time(), terms.rate(), terms.div_yield(), params)
}
