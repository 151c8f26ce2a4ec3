//! Black-Scholes Model
//!
//! Provides:
//! - European option pricing
//! - Greeks computation (delta, gamma, theta per day, vega and rho per 1%)
//!
//! The Black-Scholes price and vega drive the implied volatility solver, and
//! the price is the benchmark the Heston pricer must reproduce in its
//! zero vol-of-vol limit.

use crate::core::{ContractTerms, Greeks, OptionType, PricingError, PricingResult};
use crate::numerics::{norm_cdf, norm_pdf};

fn check_vol(vol: f64) -> PricingResult<()> {
    if !vol.is_finite() || vol <= 0.0 {
        return Err(PricingError::domain(format!(
            "volatility must be positive and finite, got {vol}"
        )));
    }
    Ok(())
}

/// Black-Scholes d1 and d2
pub fn d1_d2(terms: &ContractTerms, vol: f64) -> PricingResult<(f64, f64)> {
    check_vol(vol)?;
    let time = terms.time();
    let vol_sqrt_t = vol * time.sqrt();
    let d1 = ((terms.spot() / terms.strike()).ln()
        + (terms.rate() - terms.div_yield() + 0.5 * vol * vol) * time)
        / vol_sqrt_t;
    Ok((d1, d1 - vol_sqrt_t))
}

/// Black-Scholes European option price for the side in `terms`
pub fn price(terms: &ContractTerms, vol: f64) -> PricingResult<f64> {
    let (d1, d2) = d1_d2(terms, vol)?;
    let spot_pv = terms.discounted_spot();
    let strike_pv = terms.discounted_strike();

    let value = match terms.side() {
        OptionType::Call => spot_pv * norm_cdf(d1) - strike_pv * norm_cdf(d2),
        OptionType::Put => strike_pv * norm_cdf(-d2) - spot_pv * norm_cdf(-d1),
    };
    Ok(value)
}

/// dV/dσ per unit of volatility (not scaled to 1%)
pub fn vega_raw(terms: &ContractTerms, vol: f64) -> PricingResult<f64> {
    let (d1, _) = d1_d2(terms, vol)?;
    Ok(terms.discounted_spot() * norm_pdf(d1) * terms.time().sqrt())
}

/// Black-Scholes Greeks
pub fn greeks(terms: &ContractTerms, vol: f64) -> PricingResult<Greeks> {
    let (d1, d2) = d1_d2(terms, vol)?;

    let spot = terms.spot();
    let strike = terms.strike();
    let rate = terms.rate();
    let time = terms.time();
    let sqrt_t = time.sqrt();
    let df = (-rate * time).exp();
    let div_factor = (-terms.div_yield() * time).exp();
    let pdf_d1 = norm_pdf(d1);

    // Delta
    let delta = match terms.side() {
        OptionType::Call => div_factor * norm_cdf(d1),
        OptionType::Put => -div_factor * norm_cdf(-d1),
    };

    // Gamma (same for call and put)
    let gamma = div_factor * pdf_d1 / (spot * vol * sqrt_t);

    // Vega (same for call and put, per 1% vol move)
    let vega = spot * div_factor * pdf_d1 * sqrt_t / 100.0;

    // Theta (per calendar day)
    let decay = -spot * pdf_d1 * vol * div_factor / (2.0 * sqrt_t);
    let theta = match terms.side() {
        OptionType::Call => decay - rate * strike * df * norm_cdf(d2),
        OptionType::Put => decay + rate * strike * df * norm_cdf(-d2),
    };
    let theta_per_day = theta / 365.0;

    // Rho (per 1% rate move)
    let rho = match terms.side() {
        OptionType::Call => strike * time * df * norm_cdf(d2) / 100.0,
        OptionType::Put => -strike * time * df * norm_cdf(-d2) / 100.0,
    };

    Ok(Greeks::new(delta, gamma, theta_per_day, vega, rho))
}
