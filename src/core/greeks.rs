//! Option Greeks
//!
//! First and second order Black-Scholes sensitivities.

use serde::{Deserialize, Serialize};

/// Decimal places kept when Greeks are reported
pub const REPORT_DECIMALS: u32 = 4;

/// Option Greeks (sensitivities)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Delta: dV/dS (sensitivity to spot)
    pub delta: f64,
    /// Gamma: d²V/dS² (sensitivity of delta to spot)
    pub gamma: f64,
    /// Theta: dV/dt per calendar day
    pub theta: f64,
    /// Vega: dV/dσ per 1% vol move
    pub vega: f64,
    /// Rho: dV/dr per 1% rate move
    pub rho: f64,
}

impl Greeks {
    pub fn new(delta: f64, gamma: f64, theta: f64, vega: f64, rho: f64) -> Self {
        Self {
            delta,
            gamma,
            theta,
            vega,
            rho,
        }
    }

    /// Copy with every value rounded half away from zero to `decimals` places
    pub fn rounded(&self, decimals: u32) -> Self {
        let factor = 10_f64.powi(decimals as i32);
        let round = |x: f64| (x * factor).round() / factor;
        Self {
            delta: round(self.delta),
            gamma: round(self.gamma),
            theta: round(self.theta),
            vega: round(self.vega),
            rho: round(self.rho),
        }
    }

    /// Rounded to the reporting precision
    pub fn for_reporting(&self) -> Self {
        self.rounded(REPORT_DECIMALS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounding() {
        let g = Greeks::new(0.512_349, 0.000_149_6, -12.345_67, 2.000_05, -0.333_349);
        let r = g.for_reporting();
        assert_eq!(r.delta, 0.5123);
        assert_eq!(r.gamma, 0.0001);
        assert_eq!(r.theta, -12.3457);
        assert_eq!(r.rho, -0.3333);

        // Full precision is kept on the unrounded value
        assert_eq!(g.delta, 0.512_349);
    }
}
