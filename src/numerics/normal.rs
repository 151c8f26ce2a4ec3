//! Standard normal distribution

use statrs::function::erf::erfc;
use std::f64::consts::{PI, SQRT_2};

/// Standard normal CDF, Φ(x) = erfc(-x/√2) / 2
///
/// The complementary form keeps full relative precision in the lower tail.
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Standard normal PDF
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_norm_cdf() {
        assert_abs_diff_eq!(norm_cdf(0.0), 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(norm_cdf(1.96), 0.975_002_104_851_780, epsilon = 1e-9);
        assert_abs_diff_eq!(norm_cdf(-1.0), 0.158_655_253_931_457, epsilon = 1e-9);
        assert_abs_diff_eq!(norm_cdf(-1.0) + norm_cdf(1.0), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_norm_cdf_tails() {
        assert!(norm_cdf(-40.0) >= 0.0);
        assert!(norm_cdf(-10.0) > 0.0);
        assert_abs_diff_eq!(norm_cdf(10.0), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_norm_pdf() {
        assert_abs_diff_eq!(norm_pdf(0.0), 0.398_942_280_401_432_7, epsilon = 1e-15);
        assert_abs_diff_eq!(norm_pdf(1.5), norm_pdf(-1.5), epsilon = 1e-16);
    }
}
