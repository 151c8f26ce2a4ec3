//! Gauss-Legendre quadrature
//!
//! Fixed-order rules are deterministic: the same integrand always costs the
//! same number of evaluations and produces the same bits.

use std::f64::consts::PI;

use crate::core::{PricingError, PricingResult};

const MAX_NEWTON_STEPS: usize = 100;

/// Legendre P_n(x) and its derivative via the three-term recurrence
fn legendre_with_derivative(n: usize, x: f64) -> (f64, f64) {
    if n == 0 {
        return (1.0, 0.0);
    }
    if n == 1 {
        return (x, 1.0);
    }

    let mut p_prev = 1.0;
    let mut p = x;
    for k in 2..=n {
        let kf = k as f64;
        let p_next = ((2.0 * kf - 1.0) * x * p - (kf - 1.0) * p_prev) / kf;
        p_prev = p;
        p = p_next;
    }

    let dp = n as f64 * (x * p - p_prev) / (x * x - 1.0);
    (p, dp)
}

/// An n-point Gauss-Legendre rule on [-1, 1]
#[derive(Debug, Clone, PartialEq)]
pub struct GaussLegendre {
    nodes: Vec<f64>,
    weights: Vec<f64>,
}

impl GaussLegendre {
    /// Compute nodes and weights by Newton iteration on P_n
    pub fn new(n: usize) -> PricingResult<Self> {
        if n == 0 {
            return Err(PricingError::config("quadrature nodes must be > 0"));
        }

        let mut nodes = vec![0.0; n];
        let mut weights = vec![0.0; n];
        let nf = n as f64;

        // Roots are symmetric, solve for the positive half
        for i in 0..n.div_ceil(2) {
            let mut z = (PI * (i as f64 + 0.75) / (nf + 0.5)).cos();
            let mut converged = false;

            for _ in 0..MAX_NEWTON_STEPS {
                let (p, dp) = legendre_with_derivative(n, z);
                let dz = -p / dp;
                z += dz;
                if dz.abs() < 1e-15 {
                    converged = true;
                    break;
                }
            }
            if !converged {
                return Err(PricingError::numerical(format!(
                    "Legendre root {i} of order {n} did not converge"
                )));
            }

            let (_, dp) = legendre_with_derivative(n, z);
            let w = 2.0 / ((1.0 - z * z) * dp * dp);

            nodes[i] = -z;
            nodes[n - 1 - i] = z;
            weights[i] = w;
            weights[n - 1 - i] = w;
        }

        Ok(Self { nodes, weights })
    }

    pub fn order(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// ∫_a^b f(x) dx
    pub fn integrate<F>(&self, a: f64, b: f64, f: F) -> f64
    where
        F: Fn(f64) -> f64,
    {
        let half_width = 0.5 * (b - a);
        let center = 0.5 * (b + a);

        let sum: f64 = self
            .nodes
            .iter()
            .zip(&self.weights)
            .map(|(&x, &w)| w * f(half_width * x + center))
            .sum();

        half_width * sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_weights_sum_to_two() {
        for n in [1, 2, 5, 32, 64, 128] {
            let rule = GaussLegendre::new(n).unwrap();
            assert_eq!(rule.order(), n);
            let total: f64 = rule.weights().iter().sum();
            assert_abs_diff_eq!(total, 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_nodes_sorted_and_symmetric() {
        let rule = GaussLegendre::new(7).unwrap();
        let nodes = rule.nodes();
        assert!(nodes.windows(2).all(|w| w[0] < w[1]));
        assert_abs_diff_eq!(nodes[3], 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(nodes[0], -nodes[6], epsilon = 1e-15);
    }

    #[test]
    fn test_exact_for_polynomials() {
        let rule = GaussLegendre::new(8).unwrap();
        assert_abs_diff_eq!(rule.integrate(0.0, 1.0, |x| x.powi(4)), 0.2, epsilon = 1e-14);
        assert_abs_diff_eq!(rule.integrate(-1.0, 1.0, |x| x.powi(15)), 0.0, epsilon = 1e-14);
        assert_abs_diff_eq!(rule.integrate(2.0, 5.0, |x| 3.0 * x * x), 117.0, epsilon = 1e-12);
    }

    #[test]
    fn test_smooth_integrand() {
        let rule = GaussLegendre::new(64).unwrap();
        let value = rule.integrate(0.0, 100.0, |u| (-0.02 * u * u).exp());
        let exact = 0.5 * (PI / 0.02).sqrt();
        assert_abs_diff_eq!(value, exact, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_nodes_rejected() {
        assert!(matches!(GaussLegendre::new(0), Err(PricingError::Config(_))));
    }
}
