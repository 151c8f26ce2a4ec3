//! Property-based tests using proptest.
//!
//! Invariants of the Black-Scholes kernel, the implied volatility solver and
//! the Heston pricer over randomly drawn contracts.

use proptest::prelude::*;
use vanilla_risk::prelude::*;

fn side(is_call: bool) -> OptionType {
    if is_call {
        OptionType::Call
    } else {
        OptionType::Put
    }
}

// --- Implied volatility round trip ---

proptest! {
    /// Pricing at σ and solving back recovers σ.
    #[test]
    fn implied_vol_recovers_input_vol(
        strike in 90.0_f64..110.0,
        time in 0.25_f64..2.0,
        vol in 0.1_f64..0.8,
        rate in 0.0_f64..0.08,
        div in 0.0_f64..0.04,
        is_call in any::<bool>(),
    ) {
        let terms = ContractTerms::new(100.0, strike, time, rate, div, side(is_call)).unwrap();
        let price = bs_price(&terms, vol).unwrap();
        let quote = MarketQuote::new(terms, price).unwrap();

        let result = ImpliedVolSolver::default().solve(&quote).unwrap();
        prop_assert!(result.converged, "no convergence for vol {}", vol);

        let recovered = result.volatility.unwrap();
        let repriced = bs_price(&terms, recovered).unwrap();
        prop_assert!((repriced - price).abs() < 1e-6, "price error {}", repriced - price);
        prop_assert!((recovered - vol).abs() < 1e-6, "vol {} vs {}", recovered, vol);
    }
}

// --- Black-Scholes invariants ---

proptest! {
    /// C - P = S·e^{-qT} - K·e^{-rT} for any vol.
    #[test]
    fn black_scholes_put_call_parity(
        strike in 50.0_f64..150.0,
        time in 0.01_f64..3.0,
        vol in 0.05_f64..1.5,
        rate in -0.01_f64..0.1,
        div in 0.0_f64..0.05,
    ) {
        let call = ContractTerms::new(100.0, strike, time, rate, div, OptionType::Call).unwrap();
        let put = call.with_side(OptionType::Put);
        let lhs = bs_price(&call, vol).unwrap() - bs_price(&put, vol).unwrap();
        prop_assert!((lhs - call.parity_spread()).abs() < 1e-9);
    }

    /// Call delta in (0, 1), put delta in (-1, 0), gamma and vega non-negative.
    #[test]
    fn greek_signs(
        strike in 50.0_f64..150.0,
        time in 0.01_f64..3.0,
        vol in 0.05_f64..1.5,
        rate in 0.0_f64..0.1,
        div in 0.0_f64..0.05,
        is_call in any::<bool>(),
    ) {
        let terms = ContractTerms::new(100.0, strike, time, rate, div, side(is_call)).unwrap();
        let g = bs_greeks(&terms, vol).unwrap();

        if is_call {
            prop_assert!((0.0..=1.0).contains(&g.delta), "call delta {}", g.delta);
            prop_assert!(g.rho >= 0.0);
        } else {
            prop_assert!((-1.0..=0.0).contains(&g.delta), "put delta {}", g.delta);
            prop_assert!(g.rho <= 0.0);
        }
        prop_assert!(g.gamma >= 0.0);
        prop_assert!(g.vega >= 0.0);
    }
}

// --- Heston invariants ---

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Heston call and put from one integration differ by the forward spread.
    #[test]
    fn heston_put_call_parity(
        strike in 80.0_f64..120.0,
        time in 0.25_f64..2.0,
        v0 in 0.01_f64..0.1,
        kappa in 0.5_f64..4.0,
        theta in 0.01_f64..0.1,
        sigma in 0.1_f64..1.0,
        rho in -0.9_f64..0.5,
    ) {
        let terms = ContractTerms::new(100.0, strike, time, 0.03, 0.01, OptionType::Call).unwrap();
        let params = HestonParams::new(v0, kappa, theta, sigma, rho);
        let pricer = HestonPricer::new(QuadratureConfig::default()).unwrap();

        let (call, put) = pricer.price_pair(&terms, &params).unwrap();
        prop_assume!(call.warning.is_none() && put.warning.is_none());

        prop_assert!(call.npv >= 0.0 && put.npv >= 0.0);
        prop_assert!((call.npv - put.npv - terms.parity_spread()).abs() < 1e-9);
    }
}
