//! Complex helpers for characteristic function evaluation

use num_complex::Complex64;

/// Below this modulus `ln_1p` switches to its Taylor series
const LN_1P_SERIES_CUTOFF: f64 = 1e-4;

/// Square root on the right half-plane (Re ≥ 0)
pub fn sqrt_right_half(z: Complex64) -> Complex64 {
    let root = z.sqrt();
    if root.re < 0.0 {
        -root
    } else {
        root
    }
}

/// ln(1 + z) without cancellation for small |z|
pub fn ln_1p(z: Complex64) -> Complex64 {
    if z.norm() < LN_1P_SERIES_CUTOFF {
        let z2 = z * z;
        z - z2 * 0.5 + z2 * z / 3.0 - z2 * z2 * 0.25
    } else {
        (1.0 + z).ln()
    }
}

/// Unit phase e^{iθ}
pub fn expi(theta: f64) -> Complex64 {
    Complex64::from_polar(1.0, theta)
}
