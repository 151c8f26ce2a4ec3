//! Numerics kernel
//!
//! - Standard normal CDF/PDF
//! - Complex helpers for characteristic functions
//! - Gauss-Legendre quadrature

pub mod normal;
pub mod complex;
pub mod quadrature;

pub use normal::*;
pub use quadrature::GaussLegendre;
