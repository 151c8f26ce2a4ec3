//! Request-level orchestration over the models

pub mod facade;

pub use facade::*;
