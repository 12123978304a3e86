//! Numeric building blocks: the discretized normal win model and series bisection.

pub mod bisect;
pub mod normal;

pub use bisect::*;
pub use normal::*;
