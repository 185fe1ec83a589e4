//! Core compute primitives (Vector, Matrix).
//!
//! These types carry the numeric data between the feature pipeline stages.
//! Values are `f64` throughout: monetary attributes reach 1e10 and must
//! survive midpoint arithmetic without rounding.

mod matrix;
mod vector;

pub use matrix::Matrix;
pub use vector::Vector;
