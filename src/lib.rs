//! How much does loop order matter for a naive matrix multiply?
//!
//! The textbook triple loop `C[i][j] += A[i][k] * B[k][j]` can nest its
//! three indices in six ways. All six compute the same product, but they
//! walk memory very differently, and once the matrices outgrow the caches
//! the gap between the best and the worst order is an order of magnitude.
//! This crate times all six over a range of sizes and fits a cubic trend to
//! each order's timings.
//!
//! ## Usage
//!
//! ```
//! use looporder::{LoopOrder, Repeats, SweepConfig, fit_trends, run_sweep};
//!
//! let config = SweepConfig {
//!     sizes: vec![8, 16, 24, 32],
//!     repeats: Repeats::Uniform(2),
//!     ..SweepConfig::default()
//! };
//!
//! let result = run_sweep(&config).unwrap();
//! assert_eq!(result.samples.len(), 4 * LoopOrder::ALL.len());
//!
//! let trends = fit_trends(&result.samples);
//! assert_eq!(trends.len(), LoopOrder::ALL.len() + 1); // six orders + average
//! ```
//!
//! ## What's inside
//!
//! - `matrix`: contiguous n×n storage, operand factory, the six-way kernel
//! - `timing`: repeated measurement with median or mean aggregation
//! - `sweep`: the size × order benchmark and best-order selection
//! - `fit`: least-squares cubic via normal equations, with R²
//! - `report`: CSV, console summary and Markdown output

pub mod error;
pub mod fit;
pub mod logging;
pub mod matrix;
pub mod report;
pub mod sweep;
pub mod timing;

pub use error::BenchError;
pub use fit::{CubicFit, Poly3, Trend, TrendSeries, fit_cubic, fit_trends, r_squared};
pub use matrix::kernel::multiply;
pub use matrix::order::LoopOrder;
pub use matrix::{FillPolicy, Matrix, MatrixFactory, Operands};
pub use sweep::{
    BestOrder, Repeats, SweepConfig, SweepResult, TimingSample, best_order, gflops, run_sweep,
};
pub use timing::{Aggregation, aggregate, measure};
