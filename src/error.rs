//! Errors raised before or during a sweep.
//!
//! Configuration problems are caught up front by [`SweepConfig::validate`],
//! so a sweep either runs to completion or never starts. Allocation failure
//! is the only error that can appear mid-sweep, and it aborts the run
//! without reporting partial results.
//!
//! [`SweepConfig::validate`]: crate::sweep::SweepConfig::validate

use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BenchError {
    #[error("no matrix sizes configured")]
    EmptySizes,

    #[error("matrix size at position {index} must be positive, got {size}")]
    InvalidSize { index: usize, size: usize },

    #[error("repeat count at position {index} must be at least 1")]
    ZeroRepeats { index: usize },

    #[error("{repeats} repeat counts given for {sizes} sizes")]
    RepeatsMismatch { sizes: usize, repeats: usize },

    #[error("no loop orders selected")]
    NoOrders,

    #[error("a {n}x{n} matrix does not fit in the address space")]
    SizeOverflow { n: usize },

    #[error("failed to allocate a {n}x{n} matrix")]
    Allocation {
        n: usize,
        #[source]
        source: TryReserveError,
    },
}

pub type Result<T> = std::result::Result<T, BenchError>;
