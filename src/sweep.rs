//! The size × loop-order benchmark sweep.
//!
//! For every configured size the sweep allocates one set of operands, runs
//! an untimed warm-up product, then times each selected loop order in turn
//! on the same buffers. Everything runs on the calling thread, one product
//! at a time: overlapping runs would share caches and skew the timings.

use std::hint::black_box;

use crate::error::{BenchError, Result};
use crate::matrix::kernel::multiply;
use crate::matrix::order::LoopOrder;
use crate::matrix::{FillPolicy, MatrixFactory};
use crate::timing::{Aggregation, measure};

/// Order used for the untimed warm-up product.
const WARMUP_ORDER: LoopOrder = LoopOrder::Ikj;

/// Repeat count for each size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Repeats {
    /// Same count for every size.
    Uniform(usize),
    /// One count per size, in the same order as the sizes.
    PerSize(Vec<usize>),
}

impl Repeats {
    /// Repeat count for the size at `index`.
    ///
    /// # Panics
    ///
    /// Panics if a per-size list is shorter than `index + 1`; call
    /// [`SweepConfig::validate`] first.
    pub fn for_size(&self, index: usize) -> usize {
        match self {
            Repeats::Uniform(r) => *r,
            Repeats::PerSize(list) => list[index],
        }
    }
}

impl Default for Repeats {
    fn default() -> Self {
        Repeats::Uniform(3)
    }
}

impl From<Vec<usize>> for Repeats {
    /// A single value applies to every size; several are taken per size.
    fn from(mut list: Vec<usize>) -> Self {
        if list.len() == 1 {
            Repeats::Uniform(list.remove(0))
        } else {
            Repeats::PerSize(list)
        }
    }
}

#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Matrix sizes, measured in this order.
    pub sizes: Vec<usize>,
    pub repeats: Repeats,
    pub aggregation: Aggregation,
    pub fill: FillPolicy,
    /// Orders timed at each size, in this order.
    pub orders: Vec<LoopOrder>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            sizes: vec![128, 256, 384, 512, 640],
            repeats: Repeats::default(),
            aggregation: Aggregation::default(),
            fill: FillPolicy::default(),
            orders: LoopOrder::ALL.to_vec(),
        }
    }
}

impl SweepConfig {
    /// Reject configurations that can't be run. Nothing is allocated or
    /// timed until this passes.
    pub fn validate(&self) -> Result<()> {
        if self.sizes.is_empty() {
            return Err(BenchError::EmptySizes);
        }
        if let Some((index, &size)) = self.sizes.iter().enumerate().find(|(_, s)| **s == 0) {
            return Err(BenchError::InvalidSize { index, size });
        }
        if self.orders.is_empty() {
            return Err(BenchError::NoOrders);
        }

        match &self.repeats {
            Repeats::Uniform(0) => return Err(BenchError::ZeroRepeats { index: 0 }),
            Repeats::Uniform(_) => {}
            Repeats::PerSize(list) => {
                if list.len() != self.sizes.len() {
                    return Err(BenchError::RepeatsMismatch {
                        sizes: self.sizes.len(),
                        repeats: list.len(),
                    });
                }
                if let Some(index) = list.iter().position(|&r| r == 0) {
                    return Err(BenchError::ZeroRepeats { index });
                }
            }
        }

        for &n in &self.sizes {
            n.checked_mul(n).ok_or(BenchError::SizeOverflow { n })?;
        }

        Ok(())
    }
}

/// Aggregated timing of one loop order at one size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingSample {
    pub order: LoopOrder,
    pub size: usize,
    /// Aggregated wall-clock time in seconds.
    pub seconds: f64,
}

impl TimingSample {
    pub fn millis(&self) -> f64 {
        self.seconds * 1000.0
    }

    /// Billions of floating-point operations per second, counting one
    /// multiply and one add per inner iteration.
    pub fn gflops(&self) -> f64 {
        gflops(self.size, self.seconds)
    }
}

/// `2·n³ / seconds`, in billions per second.
pub fn gflops(n: usize, seconds: f64) -> f64 {
    let n = n as f64;
    2.0 * n * n * n / seconds / 1e9
}

/// The fastest order measured at one size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestOrder {
    pub size: usize,
    pub order: LoopOrder,
    pub seconds: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SweepResult {
    /// One sample per (size, order), all orders of a size before the next
    /// size.
    pub samples: Vec<TimingSample>,
    /// One entry per size, in sweep order.
    pub best: Vec<BestOrder>,
}

/// Pick the sample with the smallest time.
///
/// Ties go to the order that comes first in [`LoopOrder::ALL`]. Returns
/// `None` for an empty slice.
pub fn best_order(samples: &[TimingSample]) -> Option<&TimingSample> {
    samples.iter().reduce(|best, s| {
        let faster = s.seconds < best.seconds;
        let tie_wins = s.seconds == best.seconds && s.order.index() < best.order.index();
        if faster || tie_wins { s } else { best }
    })
}

/// Run the full sweep described by `config`.
///
/// The configuration is validated before anything is allocated. On an
/// allocation failure the whole sweep fails and no samples are returned.
#[tracing::instrument(skip_all, fields(sizes = ?config.sizes, aggregation = %config.aggregation))]
pub fn run_sweep(config: &SweepConfig) -> Result<SweepResult> {
    config.validate()?;

    let mut factory = MatrixFactory::new(config.fill);
    tracing::debug!(fill = ?factory.policy(), orders = config.orders.len(), "matrix factory ready");
    let mut result = SweepResult {
        samples: Vec::with_capacity(config.sizes.len() * config.orders.len()),
        best: Vec::with_capacity(config.sizes.len()),
    };

    for (index, &n) in config.sizes.iter().enumerate() {
        let repeats = config.repeats.for_size(index);
        let mut ops = factory.operands(n)?;

        multiply(WARMUP_ORDER, &ops.a, &ops.b, &mut ops.c);

        let first = result.samples.len();
        for &order in &config.orders {
            let seconds = measure(repeats, config.aggregation, || {
                multiply(order, &ops.a, &ops.b, &mut ops.c);
                black_box(ops.c.as_slice());
            });

            let sample = TimingSample { order, size: n, seconds };
            tracing::debug!(
                order = %order,
                n,
                repeats,
                time_ms = sample.millis(),
                gflops = sample.gflops(),
                "timed"
            );
            result.samples.push(sample);
        }

        if let Some(best) = best_order(&result.samples[first..]) {
            tracing::info!(n, best = %best.order, time_ms = best.millis(), "size done");
            result.best.push(BestOrder {
                size: n,
                order: best.order,
                seconds: best.seconds,
            });
        }
    }

    Ok(result)
}
