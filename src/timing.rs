//! Repeated wall-clock measurement of a single run.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

/// How repeated timings are reduced to one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Aggregation {
    /// Middle of the sorted samples. For an even count the upper of the two
    /// middle samples is taken, so the result is always a measured value.
    #[default]
    Median,
    /// Arithmetic mean.
    Mean,
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggregation::Median => f.pad("median"),
            Aggregation::Mean => f.pad("mean"),
        }
    }
}

impl FromStr for Aggregation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "median" => Ok(Aggregation::Median),
            "mean" | "avg" | "average" => Ok(Aggregation::Mean),
            _ => Err(format!("unknown aggregation '{s}' (expected median or mean)")),
        }
    }
}

/// Reduce `samples` to a single value.
///
/// # Panics
///
/// Panics if `samples` is empty.
///
/// ```
/// use looporder::{Aggregation, aggregate};
///
/// assert_eq!(aggregate(&[3.0, 1.0, 2.0], Aggregation::Median), 2.0);
/// assert_eq!(aggregate(&[1.0, 2.0, 3.0, 6.0], Aggregation::Mean), 3.0);
/// ```
pub fn aggregate(samples: &[f64], policy: Aggregation) -> f64 {
    assert!(!samples.is_empty(), "need at least one sample");

    match policy {
        Aggregation::Median => {
            let mut sorted = samples.to_vec();
            sorted.sort_by(f64::total_cmp);
            sorted[sorted.len() / 2]
        }
        Aggregation::Mean => {
            let (min, max) = samples
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
                    (lo.min(x), hi.max(x))
                });
            let mean = samples.iter().sum::<f64>() / samples.len() as f64;
            // Rounding in the sum can land a ulp outside the sample range.
            mean.clamp(min, max)
        }
    }
}

/// Run `f` `repeats` times and return the aggregated duration in seconds.
///
/// Each run is timed on its own with [`Instant`], a monotonic clock.
///
/// # Panics
///
/// Panics if `repeats` is zero.
pub fn measure<F>(repeats: usize, policy: Aggregation, mut f: F) -> f64
where
    F: FnMut(),
{
    assert!(repeats >= 1, "repeat count must be at least 1");

    let mut samples = Vec::with_capacity(repeats);
    for _ in 0..repeats {
        let start = Instant::now();
        f();
        samples.push(start.elapsed().as_secs_f64());
    }

    tracing::trace!(?samples, %policy, "raw timings");
    aggregate(&samples, policy)
}
