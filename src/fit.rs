//! Least-squares cubic trends over (size, time) series.
//!
//! The fit solves the 4×4 normal equations built from power sums of the
//! sizes with Gauss-Jordan elimination and partial pivoting. Sizes are first
//! mapped affinely onto [-1, 1]: raw power sums up to n⁶ span far more
//! magnitudes than an f64 can resolve once n reaches the hundreds. The
//! solution is mapped back so [`Poly3`] always holds coefficients in the
//! raw size.

use std::fmt;

use crate::matrix::order::LoopOrder;
use crate::sweep::TimingSample;

/// Pivots below this fraction of the largest normal-matrix entry are
/// treated as zero.
const PIVOT_TOLERANCE: f64 = 1e-12;

/// `a3·x³ + a2·x² + a1·x + a0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Poly3 {
    pub a3: f64,
    pub a2: f64,
    pub a1: f64,
    pub a0: f64,
}

impl Poly3 {
    pub const ZERO: Poly3 = Poly3 {
        a3: 0.0,
        a2: 0.0,
        a1: 0.0,
        a0: 0.0,
    };

    /// Coefficients highest power first.
    pub fn coefficients(&self) -> [f64; 4] {
        [self.a3, self.a2, self.a1, self.a0]
    }

    pub fn eval(&self, x: f64) -> f64 {
        ((self.a3 * x + self.a2) * x + self.a1) * x + self.a0
    }
}

impl fmt::Display for Poly3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "y = {:.6e}·n³ + {:.6e}·n² + {:.6e}·n + {:.6e}",
            self.a3, self.a2, self.a1, self.a0
        )
    }
}

/// Result of [`fit_cubic`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicFit {
    pub poly: Poly3,
    /// Coefficient of determination. 1.0 is a perfect fit; negative values
    /// mean the curve does worse than the mean.
    pub r_squared: f64,
    /// The normal equations were singular (too few distinct sizes). `poly`
    /// is then zero and `r_squared` is 0.
    pub singular: bool,
}

impl CubicFit {
    fn degenerate() -> Self {
        Self {
            poly: Poly3::ZERO,
            r_squared: 0.0,
            singular: true,
        }
    }
}

/// Fit `y ≈ a3·x³ + a2·x² + a1·x + a0` to `points` by ordinary least squares.
///
/// Fewer than four distinct x values leave the system singular; the fit then
/// comes back with `singular == true` instead of failing.
///
/// ```
/// use looporder::fit_cubic;
///
/// let points: Vec<(f64, f64)> = (1..=6)
///     .map(|x| x as f64)
///     .map(|x| (x, 2.0 * x * x * x - x + 5.0))
///     .collect();
///
/// let fit = fit_cubic(&points);
/// assert!(!fit.singular);
/// assert!((fit.poly.a3 - 2.0).abs() < 1e-8);
/// assert!((fit.r_squared - 1.0).abs() < 1e-12);
/// ```
#[tracing::instrument(level = "debug", skip_all, fields(points = points.len()))]
pub fn fit_cubic(points: &[(f64, f64)]) -> CubicFit {
    if points.len() < 4 {
        tracing::warn!(points = points.len(), "too few points for a cubic fit");
        return CubicFit::degenerate();
    }

    let count = points.len() as f64;
    let center = points.iter().map(|&(x, _)| x).sum::<f64>() / count;
    let spread = points
        .iter()
        .map(|&(x, _)| (x - center).abs())
        .fold(0.0, f64::max);
    let scale = if spread > 0.0 { spread } else { 1.0 };

    // Power sums Σt^p for p in 0..=6 and Σy·t^p for p in 0..=3, t normalised.
    let mut powers = [0.0f64; 7];
    let mut rhs = [0.0f64; 4];
    for &(x, y) in points {
        let t = (x - center) / scale;
        let mut tp = 1.0;
        for (p, sum) in powers.iter_mut().enumerate() {
            *sum += tp;
            if p < 4 {
                rhs[p] += y * tp;
            }
            tp *= t;
        }
    }

    let mut system = [[0.0f64; 5]; 4];
    for (r, row) in system.iter_mut().enumerate() {
        row[..4].copy_from_slice(&powers[r..r + 4]);
        row[4] = rhs[r];
    }

    let Some(d) = solve(system) else {
        tracing::warn!(points = points.len(), "normal equations are singular");
        return CubicFit::degenerate();
    };

    let fitted = points.iter().map(|&(x, _)| {
        let t = (x - center) / scale;
        ((d[3] * t + d[2]) * t + d[1]) * t + d[0]
    });
    let r_squared = coefficient_of_determination(points.iter().map(|&(_, y)| y), fitted);

    CubicFit {
        poly: denormalize(d, center, scale),
        r_squared,
        singular: false,
    }
}

/// R² of `poly` against `points`.
pub fn r_squared(points: &[(f64, f64)], poly: &Poly3) -> f64 {
    coefficient_of_determination(
        points.iter().map(|&(_, y)| y),
        points.iter().map(|&(x, _)| poly.eval(x)),
    )
}

// 1 - SS_res / SS_tot. A series with no variance counts as a perfect fit.
fn coefficient_of_determination<I, J>(observed: I, fitted: J) -> f64
where
    I: Iterator<Item = f64> + Clone,
    J: Iterator<Item = f64>,
{
    let (count, sum, sum_sq) = observed
        .clone()
        .fold((0usize, 0.0, 0.0), |(n, s, q), y| (n + 1, s + y, q + y * y));
    if count == 0 {
        return 1.0;
    }
    let mean = sum / count as f64;

    let mut ss_tot = 0.0;
    let mut ss_res = 0.0;
    for (y, yhat) in observed.zip(fitted) {
        ss_tot += (y - mean) * (y - mean);
        ss_res += (y - yhat) * (y - yhat);
    }

    if ss_tot <= f64::EPSILON * sum_sq {
        return 1.0;
    }
    1.0 - ss_res / ss_tot
}

/// Gauss-Jordan elimination with partial pivoting on an augmented 4×5
/// system. `None` when a pivot falls below tolerance.
fn solve(mut m: [[f64; 5]; 4]) -> Option<[f64; 4]> {
    let largest = m
        .iter()
        .flat_map(|row| row[..4].iter())
        .fold(0.0f64, |acc, v| acc.max(v.abs()));
    let tolerance = PIVOT_TOLERANCE * largest;

    for col in 0..4 {
        let pivot_row = (col..4).max_by(|&r, &s| m[r][col].abs().total_cmp(&m[s][col].abs()))?;
        if m[pivot_row][col].abs() <= tolerance {
            return None;
        }
        m.swap(col, pivot_row);

        let pivot = m[col][col];
        for v in m[col].iter_mut() {
            *v /= pivot;
        }

        for r in 0..4 {
            if r == col {
                continue;
            }
            let factor = m[r][col];
            if factor == 0.0 {
                continue;
            }
            for c in col..5 {
                m[r][c] -= factor * m[col][c];
            }
        }
    }

    Some([m[0][4], m[1][4], m[2][4], m[3][4]])
}

/// Rewrite `Σ d_k·((x - center) / scale)^k` as a polynomial in `x`.
fn denormalize(d: [f64; 4], center: f64, scale: f64) -> Poly3 {
    const BINOMIAL: [[f64; 4]; 4] = [
        [1.0, 0.0, 0.0, 0.0],
        [1.0, 1.0, 0.0, 0.0],
        [1.0, 2.0, 1.0, 0.0],
        [1.0, 3.0, 3.0, 1.0],
    ];
    let u = 1.0 / scale;
    let v = -center / scale;

    // (u·x + v)^k = Σ_j C(k, j)·u^j·v^(k-j)·x^j
    let mut raw = [0.0f64; 4];
    for (k, &dk) in d.iter().enumerate() {
        for (j, slot) in raw.iter_mut().enumerate().take(k + 1) {
            *slot += dk * BINOMIAL[k][j] * u.powi(j as i32) * v.powi((k - j) as i32);
        }
    }

    Poly3 {
        a3: raw[3],
        a2: raw[2],
        a1: raw[1],
        a0: raw[0],
    }
}

/// Which series a [`Trend`] was fitted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendSeries {
    Order(LoopOrder),
    /// Mean time across all measured orders at each size.
    Average,
}

impl fmt::Display for TrendSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendSeries::Order(order) => order.fmt(f),
            TrendSeries::Average => f.pad("avg"),
        }
    }
}

/// A cubic fitted to time (seconds) as a function of matrix size.
#[derive(Debug, Clone, PartialEq)]
pub struct Trend {
    pub series: TrendSeries,
    /// The (size, seconds) points the fit was computed from.
    pub points: Vec<(f64, f64)>,
    pub fit: CubicFit,
}

/// Fit one trend per loop order, in the order each first appears, followed
/// by the cross-order average.
pub fn fit_trends(samples: &[TimingSample]) -> Vec<Trend> {
    let mut per_order: Vec<(LoopOrder, Vec<(f64, f64)>)> = Vec::new();
    for s in samples {
        let point = (s.size as f64, s.seconds);
        match per_order.iter_mut().find(|(o, _)| *o == s.order) {
            Some((_, series)) => series.push(point),
            None => per_order.push((s.order, vec![point])),
        }
    }

    let mut trends: Vec<Trend> = per_order
        .into_iter()
        .map(|(order, points)| Trend {
            series: TrendSeries::Order(order),
            fit: fit_cubic(&points),
            points,
        })
        .collect();

    // Sizes in first-seen order, with every sample of that size pooled
    // regardless of where it sits in the slice.
    let mut per_size: Vec<(usize, f64, usize)> = Vec::new();
    for s in samples {
        match per_size.iter_mut().find(|(size, _, _)| *size == s.size) {
            Some((_, sum, count)) => {
                *sum += s.seconds;
                *count += 1;
            }
            None => per_size.push((s.size, s.seconds, 1)),
        }
    }
    let average: Vec<(f64, f64)> = per_size
        .into_iter()
        .map(|(size, sum, count)| (size as f64, sum / count as f64))
        .collect();

    if !average.is_empty() {
        trends.push(Trend {
            series: TrendSeries::Average,
            fit: fit_cubic(&average),
            points: average,
        });
    }

    for t in &trends {
        tracing::debug!(series = %t.series, poly = %t.fit.poly, r2 = t.fit.r_squared, "trend");
    }

    trends
}
