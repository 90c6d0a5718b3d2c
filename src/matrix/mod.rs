//! Square matrix storage and the operands used by one benchmark size.
//!
//! A [`Matrix`] is a single contiguous row-major buffer. [`MatrixFactory`]
//! builds the two inputs and the zeroed output for a size, filled either by
//! a fixed formula or from a uniform [0, 1) generator it owns.

pub mod kernel;
pub mod order;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{BenchError, Result};

/// An n×n matrix of `f64`, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    n: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// A zero-filled n×n matrix.
    ///
    /// Fails with [`BenchError::InvalidSize`] for `n == 0` and with
    /// [`BenchError::Allocation`] if the buffer can't be reserved.
    pub fn zeros(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(BenchError::InvalidSize { index: 0, size: n });
        }
        let len = n.checked_mul(n).ok_or(BenchError::SizeOverflow { n })?;

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|source| BenchError::Allocation { n, source })?;
        data.resize(len, 0.0);

        Ok(Self { n, data })
    }

    /// Build from a row-major slice of `n * n` values.
    ///
    /// # Panics
    ///
    /// Panics if `values.len() != n * n`.
    pub fn from_rows(n: usize, values: &[f64]) -> Result<Self> {
        assert_eq!(values.len(), n * n, "expected {}x{}={} values", n, n, n * n);
        let mut m = Self::zeros(n)?;
        m.data.copy_from_slice(values);
        Ok(m)
    }

    pub fn dim(&self) -> usize {
        self.n
    }

    /// Offset of `(row, col)` in the backing buffer.
    #[inline]
    pub fn offset(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.n && col < self.n);
        row * self.n + col
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[self.offset(row, col)]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        let at = self.offset(row, col);
        self.data[at] = value;
    }

    pub fn fill_zero(&mut self) {
        self.data.fill(0.0);
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

/// How input operands are populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillPolicy {
    /// `A[i][j] = (i + j % 7) * 0.001`, `B[i][j] = (2i + j % 5) * 0.002`.
    /// Smooth, reproducible values.
    #[default]
    Formula,
    /// Uniform values in [0, 1). Without a seed the generator is seeded
    /// from the operating system, so runs differ.
    Uniform { seed: Option<u64> },
}

/// The three same-sized buffers taking part in one multiplication.
#[derive(Debug, Clone)]
pub struct Operands {
    pub a: Matrix,
    pub b: Matrix,
    /// Output accumulator, zero on creation.
    pub c: Matrix,
}

/// Creates operands for each benchmark size.
///
/// The factory owns its random generator, so a seeded factory produces the
/// same sequence of matrices on every run.
#[derive(Debug)]
pub struct MatrixFactory {
    policy: FillPolicy,
    rng: Option<StdRng>,
}

impl MatrixFactory {
    pub fn new(policy: FillPolicy) -> Self {
        let rng = match policy {
            FillPolicy::Formula => None,
            FillPolicy::Uniform { seed: Some(seed) } => Some(StdRng::seed_from_u64(seed)),
            FillPolicy::Uniform { seed: None } => Some(StdRng::from_os_rng()),
        };
        Self { policy, rng }
    }

    pub fn policy(&self) -> FillPolicy {
        self.policy
    }

    /// Allocate and fill `A`, `B` and a zeroed `C`, all n×n.
    pub fn operands(&mut self, n: usize) -> Result<Operands> {
        let mut a = Matrix::zeros(n)?;
        let mut b = Matrix::zeros(n)?;
        let c = Matrix::zeros(n)?;

        match self.rng.as_mut() {
            None => {
                for i in 0..n {
                    for j in 0..n {
                        a.set(i, j, (i + j % 7) as f64 * 0.001);
                        b.set(i, j, (i * 2 + j % 5) as f64 * 0.002);
                    }
                }
            }
            Some(rng) => {
                a.as_mut_slice().iter_mut().for_each(|x| *x = rng.random());
                b.as_mut_slice().iter_mut().for_each(|x| *x = rng.random());
            }
        }

        Ok(Operands { a, b, c })
    }
}
