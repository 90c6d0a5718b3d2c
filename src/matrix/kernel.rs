//! The triple-loop product, dispatched over all six loop orders.
//!
//! Every variant overwrites `C` with `A * B`; the output is zeroed first so
//! nothing left over from a previous order leaks into the result.

use super::Matrix;
use super::order::LoopOrder;

/// Matrix multiply: C = A * B using the given loop nesting.
///
/// All matrices are n×n and row-major. Results from different orders agree
/// up to floating-point summation order.
///
/// # Panics
///
/// Panics if the three matrices don't share the same dimension.
///
/// # Example
///
/// ```
/// use looporder::{LoopOrder, Matrix, multiply};
///
/// let a = Matrix::from_rows(2, &[1.0, 2.0, 3.0, 4.0]).unwrap();
/// let b = Matrix::from_rows(2, &[5.0, 6.0, 7.0, 8.0]).unwrap();
/// let mut c = Matrix::zeros(2).unwrap();
///
/// multiply(LoopOrder::Kji, &a, &b, &mut c);
///
/// assert_eq!(c.as_slice(), &[19.0, 22.0, 43.0, 50.0]);
/// ```
pub fn multiply(order: LoopOrder, a: &Matrix, b: &Matrix, c: &mut Matrix) {
    let n = c.dim();
    assert_eq!(a.dim(), n, "A: expected {}x{}, got {}x{}", n, n, a.dim(), a.dim());
    assert_eq!(b.dim(), n, "B: expected {}x{}, got {}x{}", n, n, b.dim(), b.dim());

    c.fill_zero();
    let (a, b) = (a.as_slice(), b.as_slice());
    let c = c.as_mut_slice();

    match order {
        LoopOrder::Ijk => ijk(a, b, c, n),
        LoopOrder::Ikj => ikj(a, b, c, n),
        LoopOrder::Kij => kij(a, b, c, n),
        LoopOrder::Kji => kji(a, b, c, n),
        LoopOrder::Jik => jik(a, b, c, n),
        LoopOrder::Jki => jki(a, b, c, n),
    }
}

// k innermost: the dot product runs in a register and B is walked with
// stride n.
fn ijk(a: &[f64], b: &[f64], c: &mut [f64], n: usize) {
    for i in 0..n {
        for j in 0..n {
            let mut sum = 0.0;
            for k in 0..n {
                sum += a[i * n + k] * b[k * n + j];
            }
            c[i * n + j] = sum;
        }
    }
}

fn jik(a: &[f64], b: &[f64], c: &mut [f64], n: usize) {
    for j in 0..n {
        for i in 0..n {
            let mut sum = 0.0;
            for k in 0..n {
                sum += a[i * n + k] * b[k * n + j];
            }
            c[i * n + j] = sum;
        }
    }
}

// j innermost: B and C are both read with stride 1.
fn ikj(a: &[f64], b: &[f64], c: &mut [f64], n: usize) {
    for i in 0..n {
        for k in 0..n {
            let aik = a[i * n + k];
            for j in 0..n {
                c[i * n + j] += aik * b[k * n + j];
            }
        }
    }
}

fn kij(a: &[f64], b: &[f64], c: &mut [f64], n: usize) {
    for k in 0..n {
        for i in 0..n {
            let aik = a[i * n + k];
            for j in 0..n {
                c[i * n + j] += aik * b[k * n + j];
            }
        }
    }
}

// i innermost: A and C are both walked down a column, stride n.
fn kji(a: &[f64], b: &[f64], c: &mut [f64], n: usize) {
    for k in 0..n {
        for j in 0..n {
            let bkj = b[k * n + j];
            for i in 0..n {
                c[i * n + j] += a[i * n + k] * bkj;
            }
        }
    }
}

fn jki(a: &[f64], b: &[f64], c: &mut [f64], n: usize) {
    for j in 0..n {
        for k in 0..n {
            let bkj = b[k * n + j];
            for i in 0..n {
                c[i * n + j] += a[i * n + k] * bkj;
            }
        }
    }
}
