//! Elementwise and matrix-vector kernels on `f32` slices.
//!
//! All kernels take the destination first and check shape agreement with
//! `debug_assert_eq!`; release builds elide the checks.

use crate::math::MatrixView;

/// `y[i] += a[i]`.
pub fn add(y: &mut [f32], a: &[f32]) {
    debug_assert_eq!(y.len(), a.len());
    for (yi, ai) in y.iter_mut().zip(a.iter()) {
        *yi += ai;
    }
}

/// `y[i] *= a[i]`.
pub fn hadamard(y: &mut [f32], a: &[f32]) {
    debug_assert_eq!(y.len(), a.len());
    for (yi, ai) in y.iter_mut().zip(a.iter()) {
        *yi *= ai;
    }
}

/// `y[i] += a[i] * b[i]`.
pub fn add_hadamard(y: &mut [f32], a: &[f32], b: &[f32]) {
    debug_assert_eq!(y.len(), a.len());
    debug_assert_eq!(y.len(), b.len());
    for (yi, (ai, bi)) in y.iter_mut().zip(a.iter().zip(b.iter())) {
        *yi += ai * bi;
    }
}

/// `y[i] += sum_j x[j] * m[j][i]`, for `m` of shape `x.len() x y.len()`.
///
/// Iterates over rows of `m` so the inner loop is a contiguous scan; the
/// per-element accumulation order is ascending `j`.
pub fn add_dot(y: &mut [f32], x: &[f32], m: &MatrixView<'_>) {
    debug_assert_eq!(x.len(), m.rows());
    debug_assert_eq!(y.len(), m.cols());
    for (j, &xj) in x.iter().enumerate() {
        let row = m.row(j);
        for (yi, mji) in y.iter_mut().zip(row.iter()) {
            *yi += xj * mji;
        }
    }
}

/// Elementwise hyperbolic tangent, in place.
pub fn tanh(y: &mut [f32]) {
    for yi in y.iter_mut() {
        *yi = yi.tanh();
    }
}

/// `y[i] = tanh(a[i])`.
pub fn tanh_from(y: &mut [f32], a: &[f32]) {
    debug_assert_eq!(y.len(), a.len());
    for (yi, ai) in y.iter_mut().zip(a.iter()) {
        *yi = ai.tanh();
    }
}

/// Elementwise logistic sigmoid `1 / (1 + e^-x)`, in place.
pub fn sigmoid(y: &mut [f32]) {
    for yi in y.iter_mut() {
        *yi = 1.0 / (1.0 + (-*yi).exp());
    }
}

/// Index of the maximum element; the lowest index wins ties.
pub fn argmax(a: &[f32]) -> usize {
    debug_assert!(!a.is_empty());
    let mut index = 0;
    let mut max = a[0];
    for (i, &ai) in a.iter().enumerate().skip(1) {
        if ai > max {
            max = ai;
            index = i;
        }
    }
    index
}
