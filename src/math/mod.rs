//! Dense numeric kernels
//!
//! These run once per (example x epoch x weight dimension) and dominate the
//! cost of the whole system; inner loops are allocation-free and branch-light,
//! with dimension checks hoisted to the call boundary.

use crate::core::{Result, SvmError};
use crate::storage::DenseBlock;

/// Dot product of two equal-length dense vectors
pub fn row_dot(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(SvmError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(a.iter().zip(b.iter()).map(|(&x, &y)| x * y).sum())
}

/// Euclidean distance between two equal-length dense vectors
pub fn distance(p: &[f64], q: &[f64]) -> Result<f64> {
    if p.len() != q.len() {
        return Err(SvmError::DimensionMismatch {
            expected: p.len(),
            actual: q.len(),
        });
    }
    let sum: f64 = p
        .iter()
        .zip(q.iter())
        .map(|(&x, &y)| (x - y) * (x - y))
        .sum();
    Ok(sum.sqrt())
}

/// Aggregate least-mean-squares error of a model over a dense block.
///
/// `examples` holds one training row per stride, `targets` one value per row.
/// Returns `sum((theta . x_r - y_r)^2) / (2 * num_rows)`.
pub fn lms_error(examples: &DenseBlock, targets: &DenseBlock, theta: &[f64]) -> Result<f64> {
    check_training_shape(examples, targets, theta)?;
    let num_rows = examples.num_rows();
    if num_rows == 0 {
        return Err(SvmError::EmptyCorpus);
    }

    let y = targets.store();
    let mut total = 0.0;
    for r in 0..num_rows {
        let row = examples.row(r)?;
        let residual = row_dot(row, theta)? - y[r];
        total += residual * residual;
    }
    Ok(total / (2.0 * num_rows as f64))
}

/// In-place LMS gradient contribution of one training example.
///
/// Scales by an explicit `learning_rate` and normalizes by `num_examples`.
pub fn row_gradient(
    example: &[f64],
    y: f64,
    theta: &mut [f64],
    learning_rate: f64,
    num_examples: f64,
) -> Result<()> {
    if example.len() != theta.len() {
        return Err(SvmError::DimensionMismatch {
            expected: theta.len(),
            actual: example.len(),
        });
    }
    let residual = row_dot(example, theta)? - y;
    let scale = learning_rate * residual / num_examples;
    for (w, &x) in theta.iter_mut().zip(example.iter()) {
        *w -= scale * x;
    }
    Ok(())
}

/// One full sequential gradient pass over every row of a dense block.
///
/// This is the single-threaded reference primitive: bit-reproducible from a
/// fixed model and fixed data, and the correctness oracle for the parallel
/// trainer.
pub fn gradient_pass(
    examples: &DenseBlock,
    targets: &DenseBlock,
    theta: &mut [f64],
    learning_rate: f64,
) -> Result<()> {
    check_training_shape(examples, targets, theta)?;
    let num_rows = examples.num_rows();
    let y = targets.store();
    for r in 0..num_rows {
        let row = examples.row(r)?;
        row_gradient(row, y[r], theta, learning_rate, num_rows as f64)?;
    }
    Ok(())
}

fn check_training_shape(
    examples: &DenseBlock,
    targets: &DenseBlock,
    theta: &[f64],
) -> Result<()> {
    if examples.width() != theta.len() {
        return Err(SvmError::DimensionMismatch {
            expected: examples.width(),
            actual: theta.len(),
        });
    }
    if targets.len() != examples.num_rows() {
        return Err(SvmError::DimensionMismatch {
            expected: examples.num_rows(),
            actual: targets.len(),
        });
    }
    Ok(())
}
