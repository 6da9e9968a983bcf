//! Model quality evaluators
//!
//! Read-only passes over sparse blocks against a theta snapshot; used by the
//! driver between rounds and by the evaluation CLI.

use crate::core::{Result, Scalar};
use crate::math;
use crate::storage::SparseBlock;

/// Number of misclassified examples in one block.
///
/// An example counts as misclassified when the decision value does not take
/// the label's sign (zero counts as wrong).
pub fn num_misclassified<T: Scalar>(theta: &[f64], block: &SparseBlock<T>) -> Result<usize> {
    let mut wrong = 0;
    for row in block.iter_rows() {
        let wx = row.dot_dense(theta)?;
        if wx * row.label <= 0.0 {
            wrong += 1;
        }
    }
    Ok(wrong)
}

/// Fraction of misclassified examples across a set of blocks
pub fn fraction_misclassified<T: Scalar>(theta: &[f64], blocks: &[SparseBlock<T>]) -> Result<f64> {
    let mut wrong = 0;
    let mut total = 0;
    for block in blocks {
        wrong += num_misclassified(theta, block)?;
        total += block.num_rows();
    }
    if total == 0 {
        return Ok(0.0);
    }
    Ok(wrong as f64 / total as f64)
}

/// Root mean squared error of the decision values against the labels
pub fn rms_error<T: Scalar>(theta: &[f64], blocks: &[SparseBlock<T>]) -> Result<f64> {
    let mut total = 0.0;
    let mut rows = 0;
    for block in blocks {
        for row in block.iter_rows() {
            let residual = row.dot_dense(theta)? - row.label;
            total += residual * residual;
            rows += 1;
        }
    }
    if rows == 0 {
        return Ok(0.0);
    }
    Ok((total / rows as f64).sqrt())
}

/// Mean hinge loss, the quantity the trainer actually descends
pub fn hinge_loss<T: Scalar>(theta: &[f64], blocks: &[SparseBlock<T>]) -> Result<f64> {
    let mut total = 0.0;
    let mut rows = 0;
    for block in blocks {
        for row in block.iter_rows() {
            let wx = row.dot_dense(theta)?;
            total += (1.0 - wx * row.label).max(0.0);
            rows += 1;
        }
    }
    if rows == 0 {
        return Ok(0.0);
    }
    Ok(total / rows as f64)
}

/// L2 distance between two model snapshots
pub fn l2_distance(a: &[f64], b: &[f64]) -> Result<f64> {
    math::distance(a, b)
}
