//! Hinge-loss SGD task and its hyperparameters

use crate::core::{Result, Scalar, SvmError};
use crate::storage::{DataView, SparseBlock};
use crate::train::task::Task;
use crate::train::theta::SharedTheta;
use log::trace;

/// SVM hyperparameters plus the per-feature degree vector.
///
/// `degrees[j]` counts the rows across the whole corpus with a nonzero at
/// column j; the regularization shrink on a feature is scaled by
/// `mu / degrees[j]`, de-emphasizing frequent, well-represented features.
/// Immutable once built; shared read-only by every task.
#[derive(Debug, Clone)]
pub struct SvmParams {
    pub mu: f64,
    pub step_size: f64,
    pub step_decay: f64,
    pub degrees: Vec<u32>,
}

impl SvmParams {
    /// Model dimension implied by the corpus: the degree vector's length
    pub fn dim(&self) -> usize {
        self.degrees.len()
    }
}

/// Parameters used in the Hogwild! paper, with degrees computed from the
/// corpus in one preprocessing pass.
///
/// The pass runs over every row of every block, incrementing
/// `degrees[column]` per observed nonzero; the vector zero-extends whenever a
/// block with a larger column count appears, so its final length is the
/// maximum column count seen anywhere. It must complete before any task
/// starts, which holds by construction: tasks are built from the result.
pub fn default_svm_params<T: Scalar>(blocks: &[SparseBlock<T>]) -> Result<SvmParams> {
    if blocks.is_empty() {
        return Err(SvmError::EmptyCorpus);
    }

    let mut degrees: Vec<u32> = vec![0; blocks[0].num_columns()];
    for block in blocks {
        if degrees.len() < block.num_columns() {
            degrees.resize(block.num_columns(), 0);
        }
        for row in block.iter_rows() {
            for &j in row.indices {
                degrees[j as usize] += 1;
            }
        }
    }

    Ok(SvmParams {
        mu: 1.0,
        step_size: 0.1,
        step_decay: 0.99,
        degrees,
    })
}

/// One worker's SVM training task.
///
/// Borrows one [`DataView`], the shared theta and the read-only params for
/// its lifetime; owns only its decaying local step size. Each call to
/// `execute` is one epoch over the view's rows, pushing hinge-loss
/// subgradient updates straight into the shared theta with no buffering: a
/// row's effect is visible to every other running task as soon as it is
/// applied, with no ordering guarantee.
pub struct SvmTask<'a, T: Scalar = f64> {
    view: DataView<'a, T>,
    theta: &'a SharedTheta,
    params: &'a SvmParams,
    step_size: f64,
}

impl<'a, T: Scalar> SvmTask<'a, T> {
    /// Bind a task to its partition and the shared state.
    ///
    /// The view's column count must fit both the model and the degree
    /// vector; checking here keeps the per-row loop free of bounds errors.
    pub fn new(
        view: DataView<'a, T>,
        theta: &'a SharedTheta,
        params: &'a SvmParams,
    ) -> Result<Self> {
        let columns = view.num_columns();
        if columns > theta.dim() {
            return Err(SvmError::DimensionMismatch {
                expected: columns,
                actual: theta.dim(),
            });
        }
        if columns > params.degrees.len() {
            return Err(SvmError::DimensionMismatch {
                expected: columns,
                actual: params.degrees.len(),
            });
        }
        Ok(Self {
            view,
            theta,
            params,
            step_size: params.step_size,
        })
    }

    /// Current (decayed) step size
    pub fn step_size(&self) -> f64 {
        self.step_size
    }
}

impl<T: Scalar> Task for SvmTask<'_, T> {
    fn execute(&mut self, thread_id: usize) {
        let theta = self.theta;
        let degrees = &self.params.degrees;
        let shrink = self.step_size * self.params.mu;

        for row in self.view.rows() {
            let y = row.label;

            let mut wx = 0.0;
            for (&j, &v) in row.indices.iter().zip(row.values.iter()) {
                wx += theta.get(j as usize) * v.to_f64();
            }

            // Hinge-loss subgradient: only margin violations push theta.
            if wx * y < 1.0 {
                let scale = self.step_size * y;
                for (&j, &v) in row.indices.iter().zip(row.values.iter()) {
                    theta.add(j as usize, scale * v.to_f64());
                }
            }

            // Regularize the active coordinates, scaled inversely to how
            // often each feature occurs in the corpus.
            for &j in row.indices {
                let j = j as usize;
                let degree = degrees[j];
                if degree > 0 {
                    let w = theta.get(j);
                    theta.add(j, -(shrink * w / degree as f64));
                }
            }
        }

        self.step_size *= self.params.step_decay;
        trace!(
            "worker {thread_id}: epoch complete, step size {:.6}",
            self.step_size
        );
    }
}
