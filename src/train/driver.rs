//! Training driver
//!
//! Stands in for the external thread pool: partitions the corpus, binds one
//! [`SvmTask`] per worker, and runs scoped threads for a fixed number of
//! epochs. The library's unit of work stays [`Task`]; this is the intended
//! scheduling shape around it.

use crate::core::{DenseVector, Result, Scalar};
use crate::storage::{DataView, SparseBlock};
use crate::train::svm::{default_svm_params, SvmTask};
use crate::train::task::Task;
use crate::train::theta::SharedTheta;
use log::debug;
use std::thread;

/// Hogwild! trainer with builder-style configuration
#[derive(Debug, Clone)]
pub struct Trainer {
    mu: f64,
    step_size: f64,
    step_decay: f64,
    num_workers: usize,
    epochs: usize,
}

impl Trainer {
    /// Defaults: the Hogwild! paper's SVM parameters, one worker, 20 epochs
    pub fn new() -> Self {
        Self {
            mu: 1.0,
            step_size: 0.1,
            step_decay: 0.99,
            num_workers: 1,
            epochs: 20,
        }
    }

    pub fn with_mu(mut self, mu: f64) -> Self {
        self.mu = mu;
        self
    }

    pub fn with_step_size(mut self, step_size: f64) -> Self {
        self.step_size = step_size;
        self
    }

    pub fn with_step_decay(mut self, step_decay: f64) -> Self {
        self.step_decay = step_decay;
        self
    }

    pub fn with_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers.max(1);
        self
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Train a model over the corpus and return the converged weights.
    ///
    /// The degree pass over the whole corpus completes before any task is
    /// built. Each epoch schedules every task once on its own thread; with
    /// more than one worker the run is non-deterministic; see
    /// [`SharedTheta`](crate::train::theta) for the consistency contract.
    pub fn train<T: Scalar>(&self, blocks: &[SparseBlock<T>]) -> Result<DenseVector> {
        let mut params = default_svm_params(blocks)?;
        params.mu = self.mu;
        params.step_size = self.step_size;
        params.step_decay = self.step_decay;

        let theta = SharedTheta::zeros(params.dim());
        let views = DataView::partition(blocks, self.num_workers);
        let mut tasks = views
            .into_iter()
            .map(|view| SvmTask::new(view, &theta, &params))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "training: {} workers, {} epochs, dim {}",
            tasks.len(),
            self.epochs,
            params.dim()
        );

        for epoch in 0..self.epochs {
            thread::scope(|scope| {
                for (thread_id, task) in tasks.iter_mut().enumerate() {
                    scope.spawn(move || task.execute(thread_id));
                }
            });
            debug!("epoch {} complete", epoch + 1);
        }

        Ok(theta.snapshot())
    }
}

impl Default for Trainer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SvmError;
    use crate::storage::sparse::block_from_rows;
    use crate::train::metrics;

    fn separable_blocks(num_blocks: usize) -> Vec<SparseBlock> {
        (0..num_blocks)
            .map(|b| {
                let offset = b as f64 * 0.05;
                block_from_rows(&[
                    (&[0, 1][..], &[2.0 + offset, 1.0][..], 1.0),
                    (&[0, 1][..], &[1.8 + offset, 1.1][..], 1.0),
                    (&[0, 1][..], &[-2.0 - offset, -1.0][..], -1.0),
                    (&[0, 1][..], &[-1.8 - offset, -1.1][..], -1.0),
                ])
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_single_worker_converges() {
        let blocks = separable_blocks(1);
        let model = Trainer::new().with_epochs(30).train(&blocks).unwrap();
        assert_eq!(
            metrics::fraction_misclassified(model.as_slice(), &blocks).unwrap(),
            0.0
        );
    }

    #[test]
    fn test_multi_worker_converges_despite_races() {
        let blocks = separable_blocks(4);
        let model = Trainer::new()
            .with_workers(4)
            .with_epochs(40)
            .train(&blocks)
            .unwrap();
        assert_eq!(
            metrics::fraction_misclassified(model.as_slice(), &blocks).unwrap(),
            0.0
        );
    }

    #[test]
    fn test_multi_worker_near_sequential_model() {
        let blocks = separable_blocks(4);
        let sequential = Trainer::new().with_epochs(40).train(&blocks).unwrap();
        let parallel = Trainer::new()
            .with_workers(4)
            .with_epochs(40)
            .train(&blocks)
            .unwrap();

        // Runs race on theta, so only closeness is guaranteed.
        let gap =
            metrics::l2_distance(sequential.as_slice(), parallel.as_slice()).unwrap();
        assert!(
            gap < 0.5 * sequential.as_slice().iter().map(|w| w * w).sum::<f64>().sqrt() + 0.5,
            "parallel model drifted too far: {gap}"
        );
    }

    #[test]
    fn test_empty_corpus() {
        let result = Trainer::new().train::<f64>(&[]);
        assert!(matches!(result, Err(SvmError::EmptyCorpus)));
    }
}
