//! The shared model vector
//!
//! Relaxed-consistency contract: every worker reads and writes the one theta
//! vector concurrently with no ordering guarantees. `add` is a plain
//! load-then-store, not a compare-and-swap, so simultaneous updates to the
//! same coordinate can lose one of the writes. That is the intended Hogwild!
//! trade-off: per-row updates are small and sparse enough that convergence
//! survives the races. Do not "fix" this with locking.

use crate::core::DenseVector;
use std::sync::atomic::{AtomicU64, Ordering};

/// Dense weight vector shared across all worker threads for a training run.
///
/// Coordinates are `f64` bit patterns in relaxed atomics, which keeps the
/// update path lock-free without undefined behavior.
#[derive(Debug)]
pub struct SharedTheta {
    bits: Box<[AtomicU64]>,
}

impl SharedTheta {
    /// Zero-initialized model of the given dimension
    pub fn zeros(dim: usize) -> Self {
        let bits = (0..dim)
            .map(|_| AtomicU64::new(0.0f64.to_bits()))
            .collect();
        Self { bits }
    }

    pub fn from_slice(weights: &[f64]) -> Self {
        let bits = weights.iter().map(|w| AtomicU64::new(w.to_bits())).collect();
        Self { bits }
    }

    pub fn dim(&self) -> usize {
        self.bits.len()
    }

    #[inline]
    pub fn get(&self, index: usize) -> f64 {
        f64::from_bits(self.bits[index].load(Ordering::Relaxed))
    }

    #[inline]
    pub fn set(&self, index: usize, value: f64) {
        self.bits[index].store(value.to_bits(), Ordering::Relaxed);
    }

    /// Racy read-modify-write; see the module contract
    #[inline]
    pub fn add(&self, index: usize, delta: f64) {
        let current = f64::from_bits(self.bits[index].load(Ordering::Relaxed));
        self.bits[index].store((current + delta).to_bits(), Ordering::Relaxed);
    }

    /// Copy the current weights out.
    ///
    /// Taken while workers run, the snapshot is a coordinate-wise mixture of
    /// in-flight states; taken between rounds, it is exact.
    pub fn snapshot(&self) -> DenseVector {
        DenseVector::from_vec(self.bits.iter().map(|b| f64::from_bits(b.load(Ordering::Relaxed))).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_zeros_and_set_get() {
        let theta = SharedTheta::zeros(3);
        assert_eq!(theta.dim(), 3);
        assert_eq!(theta.get(1), 0.0);

        theta.set(1, 2.5);
        assert_eq!(theta.get(1), 2.5);
    }

    #[test]
    fn test_add_and_snapshot() {
        let theta = SharedTheta::from_slice(&[1.0, -1.0]);
        theta.add(0, 0.5);
        theta.add(1, 0.25);
        assert_eq!(theta.snapshot().as_slice(), &[1.5, -0.75]);
    }

    #[test]
    fn test_concurrent_disjoint_updates_are_exact() {
        // Races only matter on shared coordinates; workers touching disjoint
        // coordinates must be exact.
        let theta = SharedTheta::zeros(8);
        thread::scope(|scope| {
            for w in 0..4 {
                let theta = &theta;
                scope.spawn(move || {
                    for _ in 0..1000 {
                        theta.add(2 * w, 1.0);
                        theta.add(2 * w + 1, -1.0);
                    }
                });
            }
        });
        let snap = theta.snapshot();
        for w in 0..4 {
            assert_eq!(snap[2 * w], 1000.0);
            assert_eq!(snap[2 * w + 1], -1000.0);
        }
    }
}
