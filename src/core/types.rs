//! Scalar abstraction and the dense model vector

use crate::core::{Result, SvmError};
use std::ops::{Index, IndexMut};

/// Numeric element type stored in blocks.
///
/// The training corpus may be loaded at `f32` or `f64` precision; the model
/// vector is always `f64`, so elements only need a widening conversion.
pub trait Scalar: Copy + Send + Sync + PartialOrd + std::fmt::Debug + 'static {
    const ZERO: Self;

    fn to_f64(self) -> f64;
    fn from_f64(v: f64) -> Self;
}

impl Scalar for f64 {
    const ZERO: Self = 0.0;

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }
}

impl Scalar for f32 {
    const ZERO: Self = 0.0;

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }
}

/// Owned dense weight vector.
///
/// Used for model snapshots and as the mutable target of the sequential
/// gradient kernels.
#[derive(Clone, Debug, PartialEq)]
pub struct DenseVector {
    values: Vec<f64>,
}

impl DenseVector {
    /// Create a zeroed vector of the given dimension
    pub fn zeros(dim: usize) -> Self {
        Self {
            values: vec![0.0; dim],
        }
    }

    pub fn from_vec(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn dim(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Checked element access
    pub fn get(&self, index: usize) -> Result<f64> {
        self.values
            .get(index)
            .copied()
            .ok_or(SvmError::IndexOutOfRange {
                index,
                bound: self.values.len(),
            })
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }
}

impl Index<usize> for DenseVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.values[index]
    }
}

impl IndexMut<usize> for DenseVector {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.values[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros() {
        let v = DenseVector::zeros(4);
        assert_eq!(v.dim(), 4);
        assert_eq!(v.as_slice(), &[0.0; 4]);
    }

    #[test]
    fn test_indexing() {
        let mut v = DenseVector::from_vec(vec![1.0, 2.0]);
        v[1] = 5.0;
        assert_eq!(v[0], 1.0);
        assert_eq!(v[1], 5.0);
    }

    #[test]
    fn test_checked_get() {
        let v = DenseVector::from_vec(vec![1.0]);
        assert_eq!(v.get(0).unwrap(), 1.0);
        assert!(matches!(
            v.get(3),
            Err(SvmError::IndexOutOfRange { index: 3, bound: 1 })
        ));
    }

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(<f32 as Scalar>::from_f64(1.5).to_f64(), 1.5);
        assert_eq!(<f64 as Scalar>::ZERO, 0.0);
    }
}
