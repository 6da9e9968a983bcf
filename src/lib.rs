//! Block-oriented storage and lock-free parallel SGD training for linear SVMs
//!
//! Based on "Hogwild!: A Lock-Free Approach to Parallelizing Stochastic
//! Gradient Descent" by Niu, Recht, Ré and Wright

pub mod core;
pub mod data;
pub mod math;
pub mod persistence;
pub mod storage;
pub mod train;

// Re-export main types for convenience
pub use crate::core::error::{Result, SvmError};
pub use crate::core::types::{DenseVector, Scalar};
pub use crate::data::BlockLoader;
pub use crate::storage::{DataView, DenseBlock, SparseBlock, SparseBlockBuilder};
pub use crate::train::{default_svm_params, SharedTheta, SvmParams, SvmTask, Task, Trainer};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
