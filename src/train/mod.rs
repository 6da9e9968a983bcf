//! Parallel SVM training
//!
//! One [`Task`] per worker per scheduling round, all mutating a single
//! [`SharedTheta`] without locks in the Hogwild! style.

pub mod driver;
pub mod metrics;
pub mod svm;
pub mod task;
pub mod theta;

pub use driver::Trainer;
pub use svm::{default_svm_params, SvmParams, SvmTask};
pub use task::Task;
pub use theta::SharedTheta;
