//! Core error and scalar types

pub mod error;
pub mod types;

pub use error::{Result, SvmError};
pub use types::{DenseVector, Scalar};
