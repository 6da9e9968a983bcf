//! Loading training data into blocks

pub mod libsvm;

pub use libsvm::BlockLoader;
