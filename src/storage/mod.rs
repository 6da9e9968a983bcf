//! Fixed-capacity block storage for training examples
//!
//! A block is the unit of memory allocation and of data partitioning for
//! parallel training. Once filled, a block is immutable and may be read by
//! any number of threads without synchronization.

pub mod block;
pub mod sparse;
pub mod view;

pub use block::DenseBlock;
pub use sparse::{SparseBlock, SparseBlockBuilder, SparseRowView};
pub use view::DataView;

/// Default storage-block size in bytes.
///
/// Callers with different memory budgets pass an explicit byte size to the
/// block constructors instead.
pub const STORAGE_BLOCK_SIZE: usize = 1 << 20;
