//! Dense fixed-capacity block

use crate::core::{Result, SvmError};
use crate::storage::STORAGE_BLOCK_SIZE;

/// Fixed-capacity, exclusively-owned buffer of `f64` elements.
///
/// Elements are appended sequentially in row-major order until the block is
/// full; a full block is read-only for the remainder of its life. Capacity is
/// fixed at construction as a byte budget divided by the element width.
#[derive(Debug, Clone)]
pub struct DenseBlock {
    width: usize,
    store: Vec<f64>,
    max_elements: usize,
}

impl DenseBlock {
    /// Create a block with the default storage-block byte budget
    pub fn new() -> Self {
        Self::with_capacity_bytes(STORAGE_BLOCK_SIZE)
    }

    /// Create a block holding at most `bytes / size_of::<f64>()` elements
    pub fn with_capacity_bytes(bytes: usize) -> Self {
        let max_elements = bytes / std::mem::size_of::<f64>();
        Self {
            width: 0,
            store: Vec::with_capacity(max_elements),
            max_elements,
        }
    }

    /// Append one element.
    ///
    /// Fails with `CapacityExceeded` once the block is full; the store is
    /// never grown past its fixed budget.
    pub fn append(&mut self, element: f64) -> Result<()> {
        if self.store.len() >= self.max_elements {
            return Err(SvmError::CapacityExceeded {
                capacity: self.max_elements,
            });
        }
        self.store.push(element);
        Ok(())
    }

    /// Current element count
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.store.len() == self.max_elements
    }

    pub fn max_elements(&self) -> usize {
        self.max_elements
    }

    /// Backing buffer, for bulk/vectorized access
    pub fn store(&self) -> &[f64] {
        &self.store
    }

    /// Declare the row stride.
    ///
    /// The caller is responsible for keeping the stride consistent with the
    /// elements it appends.
    pub fn set_width(&mut self, width: usize) {
        self.width = width;
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of complete rows at the declared stride
    pub fn num_rows(&self) -> usize {
        if self.width == 0 {
            0
        } else {
            self.store.len() / self.width
        }
    }

    /// Zero-copy view of one row
    pub fn row(&self, index: usize) -> Result<&[f64]> {
        let rows = self.num_rows();
        if index >= rows {
            return Err(SvmError::IndexOutOfRange {
                index,
                bound: rows,
            });
        }
        let start = index * self.width;
        Ok(&self.store[start..start + self.width])
    }
}

impl Default for DenseBlock {
    fn default() -> Self {
        Self::new()
    }
}
