//! Sparse fixed-capacity block
//!
//! Rows are stored in compressed (index, value) form packed into one arena
//! per block, with a parallel per-row label array. Row extraction is
//! zero-copy and O(nonzeros-in-row); it sits on the hot path of every
//! training row.

use crate::core::{Result, Scalar, SvmError};
use crate::storage::STORAGE_BLOCK_SIZE;

/// Zero-copy view of one sparse training row.
///
/// Borrows the block's backing arrays; the view's lifetime is bounded by the
/// block's. Indices are sorted ascending.
#[derive(Debug, Clone, Copy)]
pub struct SparseRowView<'a, T: Scalar = f64> {
    pub indices: &'a [u32],
    pub values: &'a [T],
    /// Class label, +1 or -1
    pub label: f64,
}

impl<'a, T: Scalar> SparseRowView<'a, T> {
    /// Number of non-zero elements
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Logical dimension: one past the largest active index
    pub fn dim(&self) -> usize {
        self.indices.last().map_or(0, |&i| i as usize + 1)
    }

    /// Value at a column, zero if not present
    pub fn get(&self, column: usize) -> T {
        match self.indices.binary_search(&(column as u32)) {
            Ok(pos) => self.values[pos],
            Err(_) => T::ZERO,
        }
    }

    /// Dot product against a dense vector of matching or greater dimension
    pub fn dot_dense(&self, dense: &[f64]) -> Result<f64> {
        if self.dim() > dense.len() {
            return Err(SvmError::DimensionMismatch {
                expected: self.dim(),
                actual: dense.len(),
            });
        }
        let mut sum = 0.0;
        for (&i, &v) in self.indices.iter().zip(self.values.iter()) {
            sum += dense[i as usize] * v.to_f64();
        }
        Ok(sum)
    }
}

/// Fixed-capacity block of sparse training rows.
///
/// Immutable once built; construct through [`SparseBlockBuilder`]. Every
/// stored index is less than `num_columns`.
#[derive(Debug, Clone)]
pub struct SparseBlock<T: Scalar = f64> {
    indices: Box<[u32]>,
    values: Box<[T]>,
    labels: Box<[f64]>,
    /// Row r occupies entries `offsets[r]..offsets[r + 1]`
    offsets: Box<[usize]>,
    num_columns: usize,
}

impl<T: Scalar> SparseBlock<T> {
    pub fn num_rows(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    /// Total non-zero entries across all rows
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    /// Zero-copy row extraction
    pub fn row_view(&self, index: usize) -> Result<SparseRowView<'_, T>> {
        if index >= self.num_rows() {
            return Err(SvmError::IndexOutOfRange {
                index,
                bound: self.num_rows(),
            });
        }
        Ok(self.row_view_at(index))
    }

    fn row_view_at(&self, index: usize) -> SparseRowView<'_, T> {
        let start = self.offsets[index];
        let end = self.offsets[index + 1];
        SparseRowView {
            indices: &self.indices[start..end],
            values: &self.values[start..end],
            label: self.labels[index],
        }
    }

    /// Iterate rows in storage order
    pub fn iter_rows(&self) -> RowIter<'_, T> {
        RowIter {
            block: self,
            next: 0,
        }
    }
}

/// Iterator over the rows of a [`SparseBlock`]
pub struct RowIter<'a, T: Scalar = f64> {
    block: &'a SparseBlock<T>,
    next: usize,
}

impl<'a, T: Scalar> Iterator for RowIter<'a, T> {
    type Item = SparseRowView<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.block.num_rows() {
            return None;
        }
        let row = self.block.row_view_at(self.next);
        self.next += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.block.num_rows() - self.next;
        (remaining, Some(remaining))
    }
}

impl<'a, T: Scalar> ExactSizeIterator for RowIter<'a, T> {}

/// Incremental builder packing rows into a fixed byte budget.
///
/// The budget accounts for index, value, label and offset storage. When a row
/// no longer fits the builder reports it full; the loader then seals this
/// block and starts the next one.
#[derive(Debug)]
pub struct SparseBlockBuilder<T: Scalar = f64> {
    indices: Vec<u32>,
    values: Vec<T>,
    labels: Vec<f64>,
    offsets: Vec<usize>,
    num_columns: usize,
    capacity_bytes: usize,
}

impl<T: Scalar> SparseBlockBuilder<T> {
    pub fn new() -> Self {
        Self::with_capacity_bytes(STORAGE_BLOCK_SIZE)
    }

    pub fn with_capacity_bytes(capacity_bytes: usize) -> Self {
        Self {
            indices: Vec::new(),
            values: Vec::new(),
            labels: Vec::new(),
            offsets: vec![0],
            num_columns: 0,
            capacity_bytes,
        }
    }

    fn row_cost(nnz: usize) -> usize {
        nnz * (std::mem::size_of::<u32>() + std::mem::size_of::<T>())
            + std::mem::size_of::<f64>()
            + std::mem::size_of::<usize>()
    }

    fn bytes_used(&self) -> usize {
        self.indices.len() * (std::mem::size_of::<u32>() + std::mem::size_of::<T>())
            + self.labels.len() * (std::mem::size_of::<f64>() + std::mem::size_of::<usize>())
    }

    /// Whether a row with `nnz` non-zeros still fits the byte budget
    pub fn fits(&self, nnz: usize) -> bool {
        self.bytes_used() + Self::row_cost(nnz) <= self.capacity_bytes
    }

    pub fn num_rows(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Append one row.
    ///
    /// Indices need not be sorted; they are sorted on the way in. Fails with
    /// `CapacityExceeded` when the row does not fit, `DimensionMismatch` when
    /// the index and value slices disagree on length.
    pub fn append_row(&mut self, indices: &[u32], values: &[T], label: f64) -> Result<()> {
        if indices.len() != values.len() {
            return Err(SvmError::DimensionMismatch {
                expected: indices.len(),
                actual: values.len(),
            });
        }
        if !self.fits(indices.len()) {
            return Err(SvmError::CapacityExceeded {
                capacity: self.capacity_bytes,
            });
        }

        let mut pairs: Vec<(u32, T)> = indices
            .iter()
            .copied()
            .zip(values.iter().copied())
            .collect();
        pairs.sort_by_key(|&(i, _)| i);

        for (i, v) in pairs {
            self.indices.push(i);
            self.values.push(v);
            self.num_columns = self.num_columns.max(i as usize + 1);
        }
        self.labels.push(label);
        self.offsets.push(self.indices.len());
        Ok(())
    }

    /// Seal the builder into an immutable block
    pub fn build(self) -> SparseBlock<T> {
        SparseBlock {
            indices: self.indices.into_boxed_slice(),
            values: self.values.into_boxed_slice(),
            labels: self.labels.into_boxed_slice(),
            offsets: self.offsets.into_boxed_slice(),
            num_columns: self.num_columns,
        }
    }
}

impl<T: Scalar> Default for SparseBlockBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The largest column count across a set of blocks
pub fn max_columns<T: Scalar>(blocks: &[SparseBlock<T>]) -> usize {
    blocks.iter().map(|b| b.num_columns()).max().unwrap_or(0)
}

/// Convenience for tests and small corpora: pack rows into a single block
pub fn block_from_rows<T: Scalar>(rows: &[(&[u32], &[T], f64)]) -> Result<SparseBlock<T>> {
    let mut builder = SparseBlockBuilder::new();
    for (indices, values, label) in rows {
        builder.append_row(indices, values, *label)?;
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_block() -> SparseBlock {
        block_from_rows(&[
            (&[0, 2][..], &[1.0, 2.0][..], 1.0),
            (&[1][..], &[3.0][..], -1.0),
            (&[0, 1, 2][..], &[0.5, 0.5, 0.5][..], 1.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_row_view_zero_copy_slices() {
        let block = sample_block();
        assert_eq!(block.num_rows(), 3);
        assert_eq!(block.num_columns(), 3);
        assert_eq!(block.nnz(), 6);

        let row = block.row_view(0).unwrap();
        assert_eq!(row.indices, &[0, 2]);
        assert_eq!(row.values, &[1.0, 2.0]);
        assert_eq!(row.label, 1.0);
        assert_eq!(row.nnz(), 2);
        assert_eq!(row.dim(), 3);
    }

    #[test]
    fn test_row_view_out_of_range() {
        let block = sample_block();
        assert!(matches!(
            block.row_view(3),
            Err(SvmError::IndexOutOfRange { index: 3, bound: 3 })
        ));
    }

    #[test]
    fn test_indices_sorted_on_append() {
        let block = block_from_rows(&[(&[4, 1, 2][..], &[4.0, 1.0, 2.0][..], 1.0)]).unwrap();
        let row = block.row_view(0).unwrap();
        assert_eq!(row.indices, &[1, 2, 4]);
        assert_eq!(row.values, &[1.0, 2.0, 4.0]);
        assert_eq!(row.get(2), 2.0);
        assert_eq!(row.get(3), 0.0);
    }

    #[test]
    fn test_capacity_rollover_boundary() {
        // Room for exactly two single-nonzero rows of f64 data:
        // 2 * (4 + 8 + 8 + 8) = 56 bytes.
        let mut builder: SparseBlockBuilder = SparseBlockBuilder::with_capacity_bytes(56);
        builder.append_row(&[0], &[1.0], 1.0).unwrap();
        builder.append_row(&[1], &[2.0], -1.0).unwrap();
        assert!(!builder.fits(1));

        let err = builder.append_row(&[2], &[3.0], 1.0).unwrap_err();
        assert!(matches!(err, SvmError::CapacityExceeded { .. }));

        let block = builder.build();
        assert_eq!(block.num_rows(), 2);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let mut builder: SparseBlockBuilder = SparseBlockBuilder::new();
        let err = builder.append_row(&[0, 1], &[1.0], 1.0).unwrap_err();
        assert!(matches!(err, SvmError::DimensionMismatch { .. }));
        assert!(builder.is_empty());
    }

    #[test]
    fn test_dot_dense() {
        let block = sample_block();
        let theta = [1.0, 2.0, 3.0];

        let row = block.row_view(0).unwrap();
        assert_eq!(row.dot_dense(&theta).unwrap(), 1.0 + 6.0);

        // Dense vector may be wider than the row's dimension.
        let wide = [1.0, 2.0, 3.0, 9.0];
        assert_eq!(row.dot_dense(&wide).unwrap(), 7.0);

        // But never narrower.
        let narrow = [1.0, 2.0];
        assert!(matches!(
            row.dot_dense(&narrow),
            Err(SvmError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_iter_rows_stable_order() {
        let block = sample_block();
        let labels: Vec<f64> = block.iter_rows().map(|r| r.label).collect();
        assert_eq!(labels, vec![1.0, -1.0, 1.0]);
        assert_eq!(block.iter_rows().len(), 3);
    }

    #[test]
    fn test_max_columns() {
        let a = block_from_rows(&[(&[0][..], &[1.0][..], 1.0)]).unwrap();
        let b = block_from_rows(&[(&[7][..], &[1.0][..], 1.0)]).unwrap();
        assert_eq!(max_columns(&[a, b]), 8);
        assert_eq!(max_columns::<f64>(&[]), 0);
    }

    #[test]
    fn test_f32_block() {
        let block: SparseBlock<f32> =
            block_from_rows(&[(&[0, 1][..], &[1.0f32, 2.0f32][..], -1.0)]).unwrap();
        let row = block.row_view(0).unwrap();
        assert_eq!(row.dot_dense(&[2.0, 2.0]).unwrap(), 6.0);
    }
}
