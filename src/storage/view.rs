//! Read-only windows over a worker's block partition

use crate::core::Scalar;
use crate::storage::sparse::{SparseBlock, SparseRowView};

/// Non-owning, read-only window over a set of blocks assigned to one worker.
///
/// A view is created at scheduling time and discarded when its task
/// completes. It supports repeated iteration over its rows in a stable order
/// (block order, then row order), once per epoch, without copying row data.
///
/// Views are only constructed through [`DataView::partition`], which splits a
/// corpus into disjoint contiguous block ranges. Two views handed to
/// concurrently scheduled tasks therefore never observe overlapping rows;
/// that disjointness, not locking, is what makes unsynchronized concurrent
/// reads of the blocks safe.
#[derive(Debug, Clone, Copy)]
pub struct DataView<'a, T: Scalar = f64> {
    blocks: &'a [SparseBlock<T>],
}

impl<'a, T: Scalar> DataView<'a, T> {
    /// Split a corpus into at most `num_workers` disjoint views.
    ///
    /// Partitioning is at block granularity; fewer views are returned when
    /// there are fewer blocks than workers.
    pub fn partition(blocks: &'a [SparseBlock<T>], num_workers: usize) -> Vec<Self> {
        if blocks.is_empty() || num_workers == 0 {
            return Vec::new();
        }
        let chunk = (blocks.len() + num_workers - 1) / num_workers;
        blocks.chunks(chunk).map(|blocks| Self { blocks }).collect()
    }

    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    pub fn num_rows(&self) -> usize {
        self.blocks.iter().map(|b| b.num_rows()).sum()
    }

    /// The largest column count across the view's blocks
    pub fn num_columns(&self) -> usize {
        self.blocks
            .iter()
            .map(|b| b.num_columns())
            .max()
            .unwrap_or(0)
    }

    /// Restartable row iteration spanning all assigned blocks
    pub fn rows(&self) -> impl Iterator<Item = SparseRowView<'a, T>> + '_ {
        self.blocks.iter().flat_map(|block| block.iter_rows())
    }
}
