//! LibSVM-format ingestion into sparse blocks
//!
//! Parses lines of the form:
//! label index:value index:value ...
//!
//! Example:
//! +1 1:0.5 3:1.2 7:0.8
//! -1 2:0.3 5:2.1
//!
//! Rows are packed into fixed-capacity [`SparseBlock`]s; when a row no
//! longer fits the current block, the block is sealed and a new one started,
//! so the capacity invariant is never violated.

use crate::core::{Result, SvmError};
use crate::storage::{SparseBlock, SparseBlockBuilder, STORAGE_BLOCK_SIZE};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Loader turning libsvm-format input into a sequence of sparse blocks
#[derive(Debug, Clone)]
pub struct BlockLoader {
    block_bytes: usize,
}

impl BlockLoader {
    /// Loader using the default storage-block byte size
    pub fn new() -> Self {
        Self {
            block_bytes: STORAGE_BLOCK_SIZE,
        }
    }

    /// Override the per-block byte budget (the runtime-tunable constant)
    pub fn with_block_bytes(mut self, block_bytes: usize) -> Self {
        self.block_bytes = block_bytes;
        self
    }

    /// Load blocks from a libsvm-format file
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<SparseBlock>> {
        let file = File::open(path).map_err(SvmError::IoError)?;
        self.load_reader(BufReader::new(file))
    }

    /// Load blocks from any reader (for testing and flexibility)
    pub fn load_reader<R: BufRead>(&self, reader: R) -> Result<Vec<SparseBlock>> {
        let mut blocks = Vec::new();
        let mut builder = SparseBlockBuilder::with_capacity_bytes(self.block_bytes);

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(SvmError::IoError)?;
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (label, indices, values) = parse_line(line).map_err(|e| {
                SvmError::ParseError(format!("Error parsing line {}: {}", line_num + 1, e))
            })?;

            if !builder.fits(indices.len()) && !builder.is_empty() {
                blocks.push(builder.build());
                builder = SparseBlockBuilder::with_capacity_bytes(self.block_bytes);
            }
            builder.append_row(&indices, &values, label)?;
        }

        if !builder.is_empty() {
            blocks.push(builder.build());
        }
        if blocks.is_empty() {
            return Err(SvmError::EmptyCorpus);
        }
        Ok(blocks)
    }
}

impl Default for BlockLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one libsvm line into (label, indices, values)
fn parse_line(line: &str) -> Result<(f64, Vec<u32>, Vec<f64>)> {
    let mut parts = line.split_whitespace();

    let label_str = parts
        .next()
        .ok_or_else(|| SvmError::ParseError("Empty line".to_string()))?;
    let label = label_str
        .parse::<f64>()
        .map_err(|_| SvmError::ParseError(format!("Invalid label: {label_str}")))?;
    // Normalize to the +1/-1 convention
    let label = if label > 0.0 { 1.0 } else { -1.0 };

    let mut indices = Vec::new();
    let mut values = Vec::new();

    for feature_str in parts {
        let (index_str, value_str) = feature_str.split_once(':').ok_or_else(|| {
            SvmError::ParseError(format!("Invalid feature format: {feature_str}"))
        })?;

        let index = index_str
            .parse::<u32>()
            .map_err(|_| SvmError::ParseError(format!("Invalid feature index: {index_str}")))?;
        let value = value_str
            .parse::<f64>()
            .map_err(|_| SvmError::ParseError(format!("Invalid feature value: {value_str}")))?;

        // libsvm uses 1-based indexing, convert to 0-based
        if index == 0 {
            return Err(SvmError::ParseError(
                "Feature index must be positive".to_string(),
            ));
        }
        indices.push(index - 1);
        values.push(value);
    }

    Ok((label, indices, values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sparse::max_columns;
    use std::io::Cursor;

    #[test]
    fn test_parse_line_basic() {
        let (label, indices, values) = parse_line("+1 1:0.5 3:1.2").unwrap();
        assert_eq!(label, 1.0);
        assert_eq!(indices, vec![0, 2]); // 1-based to 0-based
        assert_eq!(values, vec![0.5, 1.2]);
    }

    #[test]
    fn test_parse_line_label_normalization() {
        assert_eq!(parse_line("2 1:1.0").unwrap().0, 1.0);
        assert_eq!(parse_line("-3 1:1.0").unwrap().0, -1.0);
    }

    #[test]
    fn test_parse_line_invalid() {
        assert!(parse_line("+1 1").is_err());
        assert!(parse_line("+1 abc:1.0").is_err());
        assert!(parse_line("+1 1:abc").is_err());
        assert!(parse_line("+1 0:1.0").is_err()); // libsvm is 1-based
        assert!(parse_line("abc 1:1.0").is_err());
    }

    #[test]
    fn test_load_reader_basic() {
        let data = "# comment\n+1 1:0.5 3:1.2\n\n-1 2:0.3 5:2.1\n";
        let blocks = BlockLoader::new().load_reader(Cursor::new(data)).unwrap();

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].num_rows(), 2);
        assert_eq!(max_columns(&blocks), 5);

        let row = blocks[0].row_view(1).unwrap();
        assert_eq!(row.label, -1.0);
        assert_eq!(row.indices, &[1, 4]);
    }

    #[test]
    fn test_load_reader_rolls_over_blocks() {
        // Budget fits exactly two single-nonzero rows per block.
        let data = "+1 1:1.0\n-1 1:2.0\n+1 1:3.0\n-1 1:4.0\n+1 1:5.0\n";
        let blocks = BlockLoader::new()
            .with_block_bytes(56)
            .load_reader(Cursor::new(data))
            .unwrap();

        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].num_rows(), 2);
        assert_eq!(blocks[1].num_rows(), 2);
        assert_eq!(blocks[2].num_rows(), 1);

        // Row order survives the rollover.
        let values: Vec<f64> = blocks
            .iter()
            .flat_map(|b| b.iter_rows().map(|r| r.values[0]))
            .collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_load_reader_empty_corpus() {
        let result = BlockLoader::new().load_reader(Cursor::new("# only comments\n"));
        assert!(matches!(result, Err(SvmError::EmptyCorpus)));
    }

    #[test]
    fn test_parse_error_carries_line_number() {
        let data = "+1 1:1.0\n+1 bogus\n";
        let err = BlockLoader::new()
            .load_reader(Cursor::new(data))
            .unwrap_err();
        match err {
            SvmError::ParseError(msg) => assert!(msg.contains("line 2")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(temp_file, "+1 1:0.5 3:1.2").expect("Failed to write");
        writeln!(temp_file, "-1 2:0.3").expect("Failed to write");
        temp_file.flush().expect("Failed to flush");

        let blocks = BlockLoader::new().load_file(temp_file.path()).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].num_rows(), 2);
    }

    #[test]
    fn test_load_file_io_error() {
        let result = BlockLoader::new().load_file("/non/existent/file.libsvm");
        assert!(matches!(result, Err(SvmError::IoError(_))));
    }
}
