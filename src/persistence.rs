//! Model serialization and persistence
//!
//! Saves a converged weight vector with enough metadata to reproduce the
//! training configuration; the block storage itself is an in-memory format
//! and is never persisted.

use crate::core::{DenseVector, Result, SvmError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Serializable representation of a trained linear model
#[derive(Serialize, Deserialize)]
pub struct SerializableModel {
    /// Dense weight vector
    pub weights: Vec<f64>,
    /// Model metadata
    pub metadata: ModelMetadata,
}

/// Model metadata for tracking and validation
#[derive(Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Library version used to create the model
    pub library_version: String,
    /// Model dimension
    pub dim: usize,
    /// Training parameters used
    pub training_params: TrainingParams,
    /// Creation timestamp
    pub created_at: String,
}

/// Training parameters for reference
#[derive(Serialize, Deserialize, Clone)]
pub struct TrainingParams {
    pub mu: f64,
    pub step_size: f64,
    pub step_decay: f64,
    pub epochs: usize,
    pub num_workers: usize,
}

impl SerializableModel {
    /// Wrap a converged model with its training configuration
    pub fn new(model: &DenseVector, training_params: TrainingParams) -> Self {
        Self {
            weights: model.as_slice().to_vec(),
            metadata: ModelMetadata {
                library_version: env!("CARGO_PKG_VERSION").to_string(),
                dim: model.dim(),
                training_params,
                created_at: chrono::Utc::now().to_rfc3339(),
            },
        }
    }

    /// Save model to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path).map_err(SvmError::IoError)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| SvmError::SerializationError(e.to_string()))?;
        Ok(())
    }

    /// Load model from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(SvmError::IoError)?;
        let reader = BufReader::new(file);
        let model: SerializableModel = serde_json::from_reader(reader)
            .map_err(|e| SvmError::SerializationError(e.to_string()))?;
        if model.weights.len() != model.metadata.dim {
            return Err(SvmError::DimensionMismatch {
                expected: model.metadata.dim,
                actual: model.weights.len(),
            });
        }
        Ok(model)
    }

    /// Recover the dense weight vector
    pub fn to_dense_vector(&self) -> DenseVector {
        DenseVector::from_vec(self.weights.clone())
    }

    /// Print model summary
    pub fn print_summary(&self) {
        println!("=== Model Summary ===");
        println!("Dimension: {}", self.metadata.dim);
        println!("Library Version: {}", self.metadata.library_version);
        println!("Created: {}", self.metadata.created_at);
        println!("Training Parameters:");
        println!("  mu: {}", self.metadata.training_params.mu);
        println!("  step size: {}", self.metadata.training_params.step_size);
        println!("  step decay: {}", self.metadata.training_params.step_decay);
        println!("  epochs: {}", self.metadata.training_params.epochs);
        println!("  workers: {}", self.metadata.training_params.num_workers);
    }
}
