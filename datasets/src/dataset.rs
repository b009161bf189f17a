//! Labelled samples the trainer draws its batches from.
//!
//! A [`Dataset`] is a named list of [`DataPoint`]s. The points are expected to
//! match the network's input and output widths, but nothing here enforces it:
//! the forward pass zero-fills or truncates mismatched vectors.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Wrapper for standard I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not a valid JSON dataset
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// A dataset without a single point cannot be trained on
    #[error("Dataset '{0}' contains no data points")]
    Empty(String),
}

/// One training sample: an input vector and the output expected for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub input: Vec<f64>,
    pub output: Vec<f64>,
}

impl DataPoint {
    pub fn new(input: Vec<f64>, output: Vec<f64>) -> Self {
        Self { input, output }
    }
}

/// A named, ordered collection of samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub data: Vec<DataPoint>,
}

impl Dataset {
    /// Creates a new dataset.
    ///
    /// # Example
    /// ```
    /// use datasets::{DataPoint, Dataset};
    ///
    /// let dataset = Dataset::new(
    ///     "AND",
    ///     "Learn the AND logical operation",
    ///     vec![
    ///         DataPoint::new(vec![0.0, 0.0], vec![0.0]),
    ///         DataPoint::new(vec![1.0, 1.0], vec![1.0]),
    ///     ],
    /// );
    /// assert_eq!(dataset.len(), 2);
    /// ```
    pub fn new(name: impl Into<String>, description: impl Into<String>, data: Vec<DataPoint>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            data,
        }
    }

    /// Loads a dataset from a JSON file of the form
    /// `{ "name": ..., "description": ..., "data": [{ "input": [...], "output": [...] }] }`.
    ///
    /// # Errors
    /// * `DatasetError::Io` if the file cannot be read
    /// * `DatasetError::Json` if it cannot be parsed
    /// * `DatasetError::Empty` if it holds no points
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let json = fs::read_to_string(path)?;
        let dataset: Dataset = serde_json::from_str(&json)?;
        if dataset.is_empty() {
            return Err(DatasetError::Empty(dataset.name));
        }
        debug!(
            "loaded dataset '{}' with {} points from {}",
            dataset.name,
            dataset.len(),
            path.display()
        );
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.data
    }

    /// Width of the first point's input vector, if there is one.
    pub fn input_size(&self) -> Option<usize> {
        self.data.first().map(|point| point.input.len())
    }

    /// Width of the first point's output vector, if there is one.
    pub fn output_size(&self) -> Option<usize> {
        self.data.first().map(|point| point.output.len())
    }
}
