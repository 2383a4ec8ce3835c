//! Dataset resolution and loading
//!
//! A benchmark names one to three files: the training set (with labels in
//! its last column), an optional test set and optional true test labels.

pub mod arff;
pub mod matrix;
pub mod resolver;

pub use matrix::{Delimiter, Matrix};
pub use resolver::{resolve, resolve_one};

use crate::error::{HarnessError, Result};
use std::path::{Path, PathBuf};

/// Maximum number of files in a dataset reference
pub const MAX_DATASET_FILES: usize = 3;

/// Ordered dataset paths: train, then test, then test labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRef {
    paths: Vec<PathBuf>,
}

impl DatasetRef {
    /// Create a reference from one to three paths
    pub fn new<I, P>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let paths: Vec<PathBuf> = paths.into_iter().map(Into::into).collect();
        if paths.is_empty() || paths.len() > MAX_DATASET_FILES {
            return Err(HarnessError::InvalidInput(format!(
                "a dataset reference needs 1 to {MAX_DATASET_FILES} paths, got {}",
                paths.len()
            )));
        }
        Ok(Self { paths })
    }

    /// Training set path
    pub fn train(&self) -> &Path {
        &self.paths[0]
    }

    /// Test set path, if given
    pub fn test(&self) -> Option<&Path> {
        self.paths.get(1).map(PathBuf::as_path)
    }

    /// True test labels path, if given
    pub fn test_labels(&self) -> Option<&Path> {
        self.paths.get(2).map(PathBuf::as_path)
    }

    /// All paths in order
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Number of paths
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Always false; a reference holds at least one path
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Resolve every path against the accepted formats
    pub fn resolve(&self, accepted: &[&str]) -> Result<DatasetRef> {
        Ok(Self {
            paths: resolve(&self.paths, accepted)?,
        })
    }
}

/// Matrices loaded from a resolved [`DatasetRef`]
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDatasets {
    /// Training matrix, labels in the last column
    pub train: Matrix,
    /// Test matrix
    pub test: Option<Matrix>,
    /// True test labels
    pub test_labels: Option<Matrix>,
    /// The resolved paths the matrices were read from
    pub paths: DatasetRef,
}

impl LoadedDatasets {
    /// Number of matrices loaded
    pub fn len(&self) -> usize {
        1 + usize::from(self.test.is_some()) + usize::from(self.test_labels.is_some())
    }

    /// Always false; the training matrix is always present
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Split the training matrix into features and labels
    pub fn split(&self) -> Result<(Matrix, Vec<f64>)> {
        split(&self.train)
    }
}

/// Resolve `paths` and parse each one as a numeric matrix
pub fn load(paths: &DatasetRef, accepted: &[&str]) -> Result<LoadedDatasets> {
    let resolved = paths.resolve(accepted)?;
    let train = Matrix::read(resolved.train())?;
    let test = resolved.test().map(Matrix::read).transpose()?;
    let test_labels = resolved.test_labels().map(Matrix::read).transpose()?;

    log::debug!(
        "loaded {} dataset file(s), train {}x{}",
        resolved.len(),
        train.rows(),
        train.cols()
    );

    Ok(LoadedDatasets {
        train,
        test,
        test_labels,
        paths: resolved,
    })
}

/// Split off the last column as the label vector
pub fn split(matrix: &Matrix) -> Result<(Matrix, Vec<f64>)> {
    if matrix.cols() == 0 {
        return Err(HarnessError::InvalidInput(
            "cannot split labels from a matrix without columns".to_string(),
        ));
    }
    let features = matrix.leading_columns(matrix.cols() - 1);
    let labels = matrix.column(matrix.cols() - 1);
    Ok((features, labels))
}
