//! Reconcile dataset files with the formats a tool accepts

use super::arff::{self, ARFF_EXTENSION};
use crate::error::{HarnessError, Result};
use std::path::{Path, PathBuf};

/// Resolve every path to a file in one of the `accepted` formats.
///
/// See [`resolve_one`] for the per-path rules. The input order is kept.
pub fn resolve<P: AsRef<Path>>(paths: &[P], accepted: &[&str]) -> Result<Vec<PathBuf>> {
    paths
        .iter()
        .map(|path| resolve_one(path.as_ref(), accepted))
        .collect()
}

/// Resolve a single dataset path.
///
/// 1. A sibling with an accepted extension, tried in the order given, wins.
///    The path itself counts as its own sibling, so a file whose extension
///    is already accepted comes back unchanged.
/// 2. Otherwise a delimited text file is converted into a header-annotated
///    sibling when that format is accepted.
/// 3. Anything else fails with [`HarnessError::ConversionUnsupported`].
///
/// The original file is never modified. Once a sibling exists, repeat
/// calls only read the filesystem.
pub fn resolve_one(path: &Path, accepted: &[&str]) -> Result<PathBuf> {
    if !path.is_file() {
        return Err(HarnessError::DatasetNotFound {
            path: path.to_path_buf(),
        });
    }

    if let Some(sibling) = first_existing_sibling(path, accepted) {
        if sibling != path {
            log::debug!(
                "using existing sibling '{}' for '{}'",
                sibling.display(),
                path.display()
            );
        }
        return Ok(sibling);
    }

    let own_extension = extension_of(path);
    if let Some(ext) = own_extension.as_deref() {
        if accepted.iter().any(|a| a.eq_ignore_ascii_case(ext)) {
            return Ok(path.to_path_buf());
        }
    }

    let convertible = own_extension.as_deref().is_some_and(arff::is_delimited);
    let wants_arff = accepted
        .iter()
        .any(|a| a.eq_ignore_ascii_case(ARFF_EXTENSION));
    if convertible && wants_arff {
        let target = path.with_extension(ARFF_EXTENSION);
        arff::write_with_header(path, &target)?;
        return Ok(target);
    }

    Err(HarnessError::ConversionUnsupported {
        path: path.to_path_buf(),
        accepted: accepted.iter().map(|s| s.to_string()).collect(),
    })
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().into_owned())
}

fn first_existing_sibling(path: &Path, accepted: &[&str]) -> Option<PathBuf> {
    accepted
        .iter()
        .map(|ext| path.with_extension(ext))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file() {
        let err = resolve_one(Path::new("/nonexistent/iris.csv"), &["csv"]).unwrap_err();
        assert!(matches!(err, HarnessError::DatasetNotFound { .. }));
    }

    #[test]
    fn test_accepted_extension_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("iris.csv");
        fs::write(&path, "1,2\n").unwrap();

        let resolved = resolve_one(&path, &["csv", "txt"]).unwrap();
        assert_eq!(resolved, path);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_existing_sibling_preferred() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("iris.csv");
        let sibling = dir.path().join("iris.arff");
        fs::write(&path, "1,2\n").unwrap();
        fs::write(&sibling, "@data\n1,2\n").unwrap();

        assert_eq!(resolve_one(&path, &["arff"]).unwrap(), sibling);
    }

    #[test]
    fn test_unsupported_source() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("iris.mat");
        fs::write(&path, "binary").unwrap();

        let err = resolve_one(&path, &["csv"]).unwrap_err();
        assert!(matches!(err, HarnessError::ConversionUnsupported { .. }));

        let err = resolve_one(&path, &["arff"]).unwrap_err();
        assert!(matches!(err, HarnessError::ConversionUnsupported { .. }));
    }
}
