//! Header-annotated sibling files
//!
//! Some tools refuse bare delimited data and want a relation name and one
//! attribute declaration per column in front of it. The header is
//! synthesized from the first data line; the body is copied byte for byte.

use super::matrix::Delimiter;
use crate::error::{HarnessError, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Extension of the header-annotated format
pub const ARFF_EXTENSION: &str = "arff";

/// Delimited text extensions that can be converted
pub const DELIMITED_EXTENSIONS: &[&str] = &["csv", "txt"];

/// True if files with this extension hold plain delimited text
pub fn is_delimited(extension: &str) -> bool {
    DELIMITED_EXTENSIONS
        .iter()
        .any(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Relation name for a dataset: the file stem up to the first underscore.
///
/// `iris_train.csv` becomes `iris`.
pub fn relation_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    stem.split('_').next().unwrap_or_default().to_string()
}

/// Render the header block for a dataset with `columns` columns
pub fn header(source: &Path, columns: usize) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut out = format!("@relation {}\n\n", relation_name(source));
    for i in 0..columns {
        out.push_str(&format!("@attribute {stem}_dim{i} NUMERIC\n"));
    }
    out.push_str("\n@data\n");
    out
}

/// Write `target` as `source` prefixed with a synthesized header.
///
/// The file is assembled next to `target` and moved into place in one
/// step, so concurrent writers converting the same source leave identical
/// content behind.
pub fn write_with_header(source: &Path, target: &Path) -> Result<()> {
    let input = File::open(source).map_err(|e| HarnessError::io(source, e))?;
    let mut reader = BufReader::new(input);

    let mut first_line = String::new();
    let read = reader
        .read_line(&mut first_line)
        .map_err(|e| HarnessError::io(source, e))?;
    let (_, columns) = Delimiter::sniff(&first_line);
    if read == 0 || columns == 0 {
        return Err(HarnessError::InvalidFormat {
            path: source.to_path_buf(),
            line: 1,
            reason: "cannot infer column count from an empty first line".to_string(),
        });
    }

    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let staged = NamedTempFile::new_in(dir).map_err(|e| HarnessError::io(dir, e))?;

    let mut writer = BufWriter::new(staged.as_file());
    copy_with_header(&mut writer, &header(source, columns), &first_line, &mut reader)
        .map_err(|e| HarnessError::io(target, e))?;
    drop(writer);

    staged
        .persist(target)
        .map_err(|e| HarnessError::io(target, e.error))?;

    log::info!(
        "converted '{}' to '{}' ({columns} attributes)",
        source.display(),
        target.display()
    );
    Ok(())
}

fn copy_with_header<W: Write, R: BufRead>(
    writer: &mut W,
    header: &str,
    first_line: &str,
    rest: &mut R,
) -> io::Result<()> {
    writer.write_all(header.as_bytes())?;
    writer.write_all(first_line.as_bytes())?;
    io::copy(rest, writer)?;
    writer.flush()
}
