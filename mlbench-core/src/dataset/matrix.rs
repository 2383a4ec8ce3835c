//! Delimited numeric matrices

use crate::error::{HarnessError, Result};
use std::fs;
use std::path::Path;

/// Field separator of a delimited text file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// Comma-separated fields
    Comma,
    /// Fields separated by runs of spaces or tabs
    Whitespace,
}

impl Delimiter {
    /// Pick the delimiter that splits `line` into more fields.
    ///
    /// Returns the delimiter together with the field count it yields.
    /// Ties go to the comma.
    pub fn sniff(line: &str) -> (Self, usize) {
        let line = line.trim();
        if line.is_empty() {
            return (Self::Comma, 0);
        }
        let commas = line.split(',').count();
        let spaces = line.split_whitespace().count();
        if spaces > commas {
            (Self::Whitespace, spaces)
        } else {
            (Self::Comma, commas)
        }
    }
}

/// A dense row-major matrix of `f64` values
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Build a matrix from rows of equal width
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(HarnessError::InvalidInput(format!(
                    "row {i} has {} columns, expected {cols}",
                    row.len()
                )));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// A single-column matrix holding `values`
    pub fn column_vector(values: Vec<f64>) -> Self {
        Self {
            rows: values.len(),
            cols: 1,
            data: values,
        }
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// True when the matrix holds no values
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at (`row`, `col`)
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// Borrow one row
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Iterate over rows
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.rows).map(move |r| self.row(r))
    }

    /// Copy out one column
    pub fn column(&self, col: usize) -> Vec<f64> {
        self.iter_rows().map(|row| row[col]).collect()
    }

    /// Keep only the first `cols` columns
    pub fn leading_columns(&self, cols: usize) -> Matrix {
        let cols = cols.min(self.cols);
        let mut data = Vec::with_capacity(self.rows * cols);
        for row in self.iter_rows() {
            data.extend_from_slice(&row[..cols]);
        }
        Matrix {
            rows: self.rows,
            cols,
            data,
        }
    }

    /// Interpret the matrix as a label vector.
    ///
    /// A one-column file is taken as is; wider files contribute their last
    /// column.
    pub fn into_labels(self) -> Vec<f64> {
        match self.cols {
            0 => Vec::new(),
            1 => self.data,
            _ => self.column(self.cols - 1),
        }
    }

    /// Parse a delimited numeric text file.
    ///
    /// Blank lines and `%` comments are ignored. When the file carries an
    /// attribute header, everything up to and including the `@data` marker
    /// is skipped.
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
        Self::parse(&content, path)
    }

    pub(crate) fn parse(content: &str, path: &Path) -> Result<Self> {
        let lines: Vec<&str> = content.lines().collect();
        let body_start = lines
            .iter()
            .position(|line| line.trim().eq_ignore_ascii_case("@data"))
            .map_or(0, |marker| marker + 1);

        let mut rows: Vec<Vec<f64>> = Vec::new();
        let mut delimiter = None;

        for (idx, raw) in lines.iter().enumerate().skip(body_start) {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('%') {
                continue;
            }
            let line_no = idx + 1;
            let sep = *delimiter.get_or_insert_with(|| Delimiter::sniff(line).0);
            let row = match sep {
                Delimiter::Comma => parse_comma_record(line, path, line_no)?,
                Delimiter::Whitespace => line
                    .split_whitespace()
                    .map(|field| parse_field(field, path, line_no))
                    .collect::<Result<Vec<f64>>>()?,
            };

            if let Some(first) = rows.first() {
                if first.len() != row.len() {
                    return Err(HarnessError::InvalidFormat {
                        path: path.to_path_buf(),
                        line: line_no,
                        reason: format!("expected {} fields, found {}", first.len(), row.len()),
                    });
                }
            }
            rows.push(row);
        }

        Self::from_rows(rows)
    }
}

fn parse_comma_record(line: &str, path: &Path, line_no: usize) -> Result<Vec<f64>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(line.as_bytes());

    let mut record = csv::StringRecord::new();
    let found = reader
        .read_record(&mut record)
        .map_err(|e| HarnessError::InvalidFormat {
            path: path.to_path_buf(),
            line: line_no,
            reason: e.to_string(),
        })?;
    if !found {
        return Ok(Vec::new());
    }

    record
        .iter()
        .map(|field| parse_field(field, path, line_no))
        .collect()
}

fn parse_field(field: &str, path: &Path, line_no: usize) -> Result<f64> {
    field
        .trim()
        .trim_matches('"')
        .parse::<f64>()
        .map_err(|_| HarnessError::InvalidFormat {
            path: path.to_path_buf(),
            line: line_no,
            reason: format!("'{field}' is not a number"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<Matrix> {
        Matrix::parse(content, Path::new("test.csv"))
    }

    #[test]
    fn test_sniff_prefers_more_fields() {
        assert_eq!(Delimiter::sniff("1,2,3"), (Delimiter::Comma, 3));
        assert_eq!(Delimiter::sniff("1 2 3 4"), (Delimiter::Whitespace, 4));
        assert_eq!(Delimiter::sniff("1.5"), (Delimiter::Comma, 1));
        assert_eq!(Delimiter::sniff(""), (Delimiter::Comma, 0));
    }

    #[test]
    fn test_parse_comma_matrix() {
        let m = parse("1,2,3\n4, 5 ,6\n\n").unwrap();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
        assert_eq!(m.column(0), vec![1.0, 4.0]);
    }

    #[test]
    fn test_parse_whitespace_matrix() {
        let m = parse("1 2\n3\t4\n").unwrap();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.get(1, 1), Some(4.0));
        assert_eq!(m.get(2, 0), None);
    }

    #[test]
    fn test_parse_skips_attribute_header() {
        let content = "@relation iris\n\n@attribute a NUMERIC\n@attribute b NUMERIC\n\n@data\n1,2\n% comment\n3,4\n";
        let m = parse(content).unwrap();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.row(0), &[1.0, 2.0]);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = parse("1,2\n3\n").unwrap_err();
        match err {
            HarnessError::InvalidFormat { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_numeric_field_rejected() {
        let err = parse("1,abc\n").unwrap_err();
        assert!(err.to_string().contains("'abc' is not a number"));
    }

    #[test]
    fn test_into_labels() {
        assert_eq!(Matrix::column_vector(vec![1.0, 2.0]).into_labels(), vec![1.0, 2.0]);
        let m = parse("1,2,0\n3,4,1\n").unwrap();
        assert_eq!(m.into_labels(), vec![0.0, 1.0]);
    }
}
