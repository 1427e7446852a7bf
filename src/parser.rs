//! CSV parser for per-trip ridership exports.

use crate::error::AnalysisError;

/// A raw table of string cells: the in-memory input to the pipeline.
///
/// Rows are expected to be as wide as `columns`; missing trailing cells are
/// read as blank.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TripTable {
    pub fn new<C, R>(columns: C, rows: R) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        R: IntoIterator<Item = Vec<String>>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: rows.into_iter().collect(),
        }
    }

    /// Position of `name` in the header, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Decodes a header-first CSV document into a [`TripTable`].
///
/// Header names and cells are trimmed.
///
/// # Errors
///
/// Returns [`AnalysisError::Csv`] if the bytes are not valid UTF-8 CSV or a
/// row has a different number of fields than the header.
pub fn parse_table(bytes: &[u8]) -> Result<TripTable, AnalysisError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let columns = rdr.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(TripTable { columns, rows })
}
