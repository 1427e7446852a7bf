//! Error taxonomy for the analysis pipeline.
//!
//! Every variant is fatal and raised before any metric is computed. Once a
//! dataset has been ingested the remaining stages cannot fail.

#[derive(thiserror::Error, Debug)]
pub enum AnalysisError {
    #[error("Missing required columns: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },
    #[error("Failed to parse column `{column}` at row {row}: {value:?}")]
    Parse {
        column: String,
        row: usize,
        value: String,
    },
    #[error("Malformed CSV input: {0}")]
    Csv(#[from] csv::Error),
}

impl AnalysisError {
    pub(crate) fn parse(column: &str, row: usize, value: &str) -> Self {
        AnalysisError::Parse {
            column: column.to_string(),
            row,
            value: value.to_string(),
        }
    }
}
