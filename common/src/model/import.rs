use serde::{Deserialize, Serialize};

/// A single rule violation found while importing a file.
///
/// `row` is 1-based with the header counted as row 1, so the first data row
/// is row 2. Structural problems that stop the whole import (an empty file,
/// missing headers) are reported on the synthetic row 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub row: usize,
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(row: usize, field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError {
            row,
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn structural(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::new(0, field, message)
    }
}

/// Outcome of importing one file.
///
/// `records` only holds rows that passed every rule; every violation of every
/// other row is in `errors`. `success` is true exactly when `errors` is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult<T> {
    pub success: bool,
    pub records: Vec<T>,
    pub errors: Vec<ValidationError>,
    pub total_rows: usize,
    pub valid_rows: usize,
    pub invalid_rows: usize,
}

impl<T> ImportResult<T> {
    /// A failed result carrying one structural error. No row is counted as
    /// valid; `total_rows` is whatever data rows the file had.
    pub fn structural(total_rows: usize, error: ValidationError) -> Self {
        ImportResult {
            success: false,
            records: Vec::new(),
            errors: vec![error],
            total_rows,
            valid_rows: 0,
            invalid_rows: total_rows,
        }
    }
}
