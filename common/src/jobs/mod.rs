use crate::model::import::{ImportResult, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    InProgress(u32),
    Completed(ImportReport),
    Failed(String),
}

/// What the status endpoint reports for a finished import: the counts and
/// errors of the [`ImportResult`] without its records, plus how many records
/// were stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub success: bool,
    pub errors: Vec<ValidationError>,
    pub total_rows: usize,
    pub valid_rows: usize,
    pub invalid_rows: usize,
    pub persisted: usize,
}

impl ImportReport {
    pub fn new<T>(result: &ImportResult<T>, persisted: usize) -> Self {
        ImportReport {
            success: result.success,
            errors: result.errors.clone(),
            total_rows: result.total_rows,
            valid_rows: result.valid_rows,
            invalid_rows: result.invalid_rows,
            persisted,
        }
    }
}
