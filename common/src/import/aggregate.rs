//! Folding per-row outcomes into one [`ImportResult`].
//!
//! [`Tally::merge`] is associative and keeps row order, so partial tallies
//! built over consecutive row ranges can be combined in any grouping.

use crate::model::import::{ImportResult, ValidationError};

/// A decoded record, or every error the row produced.
pub type RowOutcome<T> = Result<T, Vec<ValidationError>>;

#[derive(Debug)]
pub struct Tally<T> {
    records: Vec<T>,
    errors: Vec<ValidationError>,
    rows: usize,
    valid: usize,
}

impl<T> Default for Tally<T> {
    fn default() -> Self {
        Tally {
            records: Vec::new(),
            errors: Vec::new(),
            rows: 0,
            valid: 0,
        }
    }
}

impl<T> Tally<T> {
    pub fn push(mut self, outcome: RowOutcome<T>) -> Self {
        self.rows += 1;
        match outcome {
            Ok(record) => {
                self.valid += 1;
                self.records.push(record);
            }
            Err(errors) => self.errors.extend(errors),
        }
        self
    }

    pub fn merge(mut self, later: Tally<T>) -> Self {
        self.records.extend(later.records);
        self.errors.extend(later.errors);
        self.rows += later.rows;
        self.valid += later.valid;
        self
    }

    pub fn finish(self) -> ImportResult<T> {
        ImportResult {
            success: self.errors.is_empty(),
            records: self.records,
            errors: self.errors,
            total_rows: self.rows,
            valid_rows: self.valid,
            invalid_rows: self.rows - self.valid,
        }
    }
}

/// Folds outcomes sequentially, in row order.
pub fn aggregate<T>(outcomes: impl IntoIterator<Item = RowOutcome<T>>) -> ImportResult<T> {
    outcomes
        .into_iter()
        .fold(Tally::default(), Tally::push)
        .finish()
}
