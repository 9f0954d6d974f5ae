//! Tabular import pipeline shared by the client and vendor bulk uploads.
//!
//! `file text -> comment/blank filter -> tokenizer -> header mapping ->
//! per-row validation (decoding nested cells) -> aggregation`
//!
//! Every stage is a pure function of its inputs. [`run_import`] never fails:
//! structural problems and rule violations alike come back as
//! [`ValidationError`]s inside the [`ImportResult`]. The caller reads the file
//! and decides what to do with the records.

pub mod aggregate;
pub mod filter;
pub mod nested;
pub mod rules;
pub mod schema;
pub mod template;
pub mod tokenizer;
pub mod validate;

use crate::model::import::{ImportResult, ValidationError};
use aggregate::{RowOutcome, Tally};
use log::{debug, warn};
use rayon::prelude::*;
use schema::{HeaderIndex, Row, SchemaField};

pub use template::generate_template;

/// An entity that can be bulk-imported from, and exported as, a template row.
pub trait ImportRecord: Sized + Send {
    type Field: SchemaField;

    /// Singular lowercase entity name, used in templates and logs.
    const ENTITY: &'static str;

    /// Builds the record from a row that passed validation.
    fn from_row(row: &Row<'_, Self::Field>) -> Self;

    /// Cell texts in `Self::Field::ALL` order. Fails when a nested value has
    /// no text form that reads back the same.
    fn to_cells(&self) -> Result<Vec<String>, nested::NestedError>;

    /// A fully populated record used as the template's example row.
    fn example() -> Self;
}

#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub delimiter: char,
    pub comment_marker: char,
    /// Validate rows on the rayon pool. The result is identical to the
    /// sequential run.
    pub parallel: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        ImportOptions {
            delimiter: ',',
            comment_marker: '#',
            parallel: false,
        }
    }
}

/// Imports the whole of `text` as records of type `R`.
pub fn run_import<R: ImportRecord>(text: &str, options: &ImportOptions) -> ImportResult<R> {
    let lines = filter::data_lines(text, options.comment_marker);

    let Some((header_line, data)) = lines.split_first() else {
        warn!("{} import rejected: no header row", R::ENTITY);
        return ImportResult::structural(
            0,
            ValidationError::structural("file", "The file is empty or has no header row"),
        );
    };
    if data.is_empty() {
        warn!("{} import rejected: no data rows", R::ENTITY);
        return ImportResult::structural(
            0,
            ValidationError::structural("file", "The file has a header row but no data rows"),
        );
    }

    let headers = tokenizer::split_line(header_line, options.delimiter);
    let index = HeaderIndex::new(&headers);
    let missing = index.missing::<R::Field>();
    if !missing.is_empty() {
        warn!(
            "{} import rejected: missing headers {:?}",
            R::ENTITY,
            missing
        );
        return ImportResult::structural(
            data.len(),
            ValidationError::structural(
                "headers",
                format!("Missing required headers: {}", missing.join(", ")),
            ),
        );
    }

    debug!(
        "{} import: {} columns, {} data rows",
        R::ENTITY,
        headers.len(),
        data.len()
    );

    let import_row = |(offset, line): (usize, &&str)| -> RowOutcome<R> {
        let cells = tokenizer::split_line(line, options.delimiter);
        let row = Row::new(offset + 2, &cells, &index);
        let errors = validate::validate_row(&row);
        if errors.is_empty() {
            Ok(R::from_row(&row))
        } else {
            Err(errors)
        }
    };

    let result = if options.parallel {
        data.par_iter()
            .enumerate()
            .map(&import_row)
            .fold(Tally::default, Tally::push)
            .reduce(Tally::default, Tally::merge)
            .finish()
    } else {
        aggregate::aggregate(data.iter().enumerate().map(&import_row))
    };

    debug!(
        "{} import: {} valid, {} invalid, {} errors",
        R::ENTITY,
        result.valid_rows,
        result.invalid_rows,
        result.errors.len()
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::client::ClientRecord;
    use crate::model::codes::RiskTier;

    fn import(text: &str) -> ImportResult<ClientRecord> {
        run_import(text, &ImportOptions::default())
    }

    #[test]
    fn imports_valid_rows() {
        let result = import(
            "name,username,password,riskTier,isActive\n\
             Acme,acme,secret1,b,YES\n\
             Globex,globex,secret2,,0\n",
        );

        assert!(result.success);
        assert_eq!(result.total_rows, 2);
        assert_eq!(result.valid_rows, 2);
        assert_eq!(result.records[0].risk_tier, Some(RiskTier::B));
        assert_eq!(result.records[0].is_active, Some(true));
        assert_eq!(result.records[1].risk_tier, None);
        assert_eq!(result.records[1].is_active, Some(false));
    }

    #[test]
    fn header_case_and_spacing_do_not_matter() {
        let result = import(" NAME ,UserName,  PASSWORD\nAcme,acme,secret1\n");
        assert!(result.success, "{:?}", result.errors);
        assert_eq!(result.records[0].username, "acme");
    }

    #[test]
    fn missing_required_header_short_circuits() {
        let result = import("name,password\nAcme,secret1\nGlobex,secret2\n");

        assert!(!result.success);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].row, 0);
        assert_eq!(result.errors[0].field, "headers");
        assert!(result.errors[0].message.contains("username"));
        assert_eq!(result.total_rows, 2);
        assert_eq!(result.valid_rows, 0);
        assert_eq!(result.invalid_rows, 2);
        assert!(result.records.is_empty());
    }

    #[test]
    fn empty_and_header_only_files_are_structural_errors() {
        for text in ["", "\n  \n# only comments\n", "name,username,password\n"] {
            let result = import(text);
            assert!(!result.success);
            assert_eq!(result.total_rows, 0);
            assert_eq!(result.errors.len(), 1);
            assert_eq!(result.errors[0].row, 0);
            assert_eq!(result.errors[0].field, "file");
        }
    }

    #[test]
    fn comment_block_does_not_change_the_result() {
        let body = "name,username,password\nAcme,acme,secret1\n";
        let with_comments = format!("# Client import\n\n   # more notes\n\n{}", body);

        assert_eq!(import(&with_comments), import(body));
    }

    #[test]
    fn invalid_rows_are_excluded_and_numbered_from_the_header() {
        let result = import(
            "name,username,password,riskTier\n\
             Acme,acme,secret1,D\n\
             Globex,globex,secret2,A\n\
             ,initech,short,C\n",
        );

        assert!(!result.success);
        assert_eq!(result.total_rows, 3);
        assert_eq!(result.valid_rows, 1);
        assert_eq!(result.invalid_rows, 2);
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].name, "Globex");

        let located: Vec<(usize, &str)> = result
            .errors
            .iter()
            .map(|e| (e.row, e.field.as_str()))
            .collect();
        assert_eq!(
            located,
            vec![(2, "riskTier"), (4, "name"), (4, "password")]
        );
    }

    #[test]
    fn parallel_fold_matches_sequential() {
        let mut text = String::from("name,username,password,riskTier\n");
        for i in 0..500 {
            let tier = if i % 7 == 0 { "Z" } else { "A" };
            text.push_str(&format!("Client {},user{},secret{:03},{}\n", i, i, i, tier));
        }

        let sequential = import(&text);
        let parallel = run_import::<ClientRecord>(
            &text,
            &ImportOptions {
                parallel: true,
                ..ImportOptions::default()
            },
        );

        assert_eq!(parallel, sequential);
        assert_eq!(
            sequential.valid_rows + sequential.invalid_rows,
            sequential.total_rows
        );
    }

    #[test]
    fn custom_delimiter_and_marker() {
        let options = ImportOptions {
            delimiter: ';',
            comment_marker: '!',
            parallel: false,
        };
        let result = run_import::<ClientRecord>(
            "! notes\nname;username;password;locations\n\"Acme; Inc\";acme;secret1;HQ|1 Main St\n",
            &options,
        );

        assert!(result.success, "{:?}", result.errors);
        assert_eq!(result.records[0].name, "Acme; Inc");
        assert_eq!(result.records[0].locations.as_ref().map(Vec::len), Some(1));
    }
}
