//! Downloadable import templates.
//!
//! A template is written in exactly the grammar the importer reads: a block
//! of `#` comment lines documenting every field, the header line and one
//! worked example row. Re-importing an untouched template yields the example
//! record back.

use crate::import::ImportRecord;
use crate::import::nested::{GROUP_DELIMITER, NestedError, PART_DELIMITER};
use crate::import::rules::{Pattern, Rule};
use crate::import::schema::{FieldKind, FieldSpec, SchemaField};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use thiserror::Error;

const BYTE_ORDER_MARK: char = '\u{feff}';
const MARKER: char = '#';

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to write template rows: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush template rows: {0}")]
    Flush(String),
    #[error("template is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("example row: {0}")]
    Nested(#[from] NestedError),
    #[error("example {field} {problem} and would not read back the same")]
    Value {
        field: &'static str,
        problem: &'static str,
    },
}

/// Renders the template for `R` with `example` as its data row.
pub fn generate_template<R: ImportRecord>(example: &R) -> Result<String, TemplateError> {
    let mut text = String::new();
    text.push(BYTE_ORDER_MARK);

    for line in comment_block::<R>() {
        text.push(MARKER);
        if !line.is_empty() {
            text.push(' ');
            text.push_str(&line);
        }
        text.push('\n');
    }

    text.push_str(&rows(example)?);
    Ok(text)
}

fn rows<R: ImportRecord>(example: &R) -> Result<String, TemplateError> {
    let cells = example.to_cells()?;
    for (field, cell) in R::Field::ALL.iter().zip(&cells) {
        check_value(field.name(), cell)?;
    }

    // Fields holding the marker are quoted so the example row never reads as a comment.
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .comment(Some(MARKER as u8))
        .from_writer(Vec::new());

    writer.write_record(R::Field::ALL.iter().map(|field| field.name()))?;
    writer.write_record(&cells)?;

    let bytes = writer
        .into_inner()
        .map_err(|e| TemplateError::Flush(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

/// The importer trims every cell and reads one record per line.
fn check_value(field: &'static str, cell: &str) -> Result<(), TemplateError> {
    let problem = if cell.contains(['\n', '\r']) {
        "contains a line break"
    } else if cell.trim() != cell {
        "has surrounding whitespace"
    } else {
        return Ok(());
    };
    Err(TemplateError::Value { field, problem })
}

fn comment_block<R: ImportRecord>() -> Vec<String> {
    let mut lines = vec![
        format!("{} import template", capitalize(R::ENTITY)),
        format!(
            "Lines starting with {} and empty lines are ignored.",
            MARKER
        ),
        "Keep the header line, then add one line per record in place of the example.".to_string(),
        "Wrap a value in double quotes if it contains a comma; write a quote inside it as \"\"."
            .to_string(),
        String::new(),
        "Fields:".to_string(),
    ];

    lines.extend(R::Field::ALL.iter().map(|field| describe_field(field.spec())));

    let nested: Vec<&FieldSpec> = R::Field::ALL
        .iter()
        .map(|field| field.spec())
        .filter(|spec| matches!(spec.kind, FieldKind::Nested(_)))
        .collect();
    if !nested.is_empty() {
        lines.push(String::new());
        lines.push("Nested fields hold several entries in one cell:".to_string());
        lines.push(format!(
            "  separate the parts of an entry with {} and the entries with {}",
            PART_DELIMITER, GROUP_DELIMITER
        ));
        for spec in nested {
            if let FieldKind::Nested(shape) = spec.kind {
                lines.push(format!(
                    "  {}: {} (first {} part{} required)",
                    spec.name,
                    shape.grammar(),
                    shape.required,
                    if shape.required == 1 { "" } else { "s" }
                ));
            }
        }
    }

    lines.push(String::new());
    lines
}

fn describe_field(spec: &FieldSpec) -> String {
    let mut notes: Vec<String> = spec
        .rules
        .iter()
        .filter_map(|rule| match *rule {
            Rule::Required => None,
            Rule::MinLength(min) => Some(format!("at least {} characters", min)),
            Rule::Pattern(Pattern::Email) => Some("email address".to_string()),
            Rule::OneOf { allowed, .. } => Some(format!("one of {}", allowed.join("/"))),
            Rule::Integer => Some("whole number".to_string()),
        })
        .collect();
    if spec.is_required() {
        notes.insert(0, "required".to_string());
    }

    if notes.is_empty() {
        format!("  {}: {}", spec.name, spec.help)
    } else {
        format!("  {} ({}): {}", spec.name, notes.join(", "), spec.help)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::{ImportOptions, run_import};
    use crate::model::client::ClientRecord;
    use crate::model::nested::{Department, Location};
    use crate::model::vendor::VendorRecord;

    #[test]
    fn starts_with_bom_and_documents_every_field() {
        let text = generate_template(&ClientRecord::example()).unwrap();

        assert!(text.starts_with('\u{feff}'));
        assert!(text.contains("# Client import template"));
        assert!(text.contains("riskTier (one of A/B/C)"));
        assert!(text.contains("departments: type|contactName|contactEmail|contactPhone"));
        assert!(text.contains("\nname,username,password,email,"));
    }

    #[test]
    fn values_with_commas_are_quoted() {
        let text = generate_template(&ClientRecord::example()).unwrap();
        let data_line = text.lines().last().unwrap();
        assert!(data_line.starts_with("\"Acme Industries, Inc.\","));
    }

    #[test]
    fn client_template_round_trips() {
        let example = ClientRecord::example();
        let text = generate_template(&example).unwrap();
        let result = run_import::<ClientRecord>(&text, &ImportOptions::default());

        assert!(result.success, "{:?}", result.errors);
        assert_eq!(result.total_rows, 1);
        assert_eq!(result.records, vec![example]);
    }

    #[test]
    fn vendor_template_round_trips() {
        let example = VendorRecord::example();
        let text = generate_template(&example).unwrap();
        let result = run_import::<VendorRecord>(&text, &ImportOptions::default());

        assert!(result.success, "{:?}", result.errors);
        assert_eq!(result.records, vec![example]);
    }

    #[test]
    fn quotes_inside_values_round_trip() {
        let mut example = VendorRecord::example();
        example.name = "The \"Best\" Parts, Ltd".to_string();
        let text = generate_template(&example).unwrap();
        let result = run_import::<VendorRecord>(&text, &ImportOptions::default());

        assert_eq!(result.records, vec![example]);
    }

    #[test]
    fn leading_comment_marker_is_quoted() {
        let mut example = VendorRecord::example();
        example.name = "#1 Supplies".to_string();
        let text = generate_template(&example).unwrap();
        assert!(text.lines().last().unwrap().starts_with("\"#1 Supplies\","));

        let result = run_import::<VendorRecord>(&text, &ImportOptions::default());
        assert!(result.success, "{:?}", result.errors);
        assert_eq!(result.records, vec![example]);
    }

    #[test]
    fn gap_inside_a_department_is_rejected() {
        let mut example = ClientRecord::example();
        example.departments = Some(vec![Department {
            kind: "finance".to_string(),
            contact_name: None,
            contact_email: Some("a@b.co".to_string()),
            contact_phone: None,
        }]);

        let err = generate_template(&example).unwrap_err();
        assert!(matches!(err, TemplateError::Nested(_)), "{}", err);
        assert!(err.to_string().contains("contactName is blank"), "{}", err);
    }

    #[test]
    fn pipe_inside_a_location_is_rejected() {
        let mut example = VendorRecord::example();
        example.locations = Some(vec![Location {
            name: "Dock A|B".to_string(),
            address: "1 Quay Rd".to_string(),
            city: None,
            country: None,
        }]);

        assert!(matches!(
            generate_template(&example),
            Err(TemplateError::Nested(_))
        ));
    }

    #[test]
    fn padded_value_is_rejected() {
        let mut example = ClientRecord::example();
        example.username = " acme.admin".to_string();

        match generate_template(&example) {
            Err(TemplateError::Value { field, .. }) => assert_eq!(field, "username"),
            other => panic!("expected a value error, got {:?}", other),
        }
    }
}
