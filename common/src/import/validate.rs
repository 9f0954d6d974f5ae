//! Per-row validation against a schema's rule table.

use crate::import::rules::Rule;
use crate::import::schema::{FieldKind, Row, SchemaField};
use crate::model::import::ValidationError;

/// Every violation in `row`, in field order. Nothing short-circuits: one
/// error is reported per violated rule, plus one per required part missing
/// from a nested sub-record.
pub fn validate_row<F: SchemaField>(row: &Row<'_, F>) -> Vec<ValidationError> {
    F::ALL
        .iter()
        .flat_map(|&field| field_errors(row, field))
        .collect()
}

fn field_errors<F: SchemaField>(row: &Row<'_, F>, field: F) -> Vec<ValidationError> {
    let spec = field.spec();
    let value = row.get(field);
    let error = |message: String| ValidationError::new(row.number(), spec.name, message);

    let FieldKind::Nested(_) = spec.kind else {
        return spec
            .rules
            .iter()
            .filter_map(|rule| rule.check(spec.name, value))
            .map(error)
            .collect();
    };

    // A nested cell counts as present only when something decodes out of it.
    let records = row.sub_records(field).unwrap_or_default();
    let mut errors: Vec<ValidationError> = spec
        .rules
        .iter()
        .filter_map(|rule| match rule {
            Rule::Required if records.is_empty() => Some(format!("{} is required", spec.name)),
            Rule::Required => None,
            other => other.check(spec.name, value),
        })
        .map(error)
        .collect();

    for (position, record) in records.iter().enumerate() {
        for part in record.missing_required() {
            errors.push(error(format!(
                "{} entry {}: {} is required",
                spec.name,
                position + 1,
                part
            )));
        }
    }

    errors
}
