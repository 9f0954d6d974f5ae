//! Decoding of multi-valued sub-records packed into a single cell.
//!
//! The main grammar separates sub-records with `||` and the parts of one
//! sub-record with `|`, positionally matching the shape's part list:
//!
//! ```text
//! finance|John Doe|john@example.com|+123||warehouse|Jane|jane@x.com|+000
//! ```
//!
//! A cell starting with `[` is read as a JSON array of objects instead. When
//! either form is malformed the cell degrades to a plain comma list where each
//! token only fills the first part.

use log::warn;
use serde_json::{Map, Value};
use thiserror::Error;

pub const GROUP_DELIMITER: &str = "||";
pub const PART_DELIMITER: char = '|';

/// Part layout of one sub-record family. The first `required` parts must be
/// filled for a sub-record to be complete.
#[derive(Debug, PartialEq, Eq)]
pub struct SubRecordShape {
    pub name: &'static str,
    pub parts: &'static [&'static str],
    pub required: usize,
}

impl SubRecordShape {
    /// Human-readable grammar line, e.g. `type|contactName|contactEmail`.
    pub fn grammar(&self) -> String {
        self.parts.join("|")
    }
}

/// One decoded sub-record, with values aligned to its shape's parts. Blank
/// means the part was not supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubRecord {
    shape: &'static SubRecordShape,
    values: Vec<String>,
}

impl SubRecord {
    pub fn new(shape: &'static SubRecordShape, mut values: Vec<String>) -> Self {
        values.resize(shape.parts.len(), String::new());
        SubRecord { shape, values }
    }

    pub fn get(&self, part: &str) -> &str {
        self.shape
            .parts
            .iter()
            .position(|p| *p == part)
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// The part's value, or `None` when blank.
    pub fn value(&self, part: &str) -> Option<String> {
        let value = self.get(part);
        (!value.is_empty()).then(|| value.to_string())
    }

    /// Required parts left blank, in shape order.
    pub fn missing_required(&self) -> Vec<&'static str> {
        self.shape.parts[..self.shape.required]
            .iter()
            .zip(&self.values)
            .filter(|(_, value)| value.is_empty())
            .map(|(part, _)| *part)
            .collect()
    }

    fn has_leading_part(&self) -> bool {
        self.values.first().is_some_and(|v| !v.is_empty())
    }
}

/// A typed sub-record that can be built from, and flattened back to, a
/// [`SubRecord`].
pub trait NestedRecord: Sized {
    const SHAPE: &'static SubRecordShape;

    fn from_sub_record(record: &SubRecord) -> Self;

    /// Part values in shape order; `None` for parts left out.
    fn to_parts(&self) -> Vec<Option<String>>;
}

#[derive(Debug, Error)]
pub enum NestedError {
    #[error("invalid JSON array of objects: {0}")]
    Json(#[from] serde_json::Error),
    #[error("entry {group} has {found} parts but {shape} takes at most {max}")]
    TooManyParts {
        shape: &'static str,
        group: usize,
        found: usize,
        max: usize,
    },
    #[error("{shape} entries cannot be written as text: {reason}")]
    Unencodable { shape: &'static str, reason: String },
}

/// Decodes one cell into sub-records.
///
/// Returns `None` when the cell is blank, and also when a malformed cell
/// yields nothing under the plain comma fallback. A well-formed cell that
/// contains no usable entry returns an empty list.
pub fn decode_cell(text: &str, shape: &'static SubRecordShape) -> Option<Vec<SubRecord>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let decoded = if text.starts_with('[') {
        decode_json(text, shape)
    } else {
        decode_groups(text, shape)
    };

    match decoded {
        Ok(records) => Some(records),
        Err(err) => {
            warn!("{} cell falls back to plain list: {}", shape.name, err);
            let records = decode_plain(text, shape);
            (!records.is_empty()).then_some(records)
        }
    }
}

fn decode_json(text: &str, shape: &'static SubRecordShape) -> Result<Vec<SubRecord>, NestedError> {
    let objects: Vec<Map<String, Value>> = serde_json::from_str(text)?;

    Ok(objects
        .iter()
        .map(|object| {
            let values = shape
                .parts
                .iter()
                .map(|part| object.get(*part).map(json_text).unwrap_or_default())
                .collect();
            SubRecord::new(shape, values)
        })
        .filter(SubRecord::has_leading_part)
        .collect())
}

fn json_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

fn decode_groups(
    text: &str,
    shape: &'static SubRecordShape,
) -> Result<Vec<SubRecord>, NestedError> {
    let mut records = Vec::new();

    for (group_index, group) in text
        .split(GROUP_DELIMITER)
        .filter(|group| !group.trim().is_empty())
        .enumerate()
    {
        let parts: Vec<String> = group
            .split(PART_DELIMITER)
            .map(|part| part.trim().to_string())
            .collect();
        if parts.len() > shape.parts.len() {
            return Err(NestedError::TooManyParts {
                shape: shape.name,
                group: group_index + 1,
                found: parts.len(),
                max: shape.parts.len(),
            });
        }

        let record = SubRecord::new(shape, parts);
        if record.has_leading_part() {
            records.push(record);
        }
    }

    Ok(records)
}

fn decode_plain(text: &str, shape: &'static SubRecordShape) -> Vec<SubRecord> {
    text.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| SubRecord::new(shape, vec![token.to_string()]))
        .collect()
}

/// Encodes typed sub-records in the `|` / `||` grammar. Trailing parts left
/// out are dropped from each entry.
///
/// Fails when the text would not decode back to the same entries: an empty
/// list, a blank first part, a blank part before a filled one, a part holding
/// `|` or a line break or surrounding whitespace, or a cell opening with `[`.
pub fn encode<N: NestedRecord>(records: &[N]) -> Result<String, NestedError> {
    let shape = N::SHAPE;
    if records.is_empty() {
        return Err(unencodable(shape, "an empty list reads back as no value"));
    }

    let mut groups = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let mut parts: Vec<String> = record
            .to_parts()
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect();
        while parts.last().is_some_and(String::is_empty) {
            parts.pop();
        }
        check_parts(shape, index + 1, &parts)?;
        groups.push(parts.join(&PART_DELIMITER.to_string()));
    }

    let cell = groups.join(GROUP_DELIMITER);
    if cell.starts_with('[') {
        return Err(unencodable(shape, "a cell opening with [ reads as JSON"));
    }
    Ok(cell)
}

fn check_parts(
    shape: &'static SubRecordShape,
    entry: usize,
    parts: &[String],
) -> Result<(), NestedError> {
    if parts.is_empty() {
        return Err(unencodable(
            shape,
            format!(
                "entry {}: {} is blank",
                entry,
                shape.parts.first().copied().unwrap_or(shape.name)
            ),
        ));
    }

    for (part, value) in shape.parts.iter().zip(parts) {
        let problem = if value.is_empty() {
            Some("is blank")
        } else if value.contains(PART_DELIMITER) {
            Some("contains |")
        } else if value.contains(['\n', '\r']) {
            Some("contains a line break")
        } else if value.trim() != value {
            Some("has surrounding whitespace")
        } else {
            None
        };
        if let Some(problem) = problem {
            return Err(unencodable(
                shape,
                format!("entry {}: {} {}", entry, part, problem),
            ));
        }
    }
    Ok(())
}

fn unencodable(shape: &'static SubRecordShape, reason: impl Into<String>) -> NestedError {
    NestedError::Unencodable {
        shape: shape.name,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static DEPARTMENT: SubRecordShape = SubRecordShape {
        name: "department",
        parts: &["type", "contactName", "contactEmail", "contactPhone"],
        required: 1,
    };

    static LOCATION: SubRecordShape = SubRecordShape {
        name: "location",
        parts: &["name", "address", "city", "country"],
        required: 2,
    };

    #[test]
    fn two_groups_decode_in_order() {
        let cell = "finance|John Doe|john@example.com|+123456789||warehouse|Jane|jane@x.com|+000";
        let records = decode_cell(cell, &DEPARTMENT).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("type"), "finance");
        assert_eq!(records[0].get("contactName"), "John Doe");
        assert_eq!(records[0].get("contactEmail"), "john@example.com");
        assert_eq!(records[0].get("contactPhone"), "+123456789");
        assert_eq!(records[1].get("type"), "warehouse");
        assert_eq!(records[1].get("contactName"), "Jane");
        assert_eq!(records[1].get("contactEmail"), "jane@x.com");
        assert_eq!(records[1].get("contactPhone"), "+000");
    }

    #[test]
    fn blank_cell_is_absent() {
        assert_eq!(decode_cell("", &DEPARTMENT), None);
        assert_eq!(decode_cell("   ", &DEPARTMENT), None);
    }

    #[test]
    fn groups_without_leading_part_are_dropped() {
        let records = decode_cell("|Nobody||sales|Ann", &DEPARTMENT).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("type"), "sales");
        assert_eq!(records[0].value("contactEmail"), None);
    }

    #[test]
    fn well_formed_cell_without_entries_is_empty_not_absent() {
        assert_eq!(decode_cell("|x||", &DEPARTMENT), Some(Vec::new()));
    }

    #[test]
    fn json_array_form() {
        let cell = r#"[{"type":"finance","contactName":"John"},{"type":"ops","contactPhone":123}]"#;
        let records = decode_cell(cell, &DEPARTMENT).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("contactName"), "John");
        assert_eq!(records[1].get("type"), "ops");
        assert_eq!(records[1].get("contactPhone"), "123");
    }

    #[test]
    fn broken_json_falls_back_to_plain_list() {
        let records = decode_cell("[finance, ops", &DEPARTMENT).unwrap();
        let types: Vec<&str> = records.iter().map(|r| r.get("type")).collect();
        assert_eq!(types, vec!["[finance", "ops"]);
        assert_eq!(records[0].value("contactName"), None);
    }

    #[test]
    fn too_many_parts_falls_back_to_plain_list() {
        let records = decode_cell("hq|1 Main St|Springfield|US|extra, annex", &LOCATION).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.get("name")).collect();
        assert_eq!(names, vec!["hq|1 Main St|Springfield|US|extra", "annex"]);
    }

    #[test]
    fn fallback_with_nothing_left_is_absent() {
        assert_eq!(decode_cell("[ , ,", &DEPARTMENT), None);
    }

    #[test]
    fn missing_required_parts() {
        let records = decode_cell("hq||depot|Dock Rd", &LOCATION).unwrap();
        assert_eq!(records[0].missing_required(), vec!["address"]);
        assert!(records[1].missing_required().is_empty());
    }
}
