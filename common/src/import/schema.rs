//! Schema description and header mapping.
//!
//! A schema is a field enum implementing [`SchemaField`]: its variants list
//! the fields in template order and each one points at a static
//! [`FieldSpec`]. Rows are read through [`Row`], which only accepts the
//! schema's own field type, so a lookup of a field the schema does not
//! declare does not compile. Columns in the file that the schema does not
//! know are ignored.

use crate::import::nested::{self, NestedRecord, SubRecord, SubRecordShape};
use crate::import::rules::{self, Rule};
use std::collections::HashMap;

/// Whether a cell holds one value or packed sub-records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Value,
    Nested(&'static SubRecordShape),
}

#[derive(Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub rules: &'static [Rule],
    /// One-line description used in the template's comment block.
    pub help: &'static str,
}

impl FieldSpec {
    pub fn is_required(&self) -> bool {
        self.rules.contains(&Rule::Required)
    }
}

pub trait SchemaField: Copy + Send + Sync + 'static {
    /// Every field, in column order.
    const ALL: &'static [Self];

    fn spec(self) -> &'static FieldSpec;

    fn name(self) -> &'static str {
        self.spec().name
    }
}

/// Names of required fields, in schema order.
pub fn required_names<F: SchemaField>() -> Vec<&'static str> {
    F::ALL
        .iter()
        .map(|field| field.spec())
        .filter(|spec| spec.is_required())
        .map(|spec| spec.name)
        .collect()
}

fn normalize(header: &str) -> String {
    header.trim().to_lowercase()
}

/// Case- and whitespace-insensitive header name to column position map.
#[derive(Debug, Clone, Default)]
pub struct HeaderIndex {
    columns: HashMap<String, usize>,
}

impl HeaderIndex {
    /// Builds the index from the header row. With duplicated headers the
    /// leftmost column wins.
    pub fn new(headers: &[String]) -> Self {
        let mut columns = HashMap::with_capacity(headers.len());
        for (position, header) in headers.iter().enumerate() {
            columns.entry(normalize(header)).or_insert(position);
        }
        HeaderIndex { columns }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.get(&normalize(name)).copied()
    }

    /// Required field names that have no matching header.
    pub fn missing<F: SchemaField>(&self) -> Vec<&'static str> {
        required_names::<F>()
            .into_iter()
            .filter(|name| self.position(name).is_none())
            .collect()
    }
}

/// One tokenized data row viewed through a schema.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a, F> {
    number: usize,
    cells: &'a [String],
    index: &'a HeaderIndex,
    _schema: std::marker::PhantomData<F>,
}

impl<'a, F: SchemaField> Row<'a, F> {
    /// `number` is the 1-based row position with the header as row 1.
    pub fn new(number: usize, cells: &'a [String], index: &'a HeaderIndex) -> Self {
        Row {
            number,
            cells,
            index,
            _schema: std::marker::PhantomData,
        }
    }

    pub fn number(&self) -> usize {
        self.number
    }

    /// The field's raw text; empty when the column is absent or short.
    pub fn get(&self, field: F) -> &'a str {
        self.index
            .position(field.name())
            .and_then(|position| self.cells.get(position))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// The field's text, or `None` when blank.
    pub fn text(&self, field: F) -> Option<String> {
        let value = self.get(field);
        (!value.is_empty()).then(|| value.to_string())
    }

    pub fn flag(&self, field: F) -> Option<bool> {
        rules::parse_flag(self.get(field))
    }

    pub fn integer(&self, field: F) -> Option<u32> {
        self.get(field).parse().ok()
    }

    /// The allowed spelling from the field's enumeration rule.
    pub fn code(&self, field: F) -> Option<&'static str> {
        let value = self.get(field);
        field.spec().rules.iter().find_map(|rule| match *rule {
            Rule::OneOf { allowed, case } => rules::canonical(allowed, case, value),
            _ => None,
        })
    }

    /// Decoded sub-records of a nested field, untyped.
    pub fn sub_records(&self, field: F) -> Option<Vec<SubRecord>> {
        match field.spec().kind {
            FieldKind::Nested(shape) => nested::decode_cell(self.get(field), shape),
            FieldKind::Value => None,
        }
    }

    pub fn nested<N: NestedRecord>(&self, field: F) -> Option<Vec<N>> {
        nested::decode_cell(self.get(field), N::SHAPE)
            .map(|records| records.iter().map(N::from_sub_record).collect())
    }
}
