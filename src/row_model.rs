//! Column schema and value extraction for a record type.

use std::fmt;

use crate::domain::Alignment;

/// Semantic type of the values in a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueKind {
    #[default]
    Text,
    Integer,
    Float,
    Boolean,
}

impl ValueKind {
    pub fn default_alignment(&self) -> Alignment {
        match self {
            ValueKind::Text => Alignment::Leading,
            ValueKind::Integer | ValueKind::Float => Alignment::Trailing,
            ValueKind::Boolean => Alignment::Center,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(text) => write!(f, "{text}"),
            CellValue::Integer(value) => write!(f, "{value}"),
            CellValue::Float(value) => write!(f, "{value:.2}"),
            CellValue::Boolean(true) => write!(f, "yes"),
            CellValue::Boolean(false) => write!(f, "no"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Boolean(value)
    }
}

impl<V: Into<CellValue>> From<Option<V>> for CellValue {
    fn from(value: Option<V>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

/// Describes the columns of a table and how to read a cell out of a record.
///
/// Column indices are always in `0..column_count()`. Passing anything else is
/// a programming error and implementations panic.
pub trait RowModel<T> {
    fn column_count(&self) -> usize;

    /// Header label, `None` renders an empty header cell.
    fn column_name(&self, column: usize) -> Option<&str>;

    fn value_kind(&self, column: usize) -> ValueKind;

    fn alignment(&self, column: usize) -> Alignment {
        self.value_kind(column).default_alignment()
    }

    fn is_editable(&self, column: usize) -> bool {
        check_column(column, self.column_count());
        false
    }

    /// Extract the value of `column` from `record`. Must not depend on
    /// anything but its arguments.
    fn value(&self, record: &T, column: usize) -> CellValue;
}

pub(crate) fn check_column(column: usize, count: usize) {
    assert!(
        column < count,
        "column index {column} out of range for {count} columns"
    );
}

type Extractor<T> = Box<dyn Fn(&T) -> CellValue>;

pub struct ColumnSpec<T> {
    name: Option<String>,
    kind: ValueKind,
    alignment: Option<Alignment>,
    editable: bool,
    extract: Extractor<T>,
}

impl<T: 'static> ColumnSpec<T> {
    pub fn new<V, F>(name: impl Into<String>, kind: ValueKind, extract: F) -> Self
    where
        V: Into<CellValue> + 'static,
        F: Fn(&T) -> V + 'static,
    {
        Self {
            name: Some(name.into()),
            kind,
            alignment: None,
            editable: false,
            extract: Box::new(move |record| extract(record).into()),
        }
    }

    pub fn text<V, F>(name: impl Into<String>, extract: F) -> Self
    where
        V: Into<CellValue> + 'static,
        F: Fn(&T) -> V + 'static,
    {
        Self::new(name, ValueKind::Text, extract)
    }

    pub fn unnamed(mut self) -> Self {
        self.name = None;
        self
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn editable(mut self) -> Self {
        self.editable = true;
        self
    }
}

/// Row model assembled from a list of [`ColumnSpec`]s.
pub struct ColumnRowModel<T> {
    columns: Vec<ColumnSpec<T>>,
}

impl<T> ColumnRowModel<T> {
    pub fn new(columns: Vec<ColumnSpec<T>>) -> Self {
        Self { columns }
    }

    fn spec(&self, column: usize) -> &ColumnSpec<T> {
        check_column(column, self.columns.len());
        &self.columns[column]
    }
}

impl<T> RowModel<T> for ColumnRowModel<T> {
    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn column_name(&self, column: usize) -> Option<&str> {
        self.spec(column).name.as_deref()
    }

    fn value_kind(&self, column: usize) -> ValueKind {
        self.spec(column).kind
    }

    fn alignment(&self, column: usize) -> Alignment {
        let spec = self.spec(column);
        spec.alignment.unwrap_or_else(|| spec.kind.default_alignment())
    }

    fn is_editable(&self, column: usize) -> bool {
        self.spec(column).editable
    }

    fn value(&self, record: &T, column: usize) -> CellValue {
        (self.spec(column).extract)(record)
    }
}

const PLACEHOLDER_COLUMNS: [&str; 2] = ["Name", "Value"];

/// Two column schema shown by a table that has not been configured yet.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderRowModel;

impl<T> RowModel<T> for PlaceholderRowModel {
    fn column_count(&self) -> usize {
        PLACEHOLDER_COLUMNS.len()
    }

    fn column_name(&self, column: usize) -> Option<&str> {
        check_column(column, PLACEHOLDER_COLUMNS.len());
        Some(PLACEHOLDER_COLUMNS[column])
    }

    fn value_kind(&self, column: usize) -> ValueKind {
        check_column(column, PLACEHOLDER_COLUMNS.len());
        ValueKind::Text
    }

    fn value(&self, _record: &T, column: usize) -> CellValue {
        check_column(column, PLACEHOLDER_COLUMNS.len());
        CellValue::Empty
    }
}
