//! Table types.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// One table read from a page: optional column labels over rows that each
/// start with a label cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableBlock {
    /// Text of the header cell above the label column (e.g. "Factor")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,

    /// Labels of the value columns, in order (may be empty)
    #[serde(default)]
    pub columns: Vec<String>,

    /// Body rows
    pub rows: Vec<TableRow>,
}

impl TableBlock {
    /// Create a new table without header.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table with the given value column labels.
    pub fn with_columns<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            ..Self::new()
        }
    }

    /// Set the heading and return self.
    pub fn heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = Some(heading.into());
        self
    }

    /// Append a row built from text values and return self.
    ///
    /// Blank values become null cells.
    pub fn row<S: Into<String>>(
        mut self,
        label: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        self.rows.push(TableRow::from_strings(label, values));
        self
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Get the number of body rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no body rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether the table has a header row.
    pub fn has_header(&self) -> bool {
        self.heading.is_some() || !self.columns.is_empty()
    }

    /// Label of the value column at `index`, or `""` when the header is
    /// shorter than the row.
    pub fn column_label(&self, index: usize) -> &str {
        self.columns.get(index).map(String::as_str).unwrap_or("")
    }

    /// Iterate over every non-null cell value in the table.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .flat_map(|r| r.cells.iter())
            .filter_map(|c| c.as_deref())
            .filter(|c| !c.trim().is_empty())
    }
}

/// A table body row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Row label (first cell); rows without one are ignored downstream
    pub label: Option<String>,

    /// Value cells after the label; `None` is a blank cell
    pub cells: Vec<Option<String>>,
}

impl TableRow {
    /// Create a new row.
    pub fn new(label: Option<String>, cells: Vec<Option<String>>) -> Self {
        Self { label, cells }
    }

    /// Create a row from text values. Blank values become null cells.
    pub fn from_strings<S: Into<String>>(
        label: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            label: cell(label),
            cells: values.into_iter().map(cell).collect(),
        }
    }

    /// Number of value cells, blank ones included.
    pub fn value_count(&self) -> usize {
        self.cells.len()
    }

    /// Normalized row label, `None` when missing or blank.
    pub fn normalized_label(&self) -> Option<String> {
        self.label
            .as_deref()
            .map(normalize_label)
            .filter(|l| !l.is_empty())
    }
}

/// Turn raw cell text into a cell value: blank text is null.
pub fn cell(text: impl Into<String>) -> Option<String> {
    let text = text.into();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Normalize a row, column or heading label: Unicode NFC, runs of whitespace
/// collapsed to one space, ends trimmed.
pub fn normalize_label(text: &str) -> String {
    let composed: String = text.nfc().collect();
    composed.split_whitespace().collect::<Vec<_>>().join(" ")
}
