//! Table layout classification.
//!
//! Pages mix three table layouts under the same caption styles, so the
//! layout is decided per table from its cell values alone.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::TableBlock;

use super::options::DEFAULT_MARK;

/// How a table's cells map to fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutVariant {
    /// Every row has exactly one value cell: one field per row
    SingleValueRow,
    /// Cells are either the mark or blank: each row selects one column
    PivotMark,
    /// Several independent values per row: one field per cell
    CrossTable,
}

impl fmt::Display for LayoutVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutVariant::SingleValueRow => write!(f, "single-value"),
            LayoutVariant::PivotMark => write!(f, "pivot-mark"),
            LayoutVariant::CrossTable => write!(f, "cross-table"),
        }
    }
}

/// Classify a table using the default mark `"X"`.
pub fn classify(table: &TableBlock) -> LayoutVariant {
    classify_with_mark(table, DEFAULT_MARK)
}

/// Classify a table.
///
/// * every row has exactly one value cell → [`LayoutVariant::SingleValueRow`]
/// * the distinct non-blank cell values are exactly `{mark}` →
///   [`LayoutVariant::PivotMark`]
/// * otherwise → [`LayoutVariant::CrossTable`]
pub fn classify_with_mark(table: &TableBlock, mark: &str) -> LayoutVariant {
    if table.rows.iter().all(|r| r.value_count() == 1) {
        return LayoutVariant::SingleValueRow;
    }

    let distinct: HashSet<&str> = table.values().map(str::trim).collect();
    if distinct.len() == 1 && distinct.contains(mark) {
        LayoutVariant::PivotMark
    } else {
        LayoutVariant::CrossTable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TableRow;

    #[test]
    fn test_single_value_rows() {
        let table = TableBlock::new()
            .row("Campus Size", ["200 acres"])
            .row("Rain", [""]);
        assert_eq!(classify(&table), LayoutVariant::SingleValueRow);
    }

    #[test]
    fn test_single_column_of_marks_is_single_value() {
        // One value cell per row wins over the mark check.
        let table = TableBlock::with_columns(["Offered"])
            .row("Wrestling", ["X"])
            .row("Rowing", ["X"]);
        assert_eq!(classify(&table), LayoutVariant::SingleValueRow);
    }

    #[test]
    fn test_pivot_mark() {
        let table = TableBlock::with_columns(["Very Important", "Important", "Considered"])
            .heading("Factor")
            .row("Rigor of Secondary School Record", ["X", "", ""])
            .row("Class Rank", ["", " X ", ""])
            .row("Interview", ["", "", ""]);
        assert_eq!(classify(&table), LayoutVariant::PivotMark);
    }

    #[test]
    fn test_other_values_make_cross_table() {
        let table = TableBlock::with_columns(["Required", "Recommended"])
            .heading("Subject")
            .row("English", ["4", "X"])
            .row("Mathematics", ["3", ""]);
        assert_eq!(classify(&table), LayoutVariant::CrossTable);
    }

    #[test]
    fn test_all_blank_multi_cell_is_cross_table() {
        let table = TableBlock::with_columns(["a", "b"]).row("r", ["", ""]);
        assert_eq!(classify(&table), LayoutVariant::CrossTable);
    }

    #[test]
    fn test_mark_is_case_sensitive() {
        let table = TableBlock::with_columns(["a", "b"]).row("r", ["x", ""]);
        assert_eq!(classify(&table), LayoutVariant::CrossTable);
        assert_eq!(classify_with_mark(&table, "x"), LayoutVariant::PivotMark);
    }

    #[test]
    fn test_rows_of_uneven_width() {
        let mut table = TableBlock::new();
        table.add_row(TableRow::from_strings("a", ["1"]));
        table.add_row(TableRow::from_strings("b", ["2", "3"]));
        assert_eq!(classify(&table), LayoutVariant::CrossTable);
    }

    #[test]
    fn test_display() {
        assert_eq!(LayoutVariant::PivotMark.to_string(), "pivot-mark");
    }
}
