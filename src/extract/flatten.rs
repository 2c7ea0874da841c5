//! Table flattening: classified tables to (label, value) pairs.

use crate::model::{normalize_label, AnomalyReason, FieldOrigin, LabeledValue, TableBlock};

use super::classify::LayoutVariant;

/// Separator between row and column label in cross-table field labels.
pub const CROSS_LABEL_SEPARATOR: &str = " - ";

/// Position of a table within an entity's pages.
#[derive(Debug, Clone, Copy)]
pub struct TableContext<'a> {
    /// Page index in page-class order
    pub page: usize,
    /// Page class name
    pub page_class: &'a str,
    /// Table index on the page
    pub table: usize,
}

/// A row that produced no pair because of a data-quality problem.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    /// Normalized row label
    pub label: String,
    /// The offending cell content (e.g. the marked column labels)
    pub raw_value: Option<String>,
    /// Why the row was rejected
    pub reason: AnomalyReason,
}

/// Output of flattening one table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flattened {
    /// Pairs in row-major order
    pub pairs: Vec<LabeledValue>,
    /// Rows rejected with an anomaly
    pub rejected: Vec<RejectedRow>,
}

/// Flatten one table according to its layout.
pub fn flatten(
    table: &TableBlock,
    layout: LayoutVariant,
    ctx: TableContext<'_>,
    mark: &str,
) -> Flattened {
    let builder = OriginBuilder::new(table, ctx);
    match layout {
        LayoutVariant::SingleValueRow => flatten_single(table, &builder),
        LayoutVariant::PivotMark => flatten_pivot(table, &builder, mark),
        LayoutVariant::CrossTable => flatten_cross(table, &builder),
    }
}

fn flatten_single(table: &TableBlock, builder: &OriginBuilder<'_>) -> Flattened {
    let mut out = Flattened::default();
    for row in &table.rows {
        let Some(label) = row.normalized_label() else {
            continue;
        };
        let value = row.cells.first().cloned().flatten();
        let origin = builder.origin(&label, Some(0));
        out.pairs.push(LabeledValue::new(label, value, origin));
    }
    out
}

fn flatten_pivot(table: &TableBlock, builder: &OriginBuilder<'_>, mark: &str) -> Flattened {
    let mut out = Flattened::default();
    for row in &table.rows {
        let Some(label) = row.normalized_label() else {
            continue;
        };
        let marked: Vec<usize> = row
            .cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.as_deref().map(str::trim) == Some(mark))
            .map(|(i, _)| i)
            .collect();

        match marked.as_slice() {
            [] => {}
            [column] => {
                let column_label = builder.column_label(*column);
                if column_label.is_empty() {
                    log::warn!("pivot row '{}' is marked in unlabeled column {}", label, column);
                    out.rejected.push(RejectedRow {
                        label,
                        raw_value: None,
                        reason: AnomalyReason::UnlabeledMark,
                    });
                    continue;
                }
                let origin = builder.origin(&label, Some(*column));
                out.pairs.push(LabeledValue::new(label, Some(column_label), origin));
            }
            columns => {
                let labels: Vec<String> =
                    columns.iter().map(|&c| builder.column_label(c)).collect();
                log::warn!("pivot row '{}' has {} marks", label, columns.len());
                out.rejected.push(RejectedRow {
                    label,
                    raw_value: Some(labels.join(", ")),
                    reason: AnomalyReason::MultipleMarks,
                });
            }
        }
    }
    out
}

fn flatten_cross(table: &TableBlock, builder: &OriginBuilder<'_>) -> Flattened {
    let mut out = Flattened::default();
    for row in &table.rows {
        let Some(row_label) = row.normalized_label() else {
            continue;
        };
        for (column, cell) in row.cells.iter().enumerate() {
            let Some(value) = cell.as_deref().filter(|v| !v.trim().is_empty()) else {
                continue;
            };
            let column_label = builder.column_label(column);
            let label = if column_label.is_empty() {
                row_label.clone()
            } else {
                format!("{}{}{}", row_label, CROSS_LABEL_SEPARATOR, column_label)
            };
            let origin = builder.origin(&row_label, Some(column));
            out.pairs
                .push(LabeledValue::new(label, Some(value.to_string()), origin));
        }
    }
    out
}

/// Builds [`FieldOrigin`]s for one table with its labels normalized once.
struct OriginBuilder<'a> {
    ctx: TableContext<'a>,
    heading: Option<String>,
    columns: Vec<String>,
}

impl<'a> OriginBuilder<'a> {
    fn new(table: &TableBlock, ctx: TableContext<'a>) -> Self {
        Self {
            ctx,
            heading: table
                .heading
                .as_deref()
                .map(normalize_label)
                .filter(|h| !h.is_empty()),
            columns: table.columns.iter().map(|c| normalize_label(c)).collect(),
        }
    }

    fn column_label(&self, column: usize) -> String {
        self.columns.get(column).cloned().unwrap_or_default()
    }

    fn origin(&self, row_label: &str, column: Option<usize>) -> FieldOrigin {
        FieldOrigin {
            page: self.ctx.page,
            page_class: self.ctx.page_class.to_string(),
            table: Some(self.ctx.table),
            heading: self.heading.clone(),
            column,
            column_label: column
                .map(|c| self.column_label(c))
                .filter(|l| !l.is_empty()),
            label: row_label.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::classify::classify;

    const CTX: TableContext<'static> = TableContext {
        page: 1,
        page_class: "admission",
        table: 3,
    };

    fn run(table: &TableBlock) -> Flattened {
        flatten(table, classify(table), CTX, "X")
    }

    fn labels(out: &Flattened) -> Vec<(&str, Option<&str>)> {
        out.pairs
            .iter()
            .map(|p| (p.label.as_str(), p.value.as_deref()))
            .collect()
    }

    #[test]
    fn test_single_value_rows() {
        let table = TableBlock::new()
            .row("  Campus   Size ", ["200 acres"])
            .row("", ["orphan"])
            .row("Rain", [""]);
        let out = run(&table);

        assert_eq!(
            labels(&out),
            vec![("Campus Size", Some("200 acres")), ("Rain", None)]
        );
        assert_eq!(out.pairs[0].origin.page_class, "admission");
        assert_eq!(out.pairs[0].origin.table, Some(3));
        assert_eq!(out.pairs[0].origin.column, Some(0));
        assert!(out.rejected.is_empty());
    }

    #[test]
    fn test_pivot_selects_marked_column() {
        let table = TableBlock::with_columns(["3.75+", "3.5-4.0", "3.0-3.49"])
            .heading("Factor")
            .row("GPA", ["", "X", ""])
            .row("Interview", ["", "", ""]);
        let out = run(&table);

        assert_eq!(labels(&out), vec![("GPA", Some("3.5-4.0"))]);
        let origin = &out.pairs[0].origin;
        assert_eq!(origin.heading.as_deref(), Some("Factor"));
        assert_eq!(origin.column, Some(1));
        assert_eq!(origin.column_label.as_deref(), Some("3.5-4.0"));
    }

    #[test]
    fn test_pivot_multiple_marks_rejected() {
        let table = TableBlock::with_columns(["Very Important", "Important"])
            .row("Essay", ["X", "X"])
            .row("Rank", ["X", ""]);
        let out = run(&table);

        assert_eq!(labels(&out), vec![("Rank", Some("Very Important"))]);
        assert_eq!(
            out.rejected,
            vec![RejectedRow {
                label: "Essay".to_string(),
                raw_value: Some("Very Important, Important".to_string()),
                reason: AnomalyReason::MultipleMarks,
            }]
        );
    }

    #[test]
    fn test_pivot_unlabeled_mark_rejected() {
        let table = TableBlock::with_columns(["Only"]).row("Essay", ["", "X"]);
        let out = flatten(&table, LayoutVariant::PivotMark, CTX, "X");
        assert!(out.pairs.is_empty());
        assert_eq!(out.rejected[0].reason, AnomalyReason::UnlabeledMark);
    }

    #[test]
    fn test_cross_table_labels() {
        let table = TableBlock::with_columns(["Required", "Recommended"])
            .heading("Subject")
            .row("English", ["4", "4"])
            .row("Foreign Language", ["", "2"]);
        let out = run(&table);

        assert_eq!(
            labels(&out),
            vec![
                ("English - Required", Some("4")),
                ("English - Recommended", Some("4")),
                ("Foreign Language - Recommended", Some("2")),
            ]
        );
        assert_eq!(out.pairs[2].origin.label, "Foreign Language");
        assert_eq!(out.pairs[2].origin.column, Some(1));
    }

    #[test]
    fn test_cross_table_without_column_labels() {
        let table = TableBlock::new()
            .row("Asian", ["12.3 Asian", "4 students"])
            .row("White", ["40.1 White", ""]);
        let out = run(&table);

        assert_eq!(
            labels(&out),
            vec![
                ("Asian", Some("12.3 Asian")),
                ("Asian", Some("4 students")),
                ("White", Some("40.1 White")),
            ]
        );
        assert_eq!(out.pairs[1].origin.column, Some(1));
        assert_eq!(out.pairs[1].origin.column_label, None);
    }
}
