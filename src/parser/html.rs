//! HTML page reader built on `scraper`.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::error::{Error, Result};
use crate::model::{normalize_label, PageDocument, TableBlock, TableRow};

use super::options::HtmlOptions;

// Constant selectors; parsing them cannot fail.
static TABLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("table").unwrap());
static TR_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static H1_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());
static P_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

/// Reads already-fetched HTML pages into [`PageDocument`]s.
///
/// Build once and reuse: the scope selector is compiled up front.
#[derive(Debug, Clone)]
pub struct HtmlReader {
    options: HtmlOptions,
    scope: Option<Selector>,
}

impl HtmlReader {
    /// Create a reader, compiling the scope selector.
    pub fn new(options: HtmlOptions) -> Result<Self> {
        let scope = match &options.scope {
            Some(css) => Some(
                Selector::parse(css).map_err(|e| Error::Selector(format!("{}: {}", css, e)))?,
            ),
            None => None,
        };
        Ok(Self { options, scope })
    }

    /// Get the reader options.
    pub fn options(&self) -> &HtmlOptions {
        &self.options
    }

    /// Read one page of the given page class.
    pub fn read(&self, html: &str, class: &str) -> PageDocument {
        let document = Html::parse_document(html);
        let root = document.root_element();
        let scopes: Vec<ElementRef<'_>> = match &self.scope {
            Some(selector) => document.select(selector).collect(),
            None => vec![root],
        };

        let mut page = PageDocument::new(class);
        page.headline = root
            .select(&H1_SELECTOR)
            .next()
            .map(text_of)
            .filter(|t| !t.is_empty());
        page.summary = scopes
            .iter()
            .flat_map(|s| s.select(&P_SELECTOR))
            .map(text_of)
            .find(|t| !t.is_empty());

        for scope in &scopes {
            for table in scope.select(&TABLE_SELECTOR) {
                let block = self.read_table(table);
                if block.is_empty() && !self.options.keep_empty_tables {
                    log::debug!("{}: skipping table without body rows", class);
                    continue;
                }
                page.add_table(block);
            }
        }

        if self.scope.is_some() && scopes.is_empty() {
            log::warn!("{}: scope selector matched nothing", class);
        }
        page
    }

    fn read_table(&self, table: ElementRef<'_>) -> TableBlock {
        let rows: Vec<ElementRef<'_>> = table
            .select(&TR_SELECTOR)
            .filter(|tr| owning_table(*tr).map(|t| t.id()) == Some(table.id()))
            .collect();
        let has_thead = rows.iter().any(|tr| in_thead(*tr, table));

        let mut block = TableBlock::new();
        for (index, tr) in rows.into_iter().enumerate() {
            let cells = row_cells(tr);
            if cells.is_empty() {
                continue;
            }

            let is_header = if has_thead {
                in_thead(tr, table)
            } else {
                index == 0 && cells.iter().all(|c| c.value().name() == "th")
            };

            let (first, rest) = cells.split_at(1);
            let label = text_of(first[0]);
            if is_header {
                block.heading = Some(label).filter(|l| !l.is_empty());
                block.columns = self.header_labels(rest);
                continue;
            }

            // Label-only rows are section dividers.
            let label = Some(label).filter(|l| !l.is_empty() && !self.options.is_null_marker(l));
            if label.is_none() || rest.is_empty() {
                continue;
            }
            block.add_row(TableRow::new(label, self.body_values(rest)));
        }
        block
    }

    /// Column labels of a header row, repeated over their `colspan`.
    fn header_labels(&self, cells: &[ElementRef<'_>]) -> Vec<String> {
        cells
            .iter()
            .flat_map(|cell| std::iter::repeat(text_of(*cell)).take(self.span(*cell)))
            .collect()
    }

    /// Values of a body row. A spanning cell keeps its value in the first
    /// column it covers; the other columns are empty.
    fn body_values(&self, cells: &[ElementRef<'_>]) -> Vec<Option<String>> {
        let mut values = Vec::with_capacity(cells.len());
        for cell in cells {
            let text = text_of(*cell);
            if text.is_empty() || self.options.is_null_marker(&text) {
                values.push(None);
            } else {
                values.push(Some(text));
            }
            values.extend(std::iter::repeat(None).take(self.span(*cell) - 1));
        }
        values
    }

    fn span(&self, cell: ElementRef<'_>) -> usize {
        if self.options.expand_colspan {
            colspan(cell)
        } else {
            1
        }
    }
}

/// Read one page with the given options.
pub fn read_page(html: &str, class: &str, options: &HtmlOptions) -> Result<PageDocument> {
    Ok(HtmlReader::new(options.clone())?.read(html, class))
}

fn text_of(element: ElementRef<'_>) -> String {
    normalize_label(&element.text().collect::<String>())
}

fn row_cells(tr: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    tr.children()
        .filter_map(ElementRef::wrap)
        .filter(|e| matches!(e.value().name(), "td" | "th"))
        .collect()
}

fn owning_table(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == "table")
}

fn in_thead(tr: ElementRef<'_>, table: ElementRef<'_>) -> bool {
    tr.ancestors()
        .filter_map(ElementRef::wrap)
        .take_while(|e| e.id() != table.id())
        .any(|e| e.value().name() == "thead")
}

fn colspan(cell: ElementRef<'_>) -> usize {
    cell.value()
        .attr("colspan")
        .and_then(|s| s.trim().parse::<usize>().ok())
        .unwrap_or(1)
        .clamp(1, 64)
}
