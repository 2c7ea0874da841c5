//! # untable
//!
//! Turns semi-structured HTML tables into flat, validated records.
//!
//! Every entity (a school, a company, ...) is described by a handful of
//! pages full of inconsistently labeled tables. `untable` reads them in two
//! stages:
//!
//! 1. **Extraction**: each table is classified by its cell pattern
//!    (single-value rows, pivot marks, cross tables), flattened into
//!    (label, value) pairs and merged into one [`RawRecord`] whose keys stay
//!    unique.
//! 2. **Normalization**: a declarative [`FieldSpecTable`] renames raw keys
//!    to canonical fields, extracts numbers with regular expressions and
//!    checks them against ranges. Failures become [`Anomaly`] values next to
//!    the record instead of errors.
//!
//! ## Quick Start
//!
//! ```
//! use untable::{EntityPages, FieldSpecTable, PageDocument, TableBlock, Untable};
//!
//! let rules = FieldSpecTable::from_json(r#"{
//!     "fields": [{ "name": "Women pct", "sources": ["Women"],
//!                  "extract": "(\\d+)%", "range": { "min": 0, "max": 100 } }]
//! }"#)?;
//!
//! let entity = EntityPages::new("59").with_page(
//!     PageDocument::new("overview").with_table(TableBlock::new().row("Women", ["55%"])),
//! );
//!
//! let outcome = Untable::new().with_rules(rules).process(&entity);
//! let report = outcome.report().unwrap();
//! assert_eq!(report.normalized.number("Women pct").unwrap().as_f64(), 55.0);
//! # Ok::<(), untable::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Layout sniffing**: one explicit classifier per table
//! - **Collision-free merging**: repeated labels get a `*` suffix, and every
//!   field keeps its structural origin
//! - **Declarative rules**: JSON rule tables, validated at load time
//! - **Parallel processing**: Uses Rayon across entities
//! - **HTML reading** (`html` feature): `scraper`-based page reader

pub mod error;
pub mod extract;
pub mod fields;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod render;

// Re-export commonly used types
pub use error::{Error, Result};
pub use extract::{
    classify, extract_entity, ExtractOptions, Extraction, ExtractionStats, LayoutVariant,
};
pub use fields::{normalize, FieldSpec, FieldSpecTable, Normalized};
pub use model::{
    Anomaly, AnomalyReason, EntityPages, FieldOrigin, FieldState, FieldValue, NormalizedRecord,
    Number, PageDocument, RawRecord, TableBlock, TableRow,
};
pub use parser::HtmlOptions;
#[cfg(feature = "html")]
pub use parser::{read_page, HtmlReader};
pub use pipeline::{process_entities, process_entity, EntityOutcome, EntityReport};
pub use render::JsonFormat;

use std::path::Path;

/// Classify every table of an HTML page.
///
/// # Example
///
/// ```
/// use untable::{classify_html, LayoutVariant};
///
/// let html = "<table><tr><td>Women</td><td>55</td></tr></table>";
/// assert_eq!(classify_html(html)?, vec![LayoutVariant::SingleValueRow]);
/// # Ok::<(), untable::Error>(())
/// ```
#[cfg(feature = "html")]
pub fn classify_html(html: &str) -> Result<Vec<LayoutVariant>> {
    let page = read_page(html, "page", &HtmlOptions::default())?;
    Ok(page.tables.iter().map(classify).collect())
}

/// Load a rule table from a JSON file.
///
/// Shorthand for [`FieldSpecTable::from_path`].
pub fn load_rules<P: AsRef<Path>>(path: P) -> Result<FieldSpecTable> {
    FieldSpecTable::from_path(path)
}

/// Builder for reading and processing entities.
///
/// # Example
///
/// ```
/// use untable::Untable;
///
/// let untable = Untable::new()
///     .with_mark("✓")
///     .with_scope("#tabcontwrap")
///     .sequential();
/// # let _ = untable;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Untable {
    extract_options: ExtractOptions,
    html_options: HtmlOptions,
    rules: FieldSpecTable,
}

impl Untable {
    /// Create a new builder with no rules: every field passes through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rule table.
    pub fn with_rules(mut self, rules: FieldSpecTable) -> Self {
        self.rules = rules;
        self
    }

    /// Set the pivot mark (default `"X"`).
    pub fn with_mark(mut self, mark: impl Into<String>) -> Self {
        self.extract_options = self.extract_options.with_mark(mark);
        self
    }

    /// Set the collision marker (default `'*'`).
    pub fn with_collision_marker(mut self, marker: char) -> Self {
        self.extract_options = self.extract_options.with_collision_marker(marker);
        self
    }

    /// Skip the first page's headline and summary.
    pub fn tables_only(mut self) -> Self {
        self.extract_options = self.extract_options.tables_only();
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.extract_options = self.extract_options.sequential();
        self
    }

    /// Only read tables inside elements matching a CSS selector.
    pub fn with_scope(mut self, selector: impl Into<String>) -> Self {
        self.html_options = self.html_options.with_scope(selector);
        self
    }

    /// Replace the extraction options.
    pub fn with_extract_options(mut self, options: ExtractOptions) -> Self {
        self.extract_options = options;
        self
    }

    /// Replace the HTML options.
    pub fn with_html_options(mut self, options: HtmlOptions) -> Self {
        self.html_options = options;
        self
    }

    /// Get the rule table.
    pub fn rules(&self) -> &FieldSpecTable {
        &self.rules
    }

    /// Get the extraction options.
    pub fn extract_options(&self) -> &ExtractOptions {
        &self.extract_options
    }

    /// Read an entity from `(page class, html)` pairs in page-class order.
    #[cfg(feature = "html")]
    pub fn read_entity<'a, I>(&self, entity_id: impl Into<String>, pages: I) -> Result<EntityPages>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let reader = HtmlReader::new(self.html_options.clone())?;
        let mut entity = EntityPages::new(entity_id);
        for (class, html) in pages {
            entity.pages.push(reader.read(html, class));
        }
        Ok(entity)
    }

    /// Extract and normalize one entity.
    pub fn process(&self, entity: &EntityPages) -> EntityOutcome {
        process_entity(entity, &self.rules, &self.extract_options)
    }

    /// Extract and normalize many entities.
    pub fn process_all(&self, entities: &[EntityPages]) -> Vec<EntityOutcome> {
        process_entities(entities, &self.rules, &self.extract_options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untable_builder() {
        let untable = Untable::new()
            .with_mark("Y")
            .with_collision_marker('#')
            .tables_only()
            .sequential();

        assert_eq!(untable.extract_options.mark, "Y");
        assert_eq!(untable.extract_options.collision_marker, '#');
        assert!(untable.extract_options.headline_label.is_none());
        assert!(!untable.extract_options.parallel);
        assert!(untable.rules().is_empty());
    }

    #[test]
    fn test_untable_builder_default() {
        let untable = Untable::default();
        assert_eq!(untable.extract_options.mark, "X");
        assert!(untable.extract_options.parallel);
        assert!(untable.html_options.scope.is_none());
    }

    #[test]
    fn test_process_without_rules_passes_through() {
        let entity = EntityPages::new("1")
            .with_page(PageDocument::new("overview").with_table(TableBlock::new().row("City", ["Boston"])));
        let outcome = Untable::new().process(&entity);
        let report = outcome.report().unwrap();
        assert_eq!(report.normalized.text("City"), Some("Boston"));
    }

    #[test]
    fn test_process_all_with_options() {
        let options = ExtractOptions::new()
            .with_headline_label(Some("School"))
            .with_parallel(false);
        let untable = Untable::new()
            .with_extract_options(options)
            .with_html_options(HtmlOptions::new().with_null_marker("n/a"));
        assert!(untable.html_options.is_null_marker("n/a"));

        let entities = vec![
            EntityPages::new("1").with_page(
                PageDocument::new("overview")
                    .with_headline("Alpha College")
                    .with_table(TableBlock::new().row("City", ["Boston"])),
            ),
            EntityPages::new("2"),
        ];
        let outcomes = untable.process_all(&entities);

        assert_eq!(outcomes.len(), 2);
        let report = outcomes[0].report().unwrap();
        assert_eq!(report.normalized.text("School"), Some("Alpha College"));
        assert!(outcomes[1].is_no_data());
    }

    #[cfg(feature = "html")]
    #[test]
    fn test_read_entity() {
        let untable = Untable::new().with_scope("#main");
        let entity = untable
            .read_entity(
                "59",
                [
                    ("overview", "<h1>Example</h1><div id=\"main\"><table><tr><td>City</td><td>Boston</td></tr></table></div>"),
                    ("admission", "<div id=\"main\"><table><tr><td>GPA</td><td>3.9</td></tr></table></div>"),
                ],
            )
            .unwrap();
        assert_eq!(entity.pages.len(), 2);
        assert_eq!(entity.table_count(), 2);
        assert_eq!(entity.pages[0].headline.as_deref(), Some("Example"));
    }

    #[cfg(feature = "html")]
    #[test]
    fn test_read_entity_bad_scope() {
        let result = Untable::new().with_scope("[").read_entity("1", [("overview", "")]);
        assert!(matches!(result, Err(Error::Selector(_))));
    }

    #[test]
    fn test_load_rules_missing_file() {
        let result = load_rules("does/not/exist.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
