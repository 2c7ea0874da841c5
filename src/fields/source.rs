//! Source matchers: which raw entries a rule applies to.

use regex::Regex;

use crate::model::RawEntry;

/// Selects raw entries for a rule.
#[derive(Debug, Clone)]
pub enum SourceMatcher {
    /// Raw key equals this text
    Key(String),
    /// Raw key matches this pattern
    Pattern(Regex),
    /// Entry origin matches every given part
    Located(Location),
}

/// Structural address of a field: row label plus any narrowing context.
///
/// Unlike a suffixed key, a location does not depend on how many earlier
/// fields shared the label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// Row label (normalized)
    pub label: String,
    /// Page class name
    pub page_class: Option<String>,
    /// Page index in page-class order
    pub page: Option<usize>,
    /// Table index on the page
    pub table: Option<usize>,
    /// Table heading
    pub heading: Option<String>,
    /// Value column index
    pub column: Option<usize>,
    /// Value column label
    pub column_label: Option<String>,
}

impl Location {
    /// Location matching a row label anywhere.
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Check if an entry's origin matches.
    pub fn matches(&self, entry: &RawEntry) -> bool {
        let o = &entry.origin;
        o.label == self.label
            && self.page_class.as_ref().map_or(true, |c| *c == o.page_class)
            && self.page.map_or(true, |p| p == o.page)
            && self.table.map_or(true, |t| Some(t) == o.table)
            && self
                .heading
                .as_ref()
                .map_or(true, |h| Some(h) == o.heading.as_ref())
            && self.column.map_or(true, |c| Some(c) == o.column)
            && self
                .column_label
                .as_ref()
                .map_or(true, |l| Some(l) == o.column_label.as_ref())
    }
}

impl SourceMatcher {
    /// Check if a raw entry is selected.
    pub fn matches(&self, entry: &RawEntry) -> bool {
        match self {
            SourceMatcher::Key(key) => entry.key == *key,
            SourceMatcher::Pattern(re) => re.is_match(&entry.key),
            SourceMatcher::Located(location) => location.matches(entry),
        }
    }
}
