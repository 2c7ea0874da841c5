//! HTML reading options.

/// Cell texts read as null by default.
pub const DEFAULT_NULL_MARKERS: [&str; 2] = ["Not reported", "Not Reported"];

/// Options for reading HTML pages.
///
/// Cells matching a null marker are read as no value before any rule runs.
/// With the default markers, a "Not reported" cell therefore normalizes to an
/// absent field without an `extraction failed` anomaly.
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    /// CSS selector limiting where tables and the summary are read from
    /// (the headline is always read from the whole page)
    pub scope: Option<String>,

    /// Cell texts that mean "no value"
    pub null_markers: Vec<String>,

    /// Whether to honor `colspan` (header labels repeat, body values pad
    /// with empty cells)
    pub expand_colspan: bool,

    /// Whether to keep tables without body rows
    pub keep_empty_tables: bool,
}

impl HtmlOptions {
    /// Create new HTML options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only read tables inside elements matching `selector`.
    pub fn with_scope(mut self, selector: impl Into<String>) -> Self {
        self.scope = Some(selector.into());
        self
    }

    /// Add a cell text read as null.
    pub fn with_null_marker(mut self, marker: impl Into<String>) -> Self {
        self.null_markers.push(marker.into());
        self
    }

    /// Replace the null markers.
    pub fn with_null_markers<S: Into<String>>(mut self, markers: impl IntoIterator<Item = S>) -> Self {
        self.null_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable `colspan` expansion.
    pub fn with_colspan(mut self, expand: bool) -> Self {
        self.expand_colspan = expand;
        self
    }

    /// Keep tables that have a header but no body rows.
    pub fn keep_empty_tables(mut self) -> Self {
        self.keep_empty_tables = true;
        self
    }

    /// Check if a trimmed cell text is a null marker.
    pub fn is_null_marker(&self, text: &str) -> bool {
        self.null_markers.iter().any(|m| m == text)
    }
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            scope: None,
            null_markers: DEFAULT_NULL_MARKERS.iter().map(|m| m.to_string()).collect(),
            expand_colspan: true,
            keep_empty_tables: false,
        }
    }
}
