//! Extraction options and configuration.

use crate::model::DEFAULT_COLLISION_MARKER;

/// Cell text that marks the selected column of a pivot table.
pub const DEFAULT_MARK: &str = "X";

/// Headline that the site serves in place of a missing entity.
pub const DEFAULT_PLACEHOLDER_HEADING: &str = "Retrieve a Saved Search";

/// Options for turning an entity's pages into a raw record.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Cell text marking the selected column in a pivot table
    pub mark: String,

    /// Character appended to a colliding label until its key is unique
    pub collision_marker: char,

    /// Record key for the first page's headline (`None` = skip it)
    pub headline_label: Option<String>,

    /// Record key for the first page's summary paragraph (`None` = skip it)
    pub summary_label: Option<String>,

    /// Headlines of pages that stand in for a missing entity; such pages
    /// contribute nothing
    pub placeholder_headings: Vec<String>,

    /// Whether to process entities in parallel
    pub parallel: bool,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pivot mark.
    pub fn with_mark(mut self, mark: impl Into<String>) -> Self {
        self.mark = mark.into();
        self
    }

    /// Set the collision marker.
    pub fn with_collision_marker(mut self, marker: char) -> Self {
        self.collision_marker = marker;
        self
    }

    /// Set the key for the headline field (`None` disables it).
    pub fn with_headline_label(mut self, label: Option<&str>) -> Self {
        self.headline_label = label.map(str::to_string);
        self
    }

    /// Set the key for the summary field (`None` disables it).
    pub fn with_summary_label(mut self, label: Option<&str>) -> Self {
        self.summary_label = label.map(str::to_string);
        self
    }

    /// Read tables only: no headline or summary fields.
    pub fn tables_only(mut self) -> Self {
        self.headline_label = None;
        self.summary_label = None;
        self
    }

    /// Add a placeholder headline.
    pub fn with_placeholder_heading(mut self, heading: impl Into<String>) -> Self {
        self.placeholder_headings.push(heading.into());
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Check if a page headline marks a placeholder page.
    pub fn is_placeholder(&self, headline: Option<&str>) -> bool {
        headline
            .map(str::trim)
            .is_some_and(|h| self.placeholder_headings.iter().any(|p| p == h))
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            mark: DEFAULT_MARK.to_string(),
            collision_marker: DEFAULT_COLLISION_MARKER,
            headline_label: Some("Name".to_string()),
            summary_label: Some("Desc".to_string()),
            placeholder_headings: vec![DEFAULT_PLACEHOLDER_HEADING.to_string()],
            parallel: true,
        }
    }
}
