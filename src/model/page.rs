//! Page-level types.

use super::TableBlock;
use serde::{Deserialize, Serialize};

/// One fetched page of an entity, reduced to what the pipeline reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageDocument {
    /// Page class name (e.g. "overview", "admission")
    #[serde(default)]
    pub class: String,

    /// Page headline (the `<h1>` text)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,

    /// Summary paragraph
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Tables in document order
    #[serde(default)]
    pub tables: Vec<TableBlock>,
}

impl PageDocument {
    /// Create an empty page of the given class.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            ..Self::default()
        }
    }

    /// Set the headline and return self.
    pub fn with_headline(mut self, headline: impl Into<String>) -> Self {
        self.headline = Some(headline.into());
        self
    }

    /// Set the summary and return self.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Append a table and return self.
    pub fn with_table(mut self, table: TableBlock) -> Self {
        self.tables.push(table);
        self
    }

    /// Add a table to the page.
    pub fn add_table(&mut self, table: TableBlock) {
        self.tables.push(table);
    }

    /// Get the number of tables on the page.
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Check if the page carries nothing the pipeline can read.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.headline.is_none() && self.summary.is_none()
    }
}

/// All pages of one entity, in page-class order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityPages {
    /// Stable entity identifier
    pub id: String,

    /// Pages, one per page class
    pub pages: Vec<PageDocument>,
}

impl EntityPages {
    /// Create an entity with no pages.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            pages: Vec::new(),
        }
    }

    /// Append a page and return self.
    pub fn with_page(mut self, page: PageDocument) -> Self {
        self.pages.push(page);
        self
    }

    /// Total number of tables across all pages.
    pub fn table_count(&self) -> usize {
        self.pages.iter().map(PageDocument::table_count).sum()
    }
}
