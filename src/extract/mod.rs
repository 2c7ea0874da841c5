//! Extraction: pages of one entity to one raw record.
//!
//! Every table is classified on its own ([`classify`]), flattened into
//! (label, value) pairs ([`flatten`]) and merged in document order into a
//! [`RawRecord`] whose keys stay unique ([`RecordMerger`]).
//!
//! # Example
//!
//! ```
//! use untable::extract::{extract_entity, ExtractOptions};
//! use untable::model::{EntityPages, PageDocument, TableBlock};
//!
//! let entity = EntityPages::new("59").with_page(
//!     PageDocument::new("overview").with_table(
//!         TableBlock::with_columns(["3.75+", "3.5-4.0"])
//!             .row("GPA", ["", "X"]),
//!     ),
//! );
//!
//! let extraction = extract_entity(&entity, &ExtractOptions::default());
//! assert_eq!(extraction.record.value("GPA"), Some("3.5-4.0"));
//! ```

mod classify;
mod flatten;
mod merge;
mod options;
mod stats;

pub use classify::{classify, classify_with_mark, LayoutVariant};
pub use flatten::{flatten, Flattened, RejectedRow, TableContext, CROSS_LABEL_SEPARATOR};
pub use merge::RecordMerger;
pub use options::{ExtractOptions, DEFAULT_MARK, DEFAULT_PLACEHOLDER_HEADING};
pub use stats::ExtractionStats;

use serde::{Deserialize, Serialize};

use crate::model::{
    normalize_label, Anomaly, EntityPages, FieldOrigin, LabeledValue, PageDocument, RawRecord,
};

/// Raw record of one entity plus the structural anomalies found on the way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    /// Entity identifier
    pub entity_id: String,

    /// Merged record
    pub record: RawRecord,

    /// Structural anomalies (rejected rows)
    pub anomalies: Vec<Anomaly>,

    /// Extraction statistics
    pub stats: ExtractionStats,
}

impl Extraction {
    /// Check if no field could be extracted.
    pub fn is_empty(&self) -> bool {
        self.record.is_empty()
    }
}

/// Extract the raw record of an entity.
pub fn extract_entity(entity: &EntityPages, options: &ExtractOptions) -> Extraction {
    extract_pages(&entity.id, &entity.pages, options)
}

/// Extract the raw record from an entity's pages, given in page-class order.
pub fn extract_pages(
    entity_id: &str,
    pages: &[PageDocument],
    options: &ExtractOptions,
) -> Extraction {
    let mut merger = RecordMerger::new(options.collision_marker);
    let mut anomalies = Vec::new();
    let mut stats = ExtractionStats::new();

    for (index, page) in pages.iter().enumerate() {
        stats.page_count += 1;
        if options.is_placeholder(page.headline.as_deref()) {
            log::debug!("entity {}: page {} is a placeholder", entity_id, index);
            stats.placeholder_pages += 1;
            continue;
        }

        if index == 0 {
            for pair in page_text(page, options) {
                stats.pair_count += 1;
                merger.push(pair);
            }
        }

        for (table_index, table) in page.tables.iter().enumerate() {
            let layout = classify_with_mark(table, &options.mark);
            stats.add_table(layout);
            log::debug!(
                "entity {}: page {} table {} is {} ({} rows)",
                entity_id,
                index,
                table_index,
                layout,
                table.row_count()
            );

            let ctx = TableContext {
                page: index,
                page_class: &page.class,
                table: table_index,
            };
            let Flattened { pairs, rejected } = flatten(table, layout, ctx, &options.mark);

            stats.pair_count += pairs.len() as u32;
            stats.rejected_rows += rejected.len() as u32;
            anomalies.extend(
                rejected
                    .into_iter()
                    .map(|r| Anomaly::new(entity_id, r.label, r.raw_value, r.reason)),
            );
            merger.extend(pairs);
        }
    }

    stats.collision_count = merger.collisions() as u32;
    let record = merger.finish();
    if record.is_empty() {
        log::warn!("entity {}: no extractable data", entity_id);
    }

    Extraction {
        entity_id: entity_id.to_string(),
        record,
        anomalies,
        stats,
    }
}

/// Headline and summary of a page as pairs, under the configured labels.
fn page_text(page: &PageDocument, options: &ExtractOptions) -> Vec<LabeledValue> {
    let candidates = [
        (options.headline_label.as_deref(), page.headline.as_deref().map(normalize_label)),
        (options.summary_label.as_deref(), page.summary.as_deref().map(|s| s.trim().to_string())),
    ];

    candidates
        .into_iter()
        .filter_map(|(label, text)| {
            let label = label?;
            let text = text.filter(|t| !t.is_empty())?;
            let origin = FieldOrigin {
                page: 0,
                page_class: page.class.clone(),
                label: label.to_string(),
                ..FieldOrigin::default()
            };
            Some(LabeledValue::new(label, Some(text), origin))
        })
        .collect()
}
