//! End-to-end processing: pages of an entity to a normalized report.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::extract::{extract_entity, ExtractOptions, ExtractionStats};
use crate::fields::{normalize, FieldSpecTable};
use crate::model::{Anomaly, EntityPages, NormalizedRecord, RawRecord};

/// Everything produced for one entity with data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityReport {
    /// Entity identifier
    pub entity_id: String,

    /// Merged raw record
    pub raw: RawRecord,

    /// Normalized record
    pub normalized: NormalizedRecord,

    /// Structural anomalies first, then normalization anomalies
    pub anomalies: Vec<Anomaly>,

    /// Extraction statistics
    pub stats: ExtractionStats,
}

/// Result of processing one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EntityOutcome {
    /// At least one field was extracted
    Record(EntityReport),

    /// Nothing could be extracted (placeholder or table-less pages)
    NoData {
        /// Entity identifier
        entity_id: String,
        /// Structural anomalies found before giving up
        anomalies: Vec<Anomaly>,
    },
}

impl EntityOutcome {
    /// Entity identifier.
    pub fn entity_id(&self) -> &str {
        match self {
            EntityOutcome::Record(report) => &report.entity_id,
            EntityOutcome::NoData { entity_id, .. } => entity_id,
        }
    }

    /// The report, if the entity had data.
    pub fn report(&self) -> Option<&EntityReport> {
        match self {
            EntityOutcome::Record(report) => Some(report),
            EntityOutcome::NoData { .. } => None,
        }
    }

    /// Every anomaly recorded for the entity.
    pub fn anomalies(&self) -> &[Anomaly] {
        match self {
            EntityOutcome::Record(report) => &report.anomalies,
            EntityOutcome::NoData { anomalies, .. } => anomalies,
        }
    }

    /// Check if this is a no-data outcome.
    pub fn is_no_data(&self) -> bool {
        matches!(self, EntityOutcome::NoData { .. })
    }
}

/// Extract and normalize one entity.
pub fn process_entity(
    entity: &EntityPages,
    specs: &FieldSpecTable,
    options: &ExtractOptions,
) -> EntityOutcome {
    let extraction = extract_entity(entity, options);
    if extraction.is_empty() {
        log::debug!("entity {}: no data", entity.id);
        return EntityOutcome::NoData {
            entity_id: extraction.entity_id,
            anomalies: extraction.anomalies,
        };
    }

    let normalized = normalize(&extraction.entity_id, &extraction.record, specs);
    let mut anomalies = extraction.anomalies;
    anomalies.extend(normalized.anomalies);

    EntityOutcome::Record(EntityReport {
        entity_id: extraction.entity_id,
        raw: extraction.record,
        normalized: normalized.record,
        anomalies,
        stats: extraction.stats,
    })
}

/// Process many entities, in parallel unless the options say otherwise.
///
/// Outcomes come back in input order.
pub fn process_entities(
    entities: &[EntityPages],
    specs: &FieldSpecTable,
    options: &ExtractOptions,
) -> Vec<EntityOutcome> {
    process_entities_with(entities, specs, options, |_| {})
}

/// Like [`process_entities`], calling `on_done` as each entity finishes.
///
/// With parallel processing `on_done` runs on worker threads, in completion
/// order.
pub fn process_entities_with<F>(
    entities: &[EntityPages],
    specs: &FieldSpecTable,
    options: &ExtractOptions,
    on_done: F,
) -> Vec<EntityOutcome>
where
    F: Fn(&EntityOutcome) + Sync,
{
    let run = |entity: &EntityPages| {
        let outcome = process_entity(entity, specs, options);
        on_done(&outcome);
        outcome
    };

    if options.parallel {
        entities.par_iter().map(run).collect()
    } else {
        entities.iter().map(run).collect()
    }
}
