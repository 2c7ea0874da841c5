//! Field normalizer: raw record to canonical, typed, validated fields.

use serde::{Deserialize, Serialize};

use crate::model::{
    Anomaly, AnomalyReason, FieldState, FieldTrace, FieldValue, NormalizedRecord, Number,
    RawEntry, RawRecord,
};

use super::spec::{FieldSpec, FieldSpecTable, RangeCheck};

/// Normalized record of one entity plus the anomalies found on the way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Normalized {
    /// Canonical fields and trace
    pub record: NormalizedRecord,

    /// Extraction, range and duplicate anomalies
    pub anomalies: Vec<Anomaly>,
}

/// Normalize one raw record against a rule table.
///
/// Raw entries are visited in record order. Every entry leaves at least one
/// trace entry, so no raw key disappears without explanation.
pub fn normalize(entity_id: &str, raw: &RawRecord, specs: &FieldSpecTable) -> Normalized {
    let mut out = Normalizer {
        entity_id,
        normalized: Normalized {
            record: NormalizedRecord::new(entity_id),
            anomalies: Vec::new(),
        },
    };

    for entry in raw {
        let matching: Vec<&FieldSpec> = specs.matching(entry).collect();

        if matching.is_empty() {
            let value = match &entry.value {
                Some(text) => FieldValue::Text(text.clone()),
                None => FieldValue::Absent,
            };
            out.store(entry, &entry.key, value, FieldState::PassedThrough);
        } else if matching.iter().any(|s| s.is_deletion()) {
            out.trace(entry, None, FieldState::Deleted);
        } else {
            for spec in matching {
                out.apply(entry, spec);
            }
        }
    }

    let normalized = out.normalized;
    log::debug!(
        "entity {}: {} raw keys -> {} fields, {} anomalies",
        entity_id,
        raw.len(),
        normalized.record.len(),
        normalized.anomalies.len()
    );
    normalized
}

struct Normalizer<'a> {
    entity_id: &'a str,
    normalized: Normalized,
}

impl Normalizer<'_> {
    fn apply(&mut self, entry: &RawEntry, spec: &FieldSpec) {
        let Some(text) = entry.value.as_deref() else {
            self.store(entry, &spec.name, FieldValue::Absent, FieldState::PassedThrough);
            return;
        };
        if spec.extract.is_none() {
            let value = FieldValue::Text(text.to_string());
            self.store(entry, &spec.name, value, FieldState::PassedThrough);
            return;
        }

        let Some(number) = spec.capture(text).and_then(Number::parse) else {
            if self.store(entry, &spec.name, FieldValue::Absent, FieldState::FlaggedExtraction) {
                self.anomaly(&spec.name, entry, AnomalyReason::ExtractionFailed);
            }
            return;
        };

        let value = FieldValue::Numeric(number);
        match spec.check_range(number) {
            RangeCheck::Unchecked => {
                self.store(entry, &spec.name, value, FieldState::Unchecked);
            }
            RangeCheck::Within => {
                self.store(entry, &spec.name, value, FieldState::Validated);
            }
            RangeCheck::Outside(range) => {
                if self.store(entry, &spec.name, value, FieldState::FlaggedRange) {
                    let reason = AnomalyReason::OutOfRange {
                        value: number,
                        min: range.min,
                        max: range.max,
                    };
                    self.anomaly(&spec.name, entry, reason);
                }
            }
        }
    }

    /// Store a field unless its name is taken. Returns `false` on a duplicate.
    ///
    /// The first raw entry to reach a name keeps it, even when its value is
    /// absent after a failed extraction; later entries are duplicates.
    fn store(&mut self, entry: &RawEntry, field: &str, value: FieldValue, state: FieldState) -> bool {
        if self.normalized.record.contains(field) {
            log::warn!(
                "entity {}: field '{}' from '{}' already set, dropping",
                self.entity_id,
                field,
                entry.key
            );
            self.trace(entry, Some(field), FieldState::Duplicate);
            self.anomaly(field, entry, AnomalyReason::DuplicateField);
            return false;
        }
        self.normalized.record.fields.insert(field.to_string(), value);
        self.trace(entry, Some(field), state);
        true
    }

    fn trace(&mut self, entry: &RawEntry, field: Option<&str>, state: FieldState) {
        self.normalized.record.trace.push(FieldTrace {
            raw_key: entry.key.clone(),
            field: field.map(str::to_string),
            state,
        });
    }

    fn anomaly(&mut self, field: &str, entry: &RawEntry, reason: AnomalyReason) {
        self.normalized.anomalies.push(Anomaly::new(
            self.entity_id,
            field,
            entry.value.clone(),
            reason,
        ));
    }
}
