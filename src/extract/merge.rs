//! Label resolution: merge flattened pairs into one collision-free record.

use crate::model::{LabeledValue, RawRecord};

/// Accumulates pairs of one entity, in document order, into a [`RawRecord`].
///
/// A label seen before is a collision: the site reuses visible labels for
/// different fields. The later pair is stored under the label followed by
/// the collision marker, repeated until the key is free. Earlier pairs are
/// never overwritten.
#[derive(Debug, Clone)]
pub struct RecordMerger {
    record: RawRecord,
    marker: char,
    collisions: usize,
}

impl RecordMerger {
    /// Create a merger using `marker` for collisions.
    pub fn new(marker: char) -> Self {
        Self {
            record: RawRecord::new(),
            marker,
            collisions: 0,
        }
    }

    /// Insert one pair and return the key it was stored under.
    pub fn push(&mut self, pair: LabeledValue) -> String {
        let LabeledValue {
            label,
            value,
            origin,
        } = pair;
        let key = self
            .record
            .insert_resolving(label.as_str(), value, origin, self.marker);
        if key != label {
            self.collisions += 1;
            log::debug!("label '{}' collided, stored as '{}'", label, key);
        }
        key
    }

    /// Insert pairs in order.
    pub fn extend(&mut self, pairs: impl IntoIterator<Item = LabeledValue>) {
        for pair in pairs {
            self.push(pair);
        }
    }

    /// Number of pairs stored under a suffixed key so far.
    pub fn collisions(&self) -> usize {
        self.collisions
    }

    /// Number of fields so far.
    pub fn len(&self) -> usize {
        self.record.len()
    }

    /// Check if nothing has been merged yet.
    pub fn is_empty(&self) -> bool {
        self.record.is_empty()
    }

    /// Finish and return the record.
    pub fn finish(self) -> RawRecord {
        self.record
    }
}

impl Default for RecordMerger {
    fn default() -> Self {
        Self::new(crate::model::DEFAULT_COLLISION_MARKER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldOrigin;

    fn pair(label: &str, value: &str, table: usize) -> LabeledValue {
        LabeledValue::new(
            label,
            Some(value.to_string()),
            FieldOrigin {
                table: Some(table),
                label: label.to_string(),
                ..FieldOrigin::default()
            },
        )
    }

    #[test]
    fn test_collision_keeps_first() {
        let mut merger = RecordMerger::default();
        assert_eq!(merger.push(pair("Women", "40", 0)), "Women");
        assert_eq!(merger.push(pair("Women", "55", 1)), "Women*");
        assert_eq!(merger.collisions(), 1);

        let record = merger.finish();
        assert_eq!(record.value("Women"), Some("40"));
        assert_eq!(record.value("Women*"), Some("55"));
        assert_eq!(record.get("Women*").unwrap().origin.table, Some(1));
        assert_eq!(record.get("Women*").unwrap().origin.label, "Women");
    }

    #[test]
    fn test_collision_is_deterministic() {
        let pairs = vec![
            pair("Men", "1", 0),
            pair("Men", "2", 1),
            pair("Men*", "3", 2),
            pair("Men", "4", 3),
        ];
        let build = || {
            let mut merger = RecordMerger::new('*');
            merger.extend(pairs.clone());
            merger.finish()
        };

        let first = build();
        assert_eq!(
            first.keys().collect::<Vec<_>>(),
            vec!["Men", "Men*", "Men**", "Men***"]
        );
        assert_eq!(first.value("Men**"), Some("3"));
        assert_eq!(first, build());
    }

    #[test]
    fn test_custom_marker() {
        let mut merger = RecordMerger::new('#');
        merger.extend([pair("A", "1", 0), pair("A", "2", 0)]);
        assert!(merger.finish().contains_key("A#"));
    }
}
