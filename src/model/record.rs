//! Raw per-entity records.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Marker appended to a colliding label until the key is unique.
pub const DEFAULT_COLLISION_MARKER: char = '*';

/// Where a raw field came from.
///
/// The key of a [`RawEntry`] depends on how many earlier fields shared its
/// label; the origin does not, so rules can address a field by it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldOrigin {
    /// Page index in page-class order (0-based)
    pub page: usize,

    /// Page class name
    #[serde(default)]
    pub page_class: String,

    /// Table index on the page (0-based); `None` for page headline/summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<usize>,

    /// Table heading (header cell above the label column)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,

    /// Value column index (0-based) for cell-level fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,

    /// Label of that value column, when it has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_label: Option<String>,

    /// Row label (or the page-text label for headline/summary fields)
    pub label: String,
}

impl FieldOrigin {
    /// Origin for a field that was not read from a page.
    pub fn detached(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }
}

/// A flattened (label, value) pair, before key resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledValue {
    /// Visible label
    pub label: String,

    /// Cell text; `None` when the cell was blank
    pub value: Option<String>,

    /// Structural origin
    pub origin: FieldOrigin,
}

impl LabeledValue {
    /// Create a new pair.
    pub fn new(label: impl Into<String>, value: Option<String>, origin: FieldOrigin) -> Self {
        Self {
            label: label.into(),
            value,
            origin,
        }
    }
}

/// One field of a [`RawRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    /// Unique key within the record
    pub key: String,

    /// Field text; `None` when not reported
    pub value: Option<String>,

    /// Structural origin
    pub origin: FieldOrigin,
}

/// Insertion-ordered field map of one entity with unique keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<RawEntry>", into = "Vec<RawEntry>")]
pub struct RawRecord {
    entries: Vec<RawEntry>,
    index: HashMap<String, usize>,
}

impl RawRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from plain key/value pairs.
    ///
    /// Repeated keys are disambiguated with [`DEFAULT_COLLISION_MARKER`].
    pub fn from_values<K, V, I>(values: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, Option<V>)>,
    {
        let mut record = Self::new();
        for (key, value) in values {
            let key = key.into();
            let origin = FieldOrigin::detached(key.clone());
            record.insert_resolving(key, value.map(Into::into), origin, DEFAULT_COLLISION_MARKER);
        }
        record
    }

    /// Insert an entry under its key if that key is free.
    ///
    /// Returns the entry back when the key is taken.
    pub fn try_insert(&mut self, entry: RawEntry) -> std::result::Result<(), RawEntry> {
        if self.index.contains_key(&entry.key) {
            return Err(entry);
        }
        self.index.insert(entry.key.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    /// First free key for `label`: the label itself, or the label followed
    /// by as many `marker`s as needed.
    pub fn free_key(&self, label: &str, marker: char) -> String {
        let mut key = label.to_string();
        while self.index.contains_key(&key) {
            key.push(marker);
        }
        key
    }

    /// Insert under the first free key for `label` and return that key.
    pub fn insert_resolving(
        &mut self,
        label: impl Into<String>,
        value: Option<String>,
        origin: FieldOrigin,
        marker: char,
    ) -> String {
        let key = self.free_key(&label.into(), marker);
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push(RawEntry {
            key: key.clone(),
            value,
            origin,
        });
        key
    }

    /// Get an entry by key.
    pub fn get(&self, key: &str) -> Option<&RawEntry> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    /// Get the value under `key`; `None` when absent or null.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|e| e.value.as_deref())
    }

    /// Check if a key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, RawEntry> {
        self.entries.iter()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<RawEntry>> for RawRecord {
    fn from(entries: Vec<RawEntry>) -> Self {
        let mut record = Self::new();
        for entry in entries {
            let RawEntry { key, value, origin } = entry;
            record.insert_resolving(key, value, origin, DEFAULT_COLLISION_MARKER);
        }
        record
    }
}

impl From<RawRecord> for Vec<RawEntry> {
    fn from(record: RawRecord) -> Self {
        record.entries
    }
}

impl<'a> IntoIterator for &'a RawRecord {
    type Item = &'a RawEntry;
    type IntoIter = std::slice::Iter<'a, RawEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
