//! Normalized record types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A number extracted from field text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    /// Text without a decimal point
    Int(i64),
    /// Text with a decimal point
    Float(f64),
}

impl Number {
    /// Parse captured text: float when it contains a decimal point,
    /// integer otherwise. A `,` is read as a thousands separator only when
    /// it follows a digit and precedes exactly three digits, so a decimal
    /// comma such as `12,5` does not parse.
    pub fn parse(text: &str) -> Option<Self> {
        let text = strip_thousands(text.trim());
        if text.contains('.') {
            text.parse::<f64>().ok().filter(|v| v.is_finite()).map(Number::Float)
        } else {
            text.parse::<i64>().ok().map(Number::Int)
        }
    }

    /// Value as `f64`.
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(v) => v as f64,
            Number::Float(v) => v,
        }
    }
}

fn strip_thousands(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    for (i, c) in chars.iter().enumerate() {
        if *c == ',' {
            let after_digit = i > 0 && chars[i - 1].is_ascii_digit();
            let group = chars.get(i + 1..i + 4).is_some_and(|g| g.iter().all(char::is_ascii_digit));
            let group_ends = chars.get(i + 4).map_or(true, |n| !n.is_ascii_digit());
            if after_digit && group && group_ends {
                continue;
            }
        }
        out.push(*c);
    }
    out
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(v) => write!(f, "{}", v),
            Number::Float(v) => write!(f, "{}", v),
        }
    }
}

/// Value of a normalized field.
///
/// Serializes as a bare JSON number, string or `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Extracted number
    Numeric(Number),
    /// Free text (passed through, or renamed without extraction)
    Text(String),
    /// Explicitly absent: not reported, or extraction failed
    Absent,
}

impl FieldValue {
    /// The number, if this is a numeric value.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            FieldValue::Numeric(n) => Some(*n),
            _ => None,
        }
    }

    /// The text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Check if the value is explicitly absent.
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }
}

/// Terminal state a raw field reached during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldState {
    /// Renamed to the deletion marker and dropped
    Deleted,
    /// Extracted and inside its declared range
    Validated,
    /// Extracted, no range declared
    Unchecked,
    /// Extracted, outside its declared range (kept, flagged)
    FlaggedRange,
    /// Extraction pattern did not match (stored as absent, flagged)
    FlaggedExtraction,
    /// No extraction applied: unmatched key, rule without pattern, or null value
    PassedThrough,
    /// Canonical name already taken by an earlier field (dropped, flagged)
    Duplicate,
}

/// What happened to one raw key for one canonical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldTrace {
    /// Key in the raw record
    pub raw_key: String,

    /// Canonical field name; `None` for deletions
    pub field: Option<String>,

    /// Terminal state
    pub state: FieldState,
}

/// Canonical, typed fields of one entity plus the trace explaining every
/// raw key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// Entity identifier
    pub entity_id: String,

    /// Canonical field values
    pub fields: BTreeMap<String, FieldValue>,

    /// One entry per (raw key, produced field)
    pub trace: Vec<FieldTrace>,
}

impl NormalizedRecord {
    /// Create an empty record for an entity.
    pub fn new(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            ..Self::default()
        }
    }

    /// Get a field value.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Get a numeric field.
    pub fn number(&self, field: &str) -> Option<Number> {
        self.get(field).and_then(FieldValue::as_number)
    }

    /// Get a text field.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    /// Check if a field is present.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Trace entries for one raw key.
    pub fn trace_of<'a>(&'a self, raw_key: &'a str) -> impl Iterator<Item = &'a FieldTrace> {
        self.trace.iter().filter(move |t| t.raw_key == raw_key)
    }
}
