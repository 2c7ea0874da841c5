//! Non-fatal deviations recorded during extraction and normalization.

use super::Number;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why an anomaly was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnomalyReason {
    /// A pivot row had more than one marked cell
    MultipleMarks,
    /// A pivot row's only mark sits in a column without a label
    UnlabeledMark,
    /// The extraction pattern did not match, or its capture is not a number
    ExtractionFailed,
    /// The extracted value lies outside the declared range
    OutOfRange {
        /// Extracted value
        value: Number,
        /// Inclusive lower bound
        min: f64,
        /// Inclusive upper bound
        max: f64,
    },
    /// The canonical name was already produced by an earlier raw key
    DuplicateField,
}

impl AnomalyReason {
    /// Check if this is a range anomaly.
    pub fn is_range(&self) -> bool {
        matches!(self, AnomalyReason::OutOfRange { .. })
    }
}

impl fmt::Display for AnomalyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnomalyReason::MultipleMarks => write!(f, "multiple marks"),
            AnomalyReason::UnlabeledMark => write!(f, "unlabeled mark"),
            AnomalyReason::ExtractionFailed => write!(f, "extraction failed"),
            AnomalyReason::OutOfRange { .. } => write!(f, "out of range"),
            AnomalyReason::DuplicateField => write!(f, "duplicate field"),
        }
    }
}

/// One recorded anomaly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    /// Entity identifier
    pub entity_id: String,

    /// Field label or canonical name the anomaly concerns
    pub field: String,

    /// Raw text involved, if any
    pub raw_value: Option<String>,

    /// Reason
    pub reason: AnomalyReason,
}

impl Anomaly {
    /// Create a new anomaly.
    pub fn new(
        entity_id: impl Into<String>,
        field: impl Into<String>,
        raw_value: Option<String>,
        reason: AnomalyReason,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            field: field.into(),
            raw_value,
            reason,
        }
    }
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.entity_id, self.field, self.reason)?;
        if let AnomalyReason::OutOfRange { value, min, max } = &self.reason {
            write!(f, " ({} not in {}..={})", value, min, max)?;
        }
        if let Some(raw) = &self.raw_value {
            write!(f, " <- {:?}", raw)?;
        }
        Ok(())
    }
}
