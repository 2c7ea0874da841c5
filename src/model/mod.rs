//! Data model shared by every pipeline stage.
//!
//! Pages and tables are the input, [`RawRecord`] is the merged output of
//! extraction, and [`NormalizedRecord`] plus [`Anomaly`] values are the
//! output of normalization. Every type serializes with serde.

mod anomaly;
mod normalized;
mod page;
mod record;
mod table;

pub use anomaly::{Anomaly, AnomalyReason};
pub use normalized::{FieldState, FieldTrace, FieldValue, NormalizedRecord, Number};
pub use page::{EntityPages, PageDocument};
pub use record::{FieldOrigin, LabeledValue, RawEntry, RawRecord, DEFAULT_COLLISION_MARKER};
pub use table::{cell, normalize_label, TableBlock, TableRow};
