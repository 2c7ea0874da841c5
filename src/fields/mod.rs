//! Field normalization: canonical names, numeric extraction and range
//! validation driven by a declarative rule table.
//!
//! # Example
//!
//! ```
//! use untable::fields::{normalize, FieldSpecTable};
//! use untable::model::{Number, RawRecord};
//!
//! let rules = FieldSpecTable::from_json(r#"{
//!     "fields": [{
//!         "name": "Demographics pct Asian",
//!         "sources": ["Asian"],
//!         "extract": "([\\d\\.]+) Asian",
//!         "range": { "min": 0, "max": 100 }
//!     }]
//! }"#).unwrap();
//!
//! let raw = RawRecord::from_values([("Asian", Some("12.3 Asian"))]);
//! let out = normalize("59", &raw, &rules);
//! assert_eq!(out.record.number("Demographics pct Asian"), Some(Number::Float(12.3)));
//! ```

mod load;
mod normalize;
mod source;
mod spec;

pub use load::RULE_FILE_VERSION;
pub use normalize::{normalize, Normalized};
pub use source::{Location, SourceMatcher};
pub use spec::{FieldSpec, FieldSpecTable, NumericRange, RangeCheck, DELETE_MARKER};
