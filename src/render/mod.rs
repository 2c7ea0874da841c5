//! Rendering module for records, reports and anomalies.

mod json;
mod text;

pub use json::{to_json, JsonFormat};
pub use text::{anomalies_to_text, normalized_to_text, raw_to_text};
