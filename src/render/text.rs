//! Plain text rendering for terminal output.

use std::fmt::Write;

use crate::model::{Anomaly, FieldValue, NormalizedRecord, RawRecord};

/// One `key: value` line per raw entry, in record order.
pub fn raw_to_text(record: &RawRecord) -> String {
    let mut output = String::new();
    for entry in record {
        let value = entry.value.as_deref().unwrap_or("<null>");
        let _ = writeln!(output, "{}: {}", entry.key, value);
    }
    output
}

/// One `field = value` line per canonical field, sorted by name.
pub fn normalized_to_text(record: &NormalizedRecord) -> String {
    let mut output = String::new();
    for (field, value) in &record.fields {
        let _ = match value {
            FieldValue::Numeric(n) => writeln!(output, "{} = {}", field, n),
            FieldValue::Text(t) => writeln!(output, "{} = {:?}", field, t),
            FieldValue::Absent => writeln!(output, "{} = <absent>", field),
        };
    }
    output
}

/// One line per anomaly.
pub fn anomalies_to_text(anomalies: &[Anomaly]) -> String {
    anomalies.iter().map(|a| format!("{}\n", a)).collect()
}
