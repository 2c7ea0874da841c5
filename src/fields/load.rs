//! JSON rule files.
//!
//! ```json
//! {
//!   "version": 1,
//!   "fields": [
//!     { "name": "ACT 25th", "sources": ["ACT Composite"],
//!       "extract": "(\\d+)-", "range": { "min": 1, "max": 36 } },
//!     { "name": "*delete*", "sources": [{ "pattern": "^Men\\*+$" }] },
//!     { "name": "SAT Math 75th",
//!       "sources": [{ "label": "SAT Math", "column_label": "75th Percentile" }] }
//!   ]
//! }
//! ```
//!
//! A source is either a plain string (exact raw key) or an object with
//! exactly one of `key`, `pattern` or `label`. Objects with `label` may
//! narrow the match with `page_class`, `page`, `table`, `heading`, `column`
//! and `column_label`.

use std::fs;
use std::path::Path;

use regex::Regex;
use serde::Deserialize;

use crate::error::{Error, Result};

use super::source::{Location, SourceMatcher};
use super::spec::{FieldSpec, FieldSpecTable, NumericRange};

/// Highest rule file version understood.
pub const RULE_FILE_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleFile {
    #[serde(default = "default_version")]
    version: u32,
    fields: Vec<RuleDef>,
}

fn default_version() -> u32 {
    RULE_FILE_VERSION
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleDef {
    name: String,
    sources: Vec<SourceDef>,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    range: Option<NumericRange>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SourceDef {
    Key(String),
    Detailed(DetailedSource),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DetailedSource {
    key: Option<String>,
    pattern: Option<String>,
    label: Option<String>,
    page_class: Option<String>,
    page: Option<usize>,
    table: Option<usize>,
    heading: Option<String>,
    column: Option<usize>,
    column_label: Option<String>,
}

impl DetailedSource {
    fn has_context(&self) -> bool {
        self.page_class.is_some()
            || self.page.is_some()
            || self.table.is_some()
            || self.heading.is_some()
            || self.column.is_some()
            || self.column_label.is_some()
    }

    fn into_matcher(self, field: &str) -> Result<SourceMatcher> {
        let has_context = self.has_context();
        let kinds = [self.key.is_some(), self.pattern.is_some(), self.label.is_some()];
        match kinds.iter().filter(|k| **k).count() {
            0 => {
                return Err(Error::invalid_rule(
                    field,
                    "source needs one of 'key', 'pattern' or 'label'",
                ))
            }
            1 => {}
            _ => {
                return Err(Error::invalid_rule(
                    field,
                    "source may use only one of 'key', 'pattern' or 'label'",
                ))
            }
        }

        if let Some(label) = self.label {
            return Ok(SourceMatcher::Located(Location {
                label,
                page_class: self.page_class,
                page: self.page,
                table: self.table,
                heading: self.heading,
                column: self.column,
                column_label: self.column_label,
            }));
        }
        if has_context {
            return Err(Error::invalid_rule(
                field,
                "location context requires a 'label' source",
            ));
        }
        match self.pattern {
            Some(pattern) => Ok(SourceMatcher::Pattern(Regex::new(&pattern)?)),
            None => Ok(SourceMatcher::Key(self.key.unwrap_or_default())),
        }
    }
}

impl RuleDef {
    fn into_spec(self) -> Result<FieldSpec> {
        let mut spec = FieldSpec::new(self.name);
        for source in self.sources {
            let matcher = match source {
                SourceDef::Key(key) => SourceMatcher::Key(key),
                SourceDef::Detailed(detail) => detail.into_matcher(&spec.name)?,
            };
            spec = spec.source(matcher);
        }
        if let Some(pattern) = self.extract {
            spec = spec.with_extract(Regex::new(&pattern)?);
        }
        spec.range = self.range;
        Ok(spec)
    }
}

impl FieldSpecTable {
    /// Parse and validate a rule table from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: RuleFile = serde_json::from_str(json)?;
        if file.version == 0 || file.version > RULE_FILE_VERSION {
            return Err(Error::Other(format!(
                "Unsupported rule file version {} (expected {})",
                file.version, RULE_FILE_VERSION
            )));
        }

        let specs = file
            .fields
            .into_iter()
            .map(RuleDef::into_spec)
            .collect::<Result<Vec<_>>>()?;
        Self::new(specs)
    }

    /// Read, parse and validate a rule table from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("loading rules from {}", path.display());
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldOrigin, RawEntry};

    const RULES: &str = r#"{
        "version": 1,
        "fields": [
            { "name": "ACT 25th", "sources": ["ACT Composite"],
              "extract": "(\\d+)-", "range": { "min": 1, "max": 36 } },
            { "name": "*delete*", "sources": [{ "pattern": "^Men\\*+$" }, "Search"] },
            { "name": "SAT Math 75th",
              "sources": [{ "label": "SAT Math", "column_label": "75th Percentile" }] }
        ]
    }"#;

    #[test]
    fn test_from_json() {
        let table = FieldSpecTable::from_json(RULES).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.deletion_count(), 1);

        let act = table.get("ACT 25th").unwrap();
        assert_eq!(act.range, Some(NumericRange::new(1.0, 36.0)));
        assert_eq!(act.capture("21-27"), Some("21"));

        let entry = RawEntry {
            key: "SAT Math - 75th Percentile".into(),
            value: Some("700".into()),
            origin: FieldOrigin {
                column_label: Some("75th Percentile".into()),
                ..FieldOrigin::detached("SAT Math")
            },
        };
        let names: Vec<_> = table.matching(&entry).map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["SAT Math 75th"]);
    }

    #[test]
    fn test_version_defaults() {
        let table = FieldSpecTable::from_json(r#"{ "fields": [] }"#).unwrap();
        assert!(table.is_empty());

        let err = FieldSpecTable::from_json(r#"{ "version": 2, "fields": [] }"#).unwrap_err();
        assert!(err.to_string().contains("version 2"));
    }

    #[test]
    fn test_bad_sources() {
        let cases = [
            r#"{ "fields": [{ "name": "a", "sources": [{ "key": "a", "pattern": "b" }] }] }"#,
            r#"{ "fields": [{ "name": "a", "sources": [{ "key": "a", "column": 1 }] }] }"#,
            r#"{ "fields": [{ "name": "a", "sources": [{ "column": 1 }] }] }"#,
        ];
        for json in cases {
            let err = FieldSpecTable::from_json(json).unwrap_err();
            assert!(matches!(err, Error::InvalidRule { .. }), "{}", json);
        }
    }

    #[test]
    fn test_bad_regex_and_unknown_fields() {
        let bad_regex = r#"{ "fields": [{ "name": "a", "sources": ["a"], "extract": "(\\d+" }] }"#;
        assert!(matches!(
            FieldSpecTable::from_json(bad_regex),
            Err(Error::Pattern(_))
        ));

        let typo = r#"{ "fields": [{ "name": "a", "sources": ["a"], "extrct": "(\\d+)" }] }"#;
        assert!(matches!(
            FieldSpecTable::from_json(typo),
            Err(Error::RuleParse(_))
        ));
    }

    #[test]
    fn test_table_validation_runs() {
        let json = r#"{ "fields": [{ "name": "a", "sources": ["a"], "extract": "\\d+" }] }"#;
        assert!(matches!(
            FieldSpecTable::from_json(json),
            Err(Error::InvalidRule { .. })
        ));
    }
}
