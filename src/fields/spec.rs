//! Typed rule table: one [`FieldSpec`] per canonical field.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{Number, RawEntry};

use super::source::{Location, SourceMatcher};

/// Canonical name that drops every matched raw field.
pub const DELETE_MARKER: &str = "*delete*";

/// Inclusive numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    /// Lower bound (inclusive)
    pub min: f64,
    /// Upper bound (inclusive)
    pub max: f64,
}

impl NumericRange {
    /// Create a range. Bounds are checked when the owning table is built.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Check if `value` lies within `[min, max]`.
    pub fn contains(&self, value: Number) -> bool {
        let v = value.as_f64();
        self.min <= v && v <= self.max
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

/// Outcome of range validation for one extracted number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeCheck {
    /// No range declared, nothing checked
    Unchecked,
    /// Inside the declared range
    Within,
    /// Outside the declared range
    Outside(NumericRange),
}

/// Rule for one canonical field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Canonical name, or [`DELETE_MARKER`]
    pub name: String,

    /// Raw entries this rule renames
    pub sources: Vec<SourceMatcher>,

    /// Extraction pattern with exactly one capture group
    pub extract: Option<Regex>,

    /// Valid range of the extracted number
    pub range: Option<NumericRange>,
}

impl FieldSpec {
    /// Create a rule with no sources.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sources: Vec::new(),
            extract: None,
            range: None,
        }
    }

    /// Create a deletion rule.
    pub fn delete() -> Self {
        Self::new(DELETE_MARKER)
    }

    /// Add a source matcher and return self.
    pub fn source(mut self, source: SourceMatcher) -> Self {
        self.sources.push(source);
        self
    }

    /// Add an exact-key source and return self.
    pub fn from_key(self, key: impl Into<String>) -> Self {
        self.source(SourceMatcher::Key(key.into()))
    }

    /// Add a structural source and return self.
    pub fn from_location(self, location: Location) -> Self {
        self.source(SourceMatcher::Located(location))
    }

    /// Set the extraction pattern and return self.
    pub fn with_extract(mut self, pattern: Regex) -> Self {
        self.extract = Some(pattern);
        self
    }

    /// Set the valid range and return self.
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = Some(NumericRange::new(min, max));
        self
    }

    /// Check if this rule drops its fields.
    pub fn is_deletion(&self) -> bool {
        self.name == DELETE_MARKER
    }

    /// Check if a raw entry is one of this rule's sources.
    pub fn matches(&self, entry: &RawEntry) -> bool {
        self.sources.iter().any(|s| s.matches(entry))
    }

    /// Capture text of the extraction pattern in `text`.
    ///
    /// `None` when there is no pattern or it does not match.
    pub fn capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        let caps = self.extract.as_ref()?.captures(text)?;
        caps.get(1).map(|m| m.as_str())
    }

    /// Validate an extracted number against the declared range.
    pub fn check_range(&self, value: Number) -> RangeCheck {
        match self.range {
            None => RangeCheck::Unchecked,
            Some(range) if range.contains(value) => RangeCheck::Within,
            Some(range) => RangeCheck::Outside(range),
        }
    }

    /// Check the rule on its own.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_rule(&self.name, "name is empty"));
        }
        if self.sources.is_empty() {
            return Err(Error::invalid_rule(&self.name, "rule has no sources"));
        }
        if self.is_deletion() && (self.extract.is_some() || self.range.is_some()) {
            return Err(Error::invalid_rule(
                &self.name,
                "deletion rule cannot declare an extraction pattern or range",
            ));
        }
        if let Some(re) = &self.extract {
            let groups = re.captures_len() - 1;
            if groups != 1 {
                return Err(Error::invalid_rule(
                    &self.name,
                    format!(
                        "extraction pattern {:?} has {} capture groups, expected 1",
                        re.as_str(),
                        groups
                    ),
                ));
            }
        }
        if let Some(range) = &self.range {
            if !range.is_valid() {
                return Err(Error::invalid_rule(
                    &self.name,
                    format!("invalid range {}..={}", range.min, range.max),
                ));
            }
        }
        Ok(())
    }
}

/// Validated, immutable rule table shared by every entity.
#[derive(Debug, Clone, Default)]
pub struct FieldSpecTable {
    specs: Vec<FieldSpec>,
}

impl FieldSpecTable {
    /// Build a table, validating every rule.
    ///
    /// Fails on the first invalid rule or on a canonical name defined twice.
    pub fn new(specs: Vec<FieldSpec>) -> Result<Self> {
        let mut seen = HashSet::new();
        for spec in &specs {
            spec.validate()?;
            if !spec.is_deletion() && !seen.insert(spec.name.as_str()) {
                return Err(Error::invalid_rule(&spec.name, "field is defined more than once"));
            }
        }
        log::debug!("loaded {} field rules", specs.len());
        Ok(Self { specs })
    }

    /// Table with no rules: every field passes through.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Rules in table order.
    pub fn specs(&self) -> &[FieldSpec] {
        &self.specs
    }

    /// Get a rule by canonical name.
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.specs.iter().find(|s| s.name == name && !s.is_deletion())
    }

    /// Rules matching a raw entry, in table order.
    pub fn matching<'a>(&'a self, entry: &'a RawEntry) -> impl Iterator<Item = &'a FieldSpec> {
        self.specs.iter().filter(move |s| s.matches(entry))
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Check if the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Number of deletion rules.
    pub fn deletion_count(&self) -> usize {
        self.specs.iter().filter(|s| s.is_deletion()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn re(p: &str) -> Regex {
        Regex::new(p).unwrap()
    }

    #[test]
    fn test_valid_table() {
        let table = FieldSpecTable::new(vec![
            FieldSpec::new("ACT 25th")
                .from_key("ACT Composite")
                .with_extract(re(r"(\d+)-"))
                .with_range(1.0, 36.0),
            FieldSpec::delete().from_key("ACT Composite*"),
            FieldSpec::delete().from_key("SAT Math*"),
        ])
        .unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.deletion_count(), 2);
        assert!(table.get("ACT 25th").is_some());
        assert!(table.get(DELETE_MARKER).is_none());
    }

    #[test]
    fn test_capture_group_count() {
        for pattern in [r"\d+", r"(\d+)-(\d+)"] {
            let err = FieldSpecTable::new(vec![FieldSpec::new("ACT")
                .from_key("ACT Composite")
                .with_extract(re(pattern))])
            .unwrap_err();
            assert!(matches!(err, Error::InvalidRule { .. }), "{}", pattern);
        }

        // Non-capturing groups do not count.
        assert!(FieldSpecTable::new(vec![FieldSpec::new("ACT")
            .from_key("ACT Composite")
            .with_extract(re(r"(?:Top )?(\d+)"))])
        .is_ok());
    }

    #[test]
    fn test_invalid_rules() {
        let cases = vec![
            FieldSpec::new(" ").from_key("a"),
            FieldSpec::new("no sources"),
            FieldSpec::new("bad range").from_key("a").with_range(5.0, 1.0),
            FieldSpec::new("nan range").from_key("a").with_range(f64::NAN, 1.0),
            FieldSpec::delete().from_key("a").with_range(0.0, 1.0),
        ];
        for spec in cases {
            let name = spec.name.clone();
            assert!(FieldSpecTable::new(vec![spec]).is_err(), "{}", name);
        }
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let err = FieldSpecTable::new(vec![
            FieldSpec::new("Rain").from_key("Rain"),
            FieldSpec::new("Rain").from_key("Rainfall"),
        ])
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid rule for field 'Rain': field is defined more than once"
        );
    }

    #[test]
    fn test_capture() {
        let spec = FieldSpec::new("Temperature (January mean low)")
            .from_key("Temperature")
            .with_extract(re(r"([-\d\.]+) average low"));
        assert_eq!(spec.capture("-3.5 average low, 80 average high"), Some("-3.5"));
        assert_eq!(spec.capture("Not reported"), None);
        assert_eq!(FieldSpec::new("x").capture("1"), None);
    }

    #[test]
    fn test_check_range() {
        let days = FieldSpec::new("Days").from_key("Days").with_range(0.0, 366.0);
        assert_eq!(days.check_range(Number::Int(200)), RangeCheck::Within);
        assert_eq!(
            days.check_range(Number::Int(400)),
            RangeCheck::Outside(NumericRange::new(0.0, 366.0))
        );

        let open = FieldSpec::new("Enrollment").from_key("Enrollment");
        assert_eq!(open.check_range(Number::Int(-1)), RangeCheck::Unchecked);
    }

    #[test]
    fn test_range_contains_is_inclusive() {
        let range = NumericRange::new(0.0, 366.0);
        assert!(range.contains(Number::Int(0)));
        assert!(range.contains(Number::Int(366)));
        assert!(range.contains(Number::Float(12.5)));
        assert!(!range.contains(Number::Int(367)));
        assert!(!range.contains(Number::Float(-0.1)));
    }
}
