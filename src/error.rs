//! Error types for untable library.

use std::io;
use thiserror::Error;

/// Result type alias for untable operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading rules or reading pages.
///
/// Per-field and per-row problems are never errors: they are reported as
/// [`Anomaly`](crate::model::Anomaly) values next to the output.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The rule table is not valid JSON or does not match the rule schema.
    #[error("Rule table parse error: {0}")]
    RuleParse(#[from] serde_json::Error),

    /// A rule carries an invalid regular expression.
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A rule is structurally invalid.
    #[error("Invalid rule for field '{field}': {reason}")]
    InvalidRule {
        /// Canonical field name of the offending rule
        field: String,
        /// What is wrong with it
        reason: String,
    },

    /// A CSS selector given to the HTML reader could not be parsed.
    #[error("Invalid selector: {0}")]
    Selector(String),

    /// Error during rendering (JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build an [`Error::InvalidRule`].
    pub fn invalid_rule(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidRule {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
