//! HTML page reading.
//!
//! Turns already-fetched HTML into [`PageDocument`](crate::model::PageDocument)s.
//! Nothing here performs network I/O.

#[cfg(feature = "html")]
mod html;
mod options;

#[cfg(feature = "html")]
pub use html::{read_page, HtmlReader};
pub use options::{HtmlOptions, DEFAULT_NULL_MARKERS};
