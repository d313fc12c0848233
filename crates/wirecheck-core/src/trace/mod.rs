//! Capture-trace ingestion.
//!
//! The browser-side adapter records everything the hosting page did in
//! one page load into a JSON capture trace. This module owns reading
//! the trace bytes (with a stable content fingerprint) and the lenient
//! serde model of the format.

pub mod model;
pub mod read;

pub use model::{CaptureTrace, PageFacts, RuntimeEvent, UiNode, parse_trace};
pub use read::{TraceContext, read_trace};

use thiserror::Error;

/// Errors at the trace-ingestion boundary.
///
/// Nothing past ingestion returns this: once a trace is parsed (or
/// deliberately substituted with an empty one) the engine degrades to
/// unknown/skip instead of erroring.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("failed to read trace: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed trace JSON: {0}")]
    Json(#[from] serde_json::Error),
}
