//! Heuristic source pattern detection.
//!
//! Flags handler code that filters on a selector discriminator
//! (payment-method type or outcome code) against literal values with no
//! catch-all branch. Deliberately not a parser: inputs are arbitrary,
//! possibly truncated handler snippets, and bounded-effort smell
//! detection is the contract. False negatives are acceptable; errors
//! are not: malformed input yields no findings.

pub mod detect;
pub mod scanner;

pub use detect::{Detection, DetectionKind, MAX_SNIPPET_BYTES, scan_handler};
