//! sift-interchange: structured document codec for sift condition trees.
//!
//! Symmetric to the FilterQuery textual pair in sift-core: [`emit`]
//! turns a condition tree into a JSON attribute document with a
//! deterministic key order, [`ingest`] turns a document back into a
//! tree while enforcing the same invariants as the parser (field
//! catalog membership, value-kind acceptance, value/subgroup/nesting
//! limits, required fields).
//!
//! Malformed documents surface as `ConditionError::InputProcessor`;
//! catalog and limit violations reuse the core error taxonomy.

pub mod document;
pub mod emit;
pub mod ingest;

pub use emit::{to_document, to_json_string};
pub use ingest::DocumentIngestor;
