//! sift-core: canonical search-condition model and FilterQuery codecs.
//!
//! A condition is a tree of groups (AND/OR) holding per-field value
//! bags; bags carry singles, ranges, comparisons, and pattern matches,
//! each in a plain or excluded form. The crate converts between that
//! tree and the FilterQuery mini-language in both directions and runs a
//! chain of normalization passes over parsed trees.
//!
//! # Public API
//!
//! Key types are re-exported at the crate root for convenience:
//!
//! - [`FilterQueryParser`] -- text to condition tree, with limits
//! - [`FilterQueryExporter`] -- canonical rendering back to text
//! - [`NormalizeChain`] / [`normalize()`] -- the rewriting pipeline
//! - [`ConditionBuilder`] -- fluent construction
//! - [`FieldSet`] / [`FieldConfig`] -- the field catalog contract
//! - [`ConditionError`] -- the error taxonomy
//!
//! The structured document codec lives in the sibling `sift-interchange`
//! crate.

/// Default per-field value limit, cumulative per group.
pub const DEFAULT_MAX_VALUES: usize = 100;
/// Default direct-subgroup limit per group.
pub const DEFAULT_MAX_GROUPS: usize = 100;
/// Default nesting limit, counted from the root (root = 0).
pub const DEFAULT_MAX_DEPTH: usize = 100;

pub mod bag;
pub mod builder;
pub mod condition;
pub mod error;
pub mod export;
pub mod field;
pub mod group;
pub mod lexer;
pub mod normalize;
pub mod parser;
pub mod value;

// ── Convenience re-exports ───────────────────────────────────────────

pub use bag::ValuesBag;
pub use builder::{ConditionBuilder, ValuesBuilder};
pub use condition::Condition;
pub use error::{ConditionError, ValuesError};
pub use export::{FilterQueryExporter, LabelResolver};
pub use field::{
    FieldConfig, FieldConfigBuilder, FieldKind, FieldOptions, FieldSet, SimpleFieldSet,
    ValueTransformer,
};
pub use group::{Logical, ValuesGroup};
pub use normalize::{normalize, ConditionValidator, NormalizeChain, Pass};
pub use parser::FilterQueryParser;
pub use value::{
    CompareOp, CompareValue, PatternKind, PatternValue, RangeValue, SingleValue, ValueKind,
};
