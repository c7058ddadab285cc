//! Attribute names of the document schema, shared by emit and ingest.
//!
//! ```json
//! { "logical": "AND",
//!   "fields": { "name": {
//!       "single-values":    ["raw"],
//!       "excluded-values":  ["raw"],
//!       "ranges":           [{ "lower": "1", "upper": "9",
//!                              "inclusive-lower": false }],
//!       "excluded-ranges":  [],
//!       "comparisons":      [{ "value": "5", "operator": ">=" }],
//!       "pattern-matchers": [{ "value": "bla", "type": "CONTAINS",
//!                              "case-insensitive": true }] } },
//!   "groups": [] }
//! ```
//!
//! Missing keys default to empty; a missing `logical` is `"AND"`;
//! missing inclusivity flags default to `true`; a missing
//! `case-insensitive` is `false`.

pub const KEY_LOGICAL: &str = "logical";
pub const KEY_FIELDS: &str = "fields";
pub const KEY_GROUPS: &str = "groups";

pub const KEY_SINGLE_VALUES: &str = "single-values";
pub const KEY_EXCLUDED_VALUES: &str = "excluded-values";
pub const KEY_RANGES: &str = "ranges";
pub const KEY_EXCLUDED_RANGES: &str = "excluded-ranges";
pub const KEY_COMPARISONS: &str = "comparisons";
pub const KEY_PATTERN_MATCHERS: &str = "pattern-matchers";

pub const KEY_LOWER: &str = "lower";
pub const KEY_UPPER: &str = "upper";
pub const KEY_INCLUSIVE_LOWER: &str = "inclusive-lower";
pub const KEY_INCLUSIVE_UPPER: &str = "inclusive-upper";

pub const KEY_VALUE: &str = "value";
pub const KEY_OPERATOR: &str = "operator";
pub const KEY_TYPE: &str = "type";
pub const KEY_CASE_INSENSITIVE: &str = "case-insensitive";
