//! Field catalog consumed by the parser, the exporter, the document
//! codec, and the normalization pipeline.
//!
//! Field configurations are immutable once built; there is no runtime
//! lock. Type behavior (equality, ordering, successor) hangs off the
//! [`FieldKind`] descriptor rather than a name-keyed registry.

use crate::value::ValueKind;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::fmt;

/// Read-only catalog of field configurations keyed by field name.
/// Implementations must not mutate while a parse or export is running.
pub trait FieldSet {
    fn has(&self, name: &str) -> bool;
    fn get(&self, name: &str) -> Option<&FieldConfig>;
    /// All configured fields in catalog order.
    fn all(&self) -> Vec<&FieldConfig>;
}

// ──────────────────────────────────────────────
// Field kind descriptors
// ──────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Tagged type descriptor. Each kind supplies the value-comparison
/// predicate, a total-order attempt, and (where a natural increment
/// exists) a successor function for range coalescing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Decimal,
    Date,
}

impl FieldKind {
    /// Semantic equality of two model-form values under the options.
    /// Values that do not parse under the kind fall back to exact text
    /// equality.
    pub fn is_equal(self, a: &str, b: &str, options: &FieldOptions) -> bool {
        match self {
            FieldKind::Text => {
                if options.case_insensitive {
                    a.to_lowercase() == b.to_lowercase()
                } else {
                    a == b
                }
            }
            FieldKind::Integer | FieldKind::Decimal => match (parse_decimal(a), parse_decimal(b)) {
                (Some(x), Some(y)) => x == y,
                _ => a == b,
            },
            FieldKind::Date => match (parse_date(a), parse_date(b)) {
                (Some(x), Some(y)) => x == y,
                _ => a == b,
            },
        }
    }

    /// Total-order attempt; `None` when either value does not parse
    /// under the kind.
    pub fn compare(self, a: &str, b: &str, options: &FieldOptions) -> Option<Ordering> {
        match self {
            FieldKind::Text => {
                if options.case_insensitive {
                    Some(a.to_lowercase().cmp(&b.to_lowercase()))
                } else {
                    Some(a.cmp(b))
                }
            }
            FieldKind::Integer | FieldKind::Decimal => {
                Some(parse_decimal(a)?.cmp(&parse_decimal(b)?))
            }
            FieldKind::Date => Some(parse_date(a)?.cmp(&parse_date(b)?)),
        }
    }

    /// Whether `value` parses under the kind (always true for text).
    pub fn parses(self, value: &str) -> bool {
        match self {
            FieldKind::Text => true,
            FieldKind::Integer | FieldKind::Decimal => parse_decimal(value).is_some(),
            FieldKind::Date => parse_date(value).is_some(),
        }
    }

    pub fn has_successor(self) -> bool {
        matches!(self, FieldKind::Integer | FieldKind::Date)
    }

    /// The next value in the kind's increment order, or `None` for kinds
    /// without one (and on parse failure or overflow).
    pub fn successor(self, value: &str) -> Option<String> {
        match self {
            FieldKind::Integer => {
                let n: i64 = value.trim().parse().ok()?;
                Some(n.checked_add(1)?.to_string())
            }
            FieldKind::Date => {
                let d = parse_date(value)?;
                Some(d.succ_opt()?.format(DATE_FORMAT).to_string())
            }
            FieldKind::Text | FieldKind::Decimal => None,
        }
    }
}

fn parse_decimal(value: &str) -> Option<Decimal> {
    value.trim().parse().ok()
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

// ──────────────────────────────────────────────
// Field configuration
// ──────────────────────────────────────────────

/// Per-field comparison options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldOptions {
    pub case_insensitive: bool,
}

/// Opaque per-field normalization hook. The transform pass runs the
/// field's chain over every raw value; an `Err` becomes a bag error.
pub trait ValueTransformer {
    fn transform(&self, raw: &str) -> Result<String, String>;
}

/// An immutable field configuration, produced by [`FieldConfigBuilder`].
pub struct FieldConfig {
    name: String,
    kind: FieldKind,
    required: bool,
    accept_ranges: bool,
    accept_compares: bool,
    accept_patterns: bool,
    label: Option<String>,
    options: FieldOptions,
    transformers: Vec<Box<dyn ValueTransformer>>,
}

impl FieldConfig {
    pub fn builder(name: impl Into<String>, kind: FieldKind) -> FieldConfigBuilder {
        FieldConfigBuilder {
            config: FieldConfig {
                name: name.into(),
                kind,
                required: false,
                accept_ranges: false,
                accept_compares: false,
                accept_patterns: false,
                label: None,
                options: FieldOptions::default(),
                transformers: Vec::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn accept_ranges(&self) -> bool {
        self.accept_ranges
    }

    pub fn accept_compares(&self) -> bool {
        self.accept_compares
    }

    pub fn accept_patterns(&self) -> bool {
        self.accept_patterns
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn options(&self) -> &FieldOptions {
        &self.options
    }

    pub fn transformers(&self) -> &[Box<dyn ValueTransformer>] {
        &self.transformers
    }

    /// Acceptance check for a value kind about to enter this field's bag.
    /// Plain and excluded singles are always accepted.
    pub fn accepts(&self, kind: ValueKind) -> bool {
        match kind {
            ValueKind::Single | ValueKind::ExcludedSingle => true,
            ValueKind::Range | ValueKind::ExcludedRange => self.accept_ranges,
            ValueKind::Compare => self.accept_compares,
            ValueKind::Pattern => self.accept_patterns,
        }
    }

    pub fn is_equal(&self, a: &str, b: &str) -> bool {
        self.kind.is_equal(a, b, &self.options)
    }

    pub fn compare(&self, a: &str, b: &str) -> Option<Ordering> {
        self.kind.compare(a, b, &self.options)
    }
}

impl fmt::Debug for FieldConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldConfig")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("accept_ranges", &self.accept_ranges)
            .field("accept_compares", &self.accept_compares)
            .field("accept_patterns", &self.accept_patterns)
            .field("label", &self.label)
            .field("options", &self.options)
            .field("transformers", &self.transformers.len())
            .finish()
    }
}

/// Builder for [`FieldConfig`]; the built value is handed out immutable.
pub struct FieldConfigBuilder {
    config: FieldConfig,
}

impl FieldConfigBuilder {
    pub fn required(mut self, required: bool) -> Self {
        self.config.required = required;
        self
    }

    pub fn ranges(mut self, accept: bool) -> Self {
        self.config.accept_ranges = accept;
        self
    }

    pub fn compares(mut self, accept: bool) -> Self {
        self.config.accept_compares = accept;
        self
    }

    pub fn patterns(mut self, accept: bool) -> Self {
        self.config.accept_patterns = accept;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.config.label = Some(label.into());
        self
    }

    pub fn case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.config.options.case_insensitive = case_insensitive;
        self
    }

    pub fn transformer(mut self, transformer: Box<dyn ValueTransformer>) -> Self {
        self.config.transformers.push(transformer);
        self
    }

    pub fn build(self) -> FieldConfig {
        self.config
    }
}

// ──────────────────────────────────────────────
// Vec-backed field set
// ──────────────────────────────────────────────

/// The in-crate [`FieldSet`] implementation: a small insertion-ordered
/// list of configurations.
#[derive(Debug, Default)]
pub struct SimpleFieldSet {
    fields: Vec<FieldConfig>,
}

impl SimpleFieldSet {
    pub fn new() -> Self {
        SimpleFieldSet::default()
    }

    /// Add a configuration, replacing any previous one with the same name.
    pub fn add(&mut self, config: FieldConfig) {
        match self.fields.iter_mut().find(|f| f.name() == config.name()) {
            Some(existing) => *existing = config,
            None => self.fields.push(config),
        }
    }

    pub fn with(mut self, config: FieldConfig) -> Self {
        self.add(config);
        self
    }
}

impl FieldSet for SimpleFieldSet {
    fn has(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name() == name)
    }

    fn get(&self, name: &str) -> Option<&FieldConfig> {
        self.fields.iter().find(|f| f.name() == name)
    }

    fn all(&self) -> Vec<&FieldConfig> {
        self.fields.iter().collect()
    }
}
