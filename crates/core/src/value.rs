//! Value variants carried by a values bag.
//!
//! Parsers and the document codec only ever fill the raw form of a value;
//! the transform pass of the normalization pipeline derives the model form.

use serde::{Deserialize, Serialize};
use std::fmt;

// ──────────────────────────────────────────────
// Single value
// ──────────────────────────────────────────────

/// A plain value: the original text plus an optional normalized form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleValue {
    /// Original text exactly as it appeared in the input.
    pub raw: String,
    /// Normalized form produced by the field's transformer chain.
    pub normalized: Option<String>,
}

impl SingleValue {
    pub fn new(raw: impl Into<String>) -> Self {
        SingleValue {
            raw: raw.into(),
            normalized: None,
        }
    }

    /// The form value comparison operates on: normalized when present,
    /// raw otherwise.
    pub fn model(&self) -> &str {
        self.normalized.as_deref().unwrap_or(&self.raw)
    }
}

// ──────────────────────────────────────────────
// Range
// ──────────────────────────────────────────────

/// A bounded interval. Endpoints are inclusive unless flagged otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeValue {
    pub lower: SingleValue,
    pub upper: SingleValue,
    pub lower_inclusive: bool,
    pub upper_inclusive: bool,
}

impl RangeValue {
    /// Inclusive on both ends.
    pub fn new(lower: SingleValue, upper: SingleValue) -> Self {
        RangeValue {
            lower,
            upper,
            lower_inclusive: true,
            upper_inclusive: true,
        }
    }

    pub fn bounds(
        lower: SingleValue,
        upper: SingleValue,
        lower_inclusive: bool,
        upper_inclusive: bool,
    ) -> Self {
        RangeValue {
            lower,
            upper,
            lower_inclusive,
            upper_inclusive,
        }
    }
}

// ──────────────────────────────────────────────
// Comparison
// ──────────────────────────────────────────────

/// Comparison operators accepted by the FilterQuery surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = "<>")]
    Neq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
}

impl CompareOp {
    /// Surface form shared by FilterQuery and the document codec.
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::Neq => "<>",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "<" => Some(CompareOp::Lt),
            "<=" => Some(CompareOp::Lte),
            "<>" => Some(CompareOp::Neq),
            ">" => Some(CompareOp::Gt),
            ">=" => Some(CompareOp::Gte),
            _ => None,
        }
    }
}

/// A single-operand comparison such as `>= 10`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareValue {
    pub operand: SingleValue,
    pub op: CompareOp,
}

impl CompareValue {
    pub fn new(op: CompareOp, operand: SingleValue) -> Self {
        CompareValue { operand, op }
    }
}

// ──────────────────────────────────────────────
// Pattern match
// ──────────────────────────────────────────────

/// The eight pattern-match tags. The `Not*` half is the negated form;
/// exclusivity is derived from the tag, never stored separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatternKind {
    Contains,
    StartsWith,
    EndsWith,
    Regex,
    NotContains,
    NotStartsWith,
    NotEndsWith,
    NotRegex,
}

impl PatternKind {
    pub fn is_exclusive(self) -> bool {
        matches!(
            self,
            PatternKind::NotContains
                | PatternKind::NotStartsWith
                | PatternKind::NotEndsWith
                | PatternKind::NotRegex
        )
    }

    /// The FilterQuery operator symbol, identical for a tag and its
    /// negation.
    pub fn symbol(self) -> char {
        match self {
            PatternKind::Contains | PatternKind::NotContains => '*',
            PatternKind::StartsWith | PatternKind::NotStartsWith => '>',
            PatternKind::EndsWith | PatternKind::NotEndsWith => '<',
            PatternKind::Regex | PatternKind::NotRegex => '?',
        }
    }

    pub fn from_symbol(symbol: char, negated: bool) -> Option<Self> {
        let kind = match (symbol, negated) {
            ('*', false) => PatternKind::Contains,
            ('*', true) => PatternKind::NotContains,
            ('>', false) => PatternKind::StartsWith,
            ('>', true) => PatternKind::NotStartsWith,
            ('<', false) => PatternKind::EndsWith,
            ('<', true) => PatternKind::NotEndsWith,
            ('?', false) => PatternKind::Regex,
            ('?', true) => PatternKind::NotRegex,
            _ => return None,
        };
        Some(kind)
    }

    /// Toggle between a tag and its negated counterpart.
    pub fn negated(self) -> Self {
        match self {
            PatternKind::Contains => PatternKind::NotContains,
            PatternKind::StartsWith => PatternKind::NotStartsWith,
            PatternKind::EndsWith => PatternKind::NotEndsWith,
            PatternKind::Regex => PatternKind::NotRegex,
            PatternKind::NotContains => PatternKind::Contains,
            PatternKind::NotStartsWith => PatternKind::StartsWith,
            PatternKind::NotEndsWith => PatternKind::EndsWith,
            PatternKind::NotRegex => PatternKind::Regex,
        }
    }

    /// Tag name used by the document codec.
    pub fn name(self) -> &'static str {
        match self {
            PatternKind::Contains => "CONTAINS",
            PatternKind::StartsWith => "STARTS_WITH",
            PatternKind::EndsWith => "ENDS_WITH",
            PatternKind::Regex => "REGEX",
            PatternKind::NotContains => "NOT_CONTAINS",
            PatternKind::NotStartsWith => "NOT_STARTS_WITH",
            PatternKind::NotEndsWith => "NOT_ENDS_WITH",
            PatternKind::NotRegex => "NOT_REGEX",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "CONTAINS" => PatternKind::Contains,
            "STARTS_WITH" => PatternKind::StartsWith,
            "ENDS_WITH" => PatternKind::EndsWith,
            "REGEX" => PatternKind::Regex,
            "NOT_CONTAINS" => PatternKind::NotContains,
            "NOT_STARTS_WITH" => PatternKind::NotStartsWith,
            "NOT_ENDS_WITH" => PatternKind::NotEndsWith,
            "NOT_REGEX" => PatternKind::NotRegex,
            _ => return None,
        };
        Some(kind)
    }
}

/// A pattern-match value such as `~i!*bla`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternValue {
    pub pattern: SingleValue,
    pub kind: PatternKind,
    pub case_insensitive: bool,
}

impl PatternValue {
    pub fn new(kind: PatternKind, pattern: SingleValue, case_insensitive: bool) -> Self {
        PatternValue {
            pattern,
            kind,
            case_insensitive,
        }
    }
}

// ──────────────────────────────────────────────
// Value kind tag
// ──────────────────────────────────────────────

/// Names the six bag sequences; used by acceptance checks and error
/// payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValueKind {
    Single,
    ExcludedSingle,
    Range,
    ExcludedRange,
    Compare,
    Pattern,
}

impl ValueKind {
    pub fn label(self) -> &'static str {
        match self {
            ValueKind::Single => "value",
            ValueKind::ExcludedSingle => "excluded value",
            ValueKind::Range => "range",
            ValueKind::ExcludedRange => "excluded range",
            ValueKind::Compare => "comparison",
            ValueKind::Pattern => "pattern match",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
