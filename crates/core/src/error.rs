//! Typed domain errors surfaced by the parser, the document codec, and
//! the normalization pipeline.

use crate::value::ValueKind;
use serde::Serialize;
use std::fmt;

/// An error that fails a whole parse or ingest call. No partial tree
/// escapes alongside one of these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ConditionError {
    /// Lexer/parser mismatch at a byte offset of the input.
    Syntax { message: String, position: usize },
    /// Field name not present in the field set.
    UnknownField { field: String },
    /// The field's configuration rejects this value kind.
    UnsupportedValueType { field: String, value_type: ValueKind },
    /// A required field is absent from a non-empty group.
    FieldRequired {
        field: String,
        group_index: usize,
        level: usize,
    },
    /// A bag grew past the per-field value limit.
    ValuesOverflow {
        field: String,
        max: usize,
        current: usize,
        group_index: usize,
        level: usize,
    },
    /// A group gained more direct subgroups than allowed.
    GroupsOverflow {
        max: usize,
        current: usize,
        group_index: usize,
        level: usize,
    },
    /// Group nesting went past the depth limit.
    GroupsNesting {
        max: usize,
        group_index: usize,
        level: usize,
    },
    /// Malformed input document (invalid JSON, wrong shape, unknown tag).
    InputProcessor { message: String },
}

impl ConditionError {
    /// Syntax error in the canonical single-line template. The line is
    /// always 0; `position` is the byte offset in the input.
    pub fn expected(position: usize, expected: impl fmt::Display, got: impl fmt::Display) -> Self {
        ConditionError::syntax(position, format!("Expected '{}', got '{}'", expected, got))
    }

    pub fn syntax(position: usize, detail: impl fmt::Display) -> Self {
        ConditionError::Syntax {
            message: format!("line 0, col {}: Error: {}", position, detail),
            position,
        }
    }

    pub fn input(message: impl Into<String>) -> Self {
        ConditionError::InputProcessor {
            message: message.into(),
        }
    }
}

impl fmt::Display for ConditionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionError::Syntax { message, .. } => f.write_str(message),
            ConditionError::UnknownField { field } => {
                write!(f, "unknown field '{}'", field)
            }
            ConditionError::UnsupportedValueType { field, value_type } => {
                write!(f, "field '{}' does not accept {} values", field, value_type)
            }
            ConditionError::FieldRequired {
                field,
                group_index,
                level,
            } => {
                write!(
                    f,
                    "required field '{}' missing in group {} at level {}",
                    field, group_index, level
                )
            }
            ConditionError::ValuesOverflow {
                field,
                max,
                current,
                group_index,
                level,
            } => {
                write!(
                    f,
                    "field '{}' in group {} at level {} holds {} values, limit is {}",
                    field, group_index, level, current, max
                )
            }
            ConditionError::GroupsOverflow {
                max,
                current,
                group_index,
                level,
            } => {
                write!(
                    f,
                    "group {} at level {} holds {} subgroups, limit is {}",
                    group_index, level, current, max
                )
            }
            ConditionError::GroupsNesting {
                max,
                group_index,
                level,
            } => {
                write!(
                    f,
                    "group {} nested to level {}, limit is {}",
                    group_index, level, max
                )
            }
            ConditionError::InputProcessor { message } => {
                write!(f, "invalid input document: {}", message)
            }
        }
    }
}

impl std::error::Error for ConditionError {}

/// An error attached to a values bag by the normalization pipeline.
/// Unlike [`ConditionError`], these accumulate on the tree itself and
/// flip `has_errors()` without discarding the condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValuesError {
    /// The raw value the error applies to.
    pub value: String,
    pub message: String,
}

impl ValuesError {
    pub fn new(value: impl Into<String>, message: impl Into<String>) -> Self {
        ValuesError {
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValuesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}': {}", self.value, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_errors_use_the_single_line_template() {
        let err = ConditionError::expected(17, "(", ";");
        assert_eq!(
            err.to_string(),
            "line 0, col 17: Error: Expected '(', got ';'"
        );
        match err {
            ConditionError::Syntax { position, .. } => assert_eq!(position, 17),
            other => panic!("expected Syntax, got {:?}", other),
        }
    }

    #[test]
    fn unsupported_value_type_names_the_kind() {
        let err = ConditionError::UnsupportedValueType {
            field: "age".into(),
            value_type: ValueKind::Range,
        };
        assert_eq!(err.to_string(), "field 'age' does not accept range values");
    }
}
