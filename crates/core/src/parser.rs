//! FilterQuery parser: recursive descent over the token stream into a
//! condition tree.
//!
//! Errors fail the whole `process` call; no partial tree escapes. The
//! value, subgroup, and nesting limits are read at the start of each
//! `process` and enforced as the tree grows, which bounds worst-case
//! work before a limit error terminates the parse.

use crate::bag::ValuesBag;
use crate::condition::Condition;
use crate::error::ConditionError;
use crate::field::{FieldConfig, FieldSet};
use crate::group::{Logical, ValuesGroup};
use crate::lexer::{self, Token, TokenKind, TokenStream};
use crate::value::{
    CompareOp, CompareValue, PatternKind, PatternValue, RangeValue, SingleValue, ValueKind,
};
use crate::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_GROUPS, DEFAULT_MAX_VALUES};
use std::fmt;

/// FilterQuery processor with per-instance limits.
pub struct FilterQueryParser {
    max_values: usize,
    max_groups: usize,
    max_depth: usize,
}

impl Default for FilterQueryParser {
    fn default() -> Self {
        FilterQueryParser::new()
    }
}

impl FilterQueryParser {
    pub fn new() -> Self {
        FilterQueryParser {
            max_values: DEFAULT_MAX_VALUES,
            max_groups: DEFAULT_MAX_GROUPS,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Per-field value limit, cumulative across repeated mentions of a
    /// field in the same group.
    pub fn set_max_values(&mut self, max: usize) {
        self.max_values = max;
    }

    /// Direct subgroup limit per group.
    pub fn set_max_groups(&mut self, max: usize) {
        self.max_groups = max;
    }

    /// Nesting limit, counted from the root (root = 0).
    pub fn set_max_depth(&mut self, max: usize) {
        self.max_depth = max;
    }

    /// Parse `input` against `field_set`. Whitespace-only input yields
    /// no condition.
    pub fn process<'a>(
        &self,
        input: &str,
        field_set: &'a dyn FieldSet,
    ) -> Result<Option<Condition<'a>>, ConditionError> {
        if input.trim().is_empty() {
            return Ok(None);
        }
        let stream = lexer::tokenize(input)?;
        let mut parse = Parse {
            stream,
            field_set,
            max_values: self.max_values,
            max_groups: self.max_groups,
            max_depth: self.max_depth,
        };
        let mut root = ValuesGroup::new(Logical::And);
        parse.group_body(&mut root, 0, 0)?;
        Ok(Some(Condition::with_root(field_set, root)))
    }
}

// ──────────────────────────────────────────────
// Parse state
// ──────────────────────────────────────────────

struct Parse<'a> {
    stream: TokenStream,
    field_set: &'a dyn FieldSet,
    max_values: usize,
    max_groups: usize,
    max_depth: usize,
}

impl<'a> Parse<'a> {
    fn peek(&self) -> &Token {
        self.stream.glimpse()
    }

    fn advance(&mut self) -> Token {
        self.stream.advance()
    }

    fn expected(&self, expected: impl fmt::Display) -> ConditionError {
        let got = self.peek();
        ConditionError::expected(got.pos, expected, got.describe())
    }

    /// `{ FieldPair | Group } [";"]` until the matching `)` (for
    /// subgroups) or end of input (for the root). Closes with the
    /// required-field check when the group holds anything.
    fn group_body(
        &mut self,
        group: &mut ValuesGroup,
        level: usize,
        group_index: usize,
    ) -> Result<(), ConditionError> {
        loop {
            match self.peek().kind {
                TokenKind::Eof => break,
                TokenKind::RParen if level > 0 => break,
                TokenKind::Identifier => self.field_pair(group, level, group_index)?,
                TokenKind::Star | TokenKind::LParen => self.group(group, level, group_index)?,
                TokenKind::Semicolon => {
                    // Optional trailing separator before the group close
                    // or the end of input.
                    self.advance();
                    match self.peek().kind {
                        TokenKind::Eof => {}
                        TokenKind::RParen if level > 0 => {}
                        _ => return Err(self.expected("field or group")),
                    }
                }
                _ => return Err(self.expected("field or group")),
            }
        }

        if !group.is_empty() {
            for config in self.field_set.all() {
                if config.is_required() && !group.has_field(config.name()) {
                    return Err(ConditionError::FieldRequired {
                        field: config.name().to_string(),
                        group_index,
                        level,
                    });
                }
            }
        }
        Ok(())
    }

    /// `["*"] "(" … ")" [";"]` appended to `parent`.
    fn group(
        &mut self,
        parent: &mut ValuesGroup,
        parent_level: usize,
        parent_index: usize,
    ) -> Result<(), ConditionError> {
        let logical = if self.peek().kind == TokenKind::Star {
            self.advance();
            Logical::Or
        } else {
            Logical::And
        };
        if self.peek().kind != TokenKind::LParen {
            return Err(self.expected("("));
        }
        self.advance();

        let level = parent_level + 1;
        let child_index = parent.group_count();
        if level > self.max_depth {
            return Err(ConditionError::GroupsNesting {
                max: self.max_depth,
                group_index: child_index,
                level,
            });
        }
        let current = child_index + 1;
        if current > self.max_groups {
            return Err(ConditionError::GroupsOverflow {
                max: self.max_groups,
                current,
                group_index: parent_index,
                level: parent_level,
            });
        }

        let mut child = ValuesGroup::new(logical);
        self.group_body(&mut child, level, child_index)?;
        if self.peek().kind != TokenKind::RParen {
            return Err(self.expected(")"));
        }
        self.advance();
        if self.peek().kind == TokenKind::Semicolon {
            self.advance();
        }
        parent.add_group(child);
        Ok(())
    }

    /// `IDENTIFIER Values [";"]`. A repeated field name merges into its
    /// existing bag; the value limit applies to the merged count.
    fn field_pair(
        &mut self,
        group: &mut ValuesGroup,
        level: usize,
        group_index: usize,
    ) -> Result<(), ConditionError> {
        let name = self.advance().text;
        let field_set = self.field_set;
        let Some(config) = field_set.get(&name) else {
            return Err(ConditionError::UnknownField { field: name });
        };

        let mut bag = group.take_field(&name).unwrap_or_default();
        loop {
            self.value(&mut bag, config, level, group_index)?;
            match self.peek().kind {
                TokenKind::Comma => {
                    self.advance();
                }
                TokenKind::Semicolon => {
                    self.advance();
                    break;
                }
                TokenKind::RParen | TokenKind::Eof => break,
                _ => return Err(self.expected(",")),
            }
        }
        group.add_field(name, bag);
        Ok(())
    }

    fn value(
        &mut self,
        bag: &mut ValuesBag,
        config: &FieldConfig,
        level: usize,
        group_index: usize,
    ) -> Result<(), ConditionError> {
        match self.peek().kind {
            TokenKind::Bang => {
                self.advance();
                self.excluded_value(bag, config, level, group_index)
            }
            TokenKind::Lt | TokenKind::Gt => self.compare_value(bag, config, level, group_index),
            TokenKind::Tilde => self.pattern_value(bag, config, level, group_index),
            TokenKind::LBracket | TokenKind::RBracket => {
                // A leading `]` opens the range lower-exclusive, `[` is
                // the explicit inclusive form.
                let lower_inclusive = self.advance().kind == TokenKind::LBracket;
                let lower = self.simple_value()?;
                self.range_value(bag, config, lower, lower_inclusive, false, level, group_index)
            }
            TokenKind::Str | TokenKind::QuotedStr | TokenKind::Integer | TokenKind::Float => {
                let value = self.simple_value()?;
                if self.peek().kind == TokenKind::Minus {
                    self.range_value(bag, config, value, true, false, level, group_index)
                } else {
                    self.assert_accepts(config, ValueKind::Single)?;
                    bag.add_single(value);
                    self.check_values_limit(bag, config, level, group_index)
                }
            }
            _ => Err(self.expected("value")),
        }
    }

    /// The token after `!`: a simple value, or anything that starts a
    /// range (a bracket, or an operand followed by `-`).
    fn excluded_value(
        &mut self,
        bag: &mut ValuesBag,
        config: &FieldConfig,
        level: usize,
        group_index: usize,
    ) -> Result<(), ConditionError> {
        match self.peek().kind {
            TokenKind::LBracket | TokenKind::RBracket => {
                let lower_inclusive = self.advance().kind == TokenKind::LBracket;
                let lower = self.simple_value()?;
                self.range_value(bag, config, lower, lower_inclusive, true, level, group_index)
            }
            TokenKind::Str | TokenKind::QuotedStr | TokenKind::Integer | TokenKind::Float => {
                let value = self.simple_value()?;
                if self.peek().kind == TokenKind::Minus {
                    self.range_value(bag, config, value, true, true, level, group_index)
                } else {
                    self.assert_accepts(config, ValueKind::ExcludedSingle)?;
                    bag.add_excluded_single(value);
                    self.check_values_limit(bag, config, level, group_index)
                }
            }
            _ => Err(self.expected("value")),
        }
    }

    /// Lower bound already consumed; the cursor sits on `-`. Either
    /// closing bracket marks the upper bound exclusive.
    #[allow(clippy::too_many_arguments)]
    fn range_value(
        &mut self,
        bag: &mut ValuesBag,
        config: &FieldConfig,
        lower: SingleValue,
        lower_inclusive: bool,
        excluded: bool,
        level: usize,
        group_index: usize,
    ) -> Result<(), ConditionError> {
        if self.peek().kind != TokenKind::Minus {
            return Err(self.expected("-"));
        }
        self.advance();
        let upper = self.simple_value()?;
        let upper_inclusive = !matches!(
            self.peek().kind,
            TokenKind::LBracket | TokenKind::RBracket
        );
        if !upper_inclusive {
            self.advance();
        }

        let kind = if excluded {
            ValueKind::ExcludedRange
        } else {
            ValueKind::Range
        };
        self.assert_accepts(config, kind)?;
        let range = RangeValue::bounds(lower, upper, lower_inclusive, upper_inclusive);
        if excluded {
            bag.add_excluded_range(range);
        } else {
            bag.add_range(range);
        }
        self.check_values_limit(bag, config, level, group_index)
    }

    /// `("<" ["="] | "<>" | ">" ["="]) SimpleValue`.
    fn compare_value(
        &mut self,
        bag: &mut ValuesBag,
        config: &FieldConfig,
        level: usize,
        group_index: usize,
    ) -> Result<(), ConditionError> {
        let first = self.advance();
        let op = if first.kind == TokenKind::Lt {
            match self.peek().kind {
                TokenKind::Equals => {
                    self.advance();
                    CompareOp::Lte
                }
                TokenKind::Gt => {
                    self.advance();
                    CompareOp::Neq
                }
                _ => CompareOp::Lt,
            }
        } else if self.peek().kind == TokenKind::Equals {
            self.advance();
            CompareOp::Gte
        } else {
            CompareOp::Gt
        };
        let operand = self.simple_value()?;
        self.assert_accepts(config, ValueKind::Compare)?;
        bag.add_compare(CompareValue::new(op, operand));
        self.check_values_limit(bag, config, level, group_index)
    }

    /// `"~" ["i"] ["!"] ("*"|">"|"<"|"?") SimpleValue`. Only this order
    /// is accepted; `~!i` is a syntax error.
    fn pattern_value(
        &mut self,
        bag: &mut ValuesBag,
        config: &FieldConfig,
        level: usize,
        group_index: usize,
    ) -> Result<(), ConditionError> {
        self.advance();
        let mut case_insensitive = false;
        if self.peek().kind == TokenKind::Str && self.peek().text.eq_ignore_ascii_case("i") {
            self.advance();
            case_insensitive = true;
        }
        let negated = if self.peek().kind == TokenKind::Bang {
            self.advance();
            true
        } else {
            false
        };
        let base = match self.peek().kind {
            TokenKind::Star => PatternKind::Contains,
            TokenKind::Gt => PatternKind::StartsWith,
            TokenKind::Lt => PatternKind::EndsWith,
            TokenKind::Question => PatternKind::Regex,
            _ => return Err(self.expected("pattern operator")),
        };
        self.advance();
        let pattern = self.simple_value()?;

        let kind = if negated { base.negated() } else { base };
        self.assert_accepts(config, ValueKind::Pattern)?;
        bag.add_pattern(PatternValue::new(kind, pattern, case_insensitive));
        self.check_values_limit(bag, config, level, group_index)
    }

    fn simple_value(&mut self) -> Result<SingleValue, ConditionError> {
        match self.peek().kind {
            TokenKind::Str | TokenKind::QuotedStr | TokenKind::Integer | TokenKind::Float => {
                Ok(SingleValue::new(self.advance().text))
            }
            _ => Err(self.expected("value")),
        }
    }

    fn assert_accepts(&self, config: &FieldConfig, kind: ValueKind) -> Result<(), ConditionError> {
        if config.accepts(kind) {
            Ok(())
        } else {
            Err(ConditionError::UnsupportedValueType {
                field: config.name().to_string(),
                value_type: kind,
            })
        }
    }

    fn check_values_limit(
        &self,
        bag: &ValuesBag,
        config: &FieldConfig,
        level: usize,
        group_index: usize,
    ) -> Result<(), ConditionError> {
        if bag.count() > self.max_values {
            return Err(ConditionError::ValuesOverflow {
                field: config.name().to_string(),
                max: self.max_values,
                current: bag.count(),
                group_index,
                level,
            });
        }
        Ok(())
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
