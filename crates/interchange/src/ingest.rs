//! Document to condition tree ingestion.
//!
//! Hand-walks the `serde_json::Value` shape and enforces the full
//! invariant set of the textual parser: catalog membership, value-kind
//! acceptance, the value/subgroup/nesting limits, and required fields.
//! Shape problems surface as `InputProcessor`; invariant violations
//! reuse the core taxonomy. No partial tree escapes an error.

use crate::document::*;
use serde_json::{Map, Value};
use sift_core::{
    CompareOp, CompareValue, Condition, ConditionError, FieldConfig, FieldSet, Logical,
    PatternKind, PatternValue, RangeValue, SingleValue, ValueKind, ValuesBag, ValuesGroup,
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_GROUPS, DEFAULT_MAX_VALUES,
};

/// Document processor with per-instance limits, mirroring the textual
/// parser's configuration surface.
pub struct DocumentIngestor {
    max_values: usize,
    max_groups: usize,
    max_depth: usize,
}

impl Default for DocumentIngestor {
    fn default() -> Self {
        DocumentIngestor::new()
    }
}

impl DocumentIngestor {
    pub fn new() -> Self {
        DocumentIngestor {
            max_values: DEFAULT_MAX_VALUES,
            max_groups: DEFAULT_MAX_GROUPS,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn set_max_values(&mut self, max: usize) {
        self.max_values = max;
    }

    pub fn set_max_groups(&mut self, max: usize) {
        self.max_groups = max;
    }

    pub fn set_max_depth(&mut self, max: usize) {
        self.max_depth = max;
    }

    /// Parse a JSON string and ingest it. Whitespace-only input yields
    /// no condition.
    pub fn process_str<'a>(
        &self,
        input: &str,
        field_set: &'a dyn FieldSet,
    ) -> Result<Option<Condition<'a>>, ConditionError> {
        if input.trim().is_empty() {
            return Ok(None);
        }
        let doc: Value =
            serde_json::from_str(input).map_err(|e| ConditionError::input(e.to_string()))?;
        self.process_value(&doc, field_set)
    }

    /// Ingest an already-parsed document. An empty object yields no
    /// condition.
    pub fn process_value<'a>(
        &self,
        doc: &Value,
        field_set: &'a dyn FieldSet,
    ) -> Result<Option<Condition<'a>>, ConditionError> {
        let obj = doc
            .as_object()
            .ok_or_else(|| ConditionError::input("document root must be an object"))?;
        if obj.is_empty() {
            return Ok(None);
        }
        let mut root = ValuesGroup::new(Logical::And);
        self.ingest_group(obj, field_set, &mut root, 0, 0)?;
        Ok(Some(Condition::with_root(field_set, root)))
    }

    fn ingest_group(
        &self,
        obj: &Map<String, Value>,
        field_set: &dyn FieldSet,
        group: &mut ValuesGroup,
        level: usize,
        group_index: usize,
    ) -> Result<(), ConditionError> {
        if let Some(v) = obj.get(KEY_LOGICAL) {
            let s = v
                .as_str()
                .ok_or_else(|| ConditionError::input("'logical' must be a string"))?;
            let logical = Logical::from_str_opt(s)
                .ok_or_else(|| ConditionError::input(format!("unknown logical mode '{}'", s)))?;
            group.set_logical(logical);
        }

        if let Some(fields_v) = obj.get(KEY_FIELDS) {
            let fields_obj = fields_v
                .as_object()
                .ok_or_else(|| ConditionError::input("'fields' must be an object"))?;
            for (name, bag_v) in fields_obj {
                let Some(config) = field_set.get(name) else {
                    return Err(ConditionError::UnknownField {
                        field: name.clone(),
                    });
                };
                let bag_obj = bag_v.as_object().ok_or_else(|| {
                    ConditionError::input(format!("field '{}' must map to an object", name))
                })?;
                let mut bag = ValuesBag::new();
                self.ingest_bag(bag_obj, config, &mut bag, level, group_index)?;
                group.add_field(name.clone(), bag);
            }
        }

        if let Some(groups_v) = obj.get(KEY_GROUPS) {
            let entries = groups_v
                .as_array()
                .ok_or_else(|| ConditionError::input("'groups' must be an array"))?;
            for child_v in entries {
                let child_obj = child_v
                    .as_object()
                    .ok_or_else(|| ConditionError::input("group entries must be objects"))?;
                let child_level = level + 1;
                let child_index = group.group_count();
                if child_level > self.max_depth {
                    return Err(ConditionError::GroupsNesting {
                        max: self.max_depth,
                        group_index: child_index,
                        level: child_level,
                    });
                }
                if child_index + 1 > self.max_groups {
                    return Err(ConditionError::GroupsOverflow {
                        max: self.max_groups,
                        current: child_index + 1,
                        group_index,
                        level,
                    });
                }
                let mut child = ValuesGroup::new(Logical::And);
                self.ingest_group(child_obj, field_set, &mut child, child_level, child_index)?;
                group.add_group(child);
            }
        }

        if !group.is_empty() {
            for config in field_set.all() {
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

    fn ingest_bag(
        &self,
        obj: &Map<String, Value>,
        config: &FieldConfig,
        bag: &mut ValuesBag,
        level: usize,
        group_index: usize,
    ) -> Result<(), ConditionError> {
        if let Some(entries) = get_array(obj, KEY_SINGLE_VALUES)? {
            for entry in entries {
                let raw = scalar_string(entry).ok_or_else(|| {
                    ConditionError::input(format!("'{}' entries must be strings", KEY_SINGLE_VALUES))
                })?;
                bag.add_single(SingleValue::new(raw));
                self.check_limit(bag, config, level, group_index)?;
            }
        }

        if let Some(entries) = get_array(obj, KEY_EXCLUDED_VALUES)? {
            for entry in entries {
                let raw = scalar_string(entry).ok_or_else(|| {
                    ConditionError::input(format!(
                        "'{}' entries must be strings",
                        KEY_EXCLUDED_VALUES
                    ))
                })?;
                bag.add_excluded_single(SingleValue::new(raw));
                self.check_limit(bag, config, level, group_index)?;
            }
        }

        if let Some(entries) = get_array(obj, KEY_RANGES)? {
            for entry in entries {
                let range = ingest_range(entry)?;
                assert_accepts(config, ValueKind::Range)?;
                bag.add_range(range);
                self.check_limit(bag, config, level, group_index)?;
            }
        }

        if let Some(entries) = get_array(obj, KEY_EXCLUDED_RANGES)? {
            for entry in entries {
                let range = ingest_range(entry)?;
                assert_accepts(config, ValueKind::ExcludedRange)?;
                bag.add_excluded_range(range);
                self.check_limit(bag, config, level, group_index)?;
            }
        }

        if let Some(entries) = get_array(obj, KEY_COMPARISONS)? {
            for entry in entries {
                let entry_obj = entry
                    .as_object()
                    .ok_or_else(|| ConditionError::input("comparison entries must be objects"))?;
                let operand = required_string(entry_obj, KEY_VALUE, "comparison")?;
                let symbol = required_string(entry_obj, KEY_OPERATOR, "comparison")?;
                let op = CompareOp::from_symbol(&symbol).ok_or_else(|| {
                    ConditionError::input(format!("unknown comparison operator '{}'", symbol))
                })?;
                assert_accepts(config, ValueKind::Compare)?;
                bag.add_compare(CompareValue::new(op, SingleValue::new(operand)));
                self.check_limit(bag, config, level, group_index)?;
            }
        }

        if let Some(entries) = get_array(obj, KEY_PATTERN_MATCHERS)? {
            for entry in entries {
                let entry_obj = entry.as_object().ok_or_else(|| {
                    ConditionError::input("pattern-matcher entries must be objects")
                })?;
                let pattern = required_string(entry_obj, KEY_VALUE, "pattern-matcher")?;
                let type_name = required_string(entry_obj, KEY_TYPE, "pattern-matcher")?;
                let kind = PatternKind::from_name(&type_name).ok_or_else(|| {
                    ConditionError::input(format!("unknown pattern-matcher type '{}'", type_name))
                })?;
                let case_insensitive = bool_or(entry_obj, KEY_CASE_INSENSITIVE, false)?;
                assert_accepts(config, ValueKind::Pattern)?;
                bag.add_pattern(PatternValue::new(
                    kind,
                    SingleValue::new(pattern),
                    case_insensitive,
                ));
                self.check_limit(bag, config, level, group_index)?;
            }
        }

        Ok(())
    }

    fn check_limit(
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

fn ingest_range(entry: &Value) -> Result<RangeValue, ConditionError> {
    let obj = entry
        .as_object()
        .ok_or_else(|| ConditionError::input("range entries must be objects"))?;
    let lower = required_string(obj, KEY_LOWER, "range")?;
    let upper = required_string(obj, KEY_UPPER, "range")?;
    let lower_inclusive = bool_or(obj, KEY_INCLUSIVE_LOWER, true)?;
    let upper_inclusive = bool_or(obj, KEY_INCLUSIVE_UPPER, true)?;
    Ok(RangeValue::bounds(
        SingleValue::new(lower),
        SingleValue::new(upper),
        lower_inclusive,
        upper_inclusive,
    ))
}

fn assert_accepts(config: &FieldConfig, kind: ValueKind) -> Result<(), ConditionError> {
    if config.accepts(kind) {
        Ok(())
    } else {
        Err(ConditionError::UnsupportedValueType {
            field: config.name().to_string(),
            value_type: kind,
        })
    }
}

fn get_array<'v>(
    obj: &'v Map<String, Value>,
    key: &str,
) -> Result<Option<&'v Vec<Value>>, ConditionError> {
    match obj.get(key) {
        None => Ok(None),
        Some(v) => v
            .as_array()
            .map(Some)
            .ok_or_else(|| ConditionError::input(format!("'{}' must be an array", key))),
    }
}

/// Strings stay as-is; numbers are taken by their literal rendering.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn required_string(
    obj: &Map<String, Value>,
    key: &str,
    context: &str,
) -> Result<String, ConditionError> {
    obj.get(key)
        .and_then(scalar_string)
        .ok_or_else(|| ConditionError::input(format!("{} entry missing '{}'", context, key)))
}

/// Accepts JSON booleans and the strings "true"/"false" (the XML-style
/// spelling).
fn bool_or(obj: &Map<String, Value>, key: &str, default: bool) -> Result<bool, ConditionError> {
    match obj.get(key) {
        None => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::String(s)) if s == "true" => Ok(true),
        Some(Value::String(s)) if s == "false" => Ok(false),
        Some(_) => Err(ConditionError::input(format!(
            "'{}' must be a boolean",
            key
        ))),
    }
}
