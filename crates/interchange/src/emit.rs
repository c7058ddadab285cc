//! Condition tree to document emission.
//!
//! Field keys keep the tree's insertion order (the crate enables
//! serde_json's `preserve_order`); bag kinds appear in their fixed
//! order; empty sequences and default flags are omitted. Emission is
//! infallible and deterministic.

use crate::document::*;
use serde_json::{Map, Value};
use sift_core::{Condition, RangeValue, ValuesBag, ValuesGroup};

pub fn to_document(condition: &Condition<'_>) -> Value {
    emit_group(condition.root())
}

pub fn to_json_string(condition: &Condition<'_>) -> String {
    to_document(condition).to_string()
}

fn emit_group(group: &ValuesGroup) -> Value {
    let mut obj = Map::new();
    obj.insert(
        KEY_LOGICAL.to_string(),
        Value::String(group.logical().as_str().to_string()),
    );

    let mut fields = Map::new();
    for (name, bag) in group.fields() {
        if bag.is_empty() {
            continue;
        }
        fields.insert(name.to_string(), emit_bag(bag));
    }
    if !fields.is_empty() {
        obj.insert(KEY_FIELDS.to_string(), Value::Object(fields));
    }

    if group.group_count() > 0 {
        obj.insert(
            KEY_GROUPS.to_string(),
            Value::Array(group.groups().iter().map(emit_group).collect()),
        );
    }
    Value::Object(obj)
}

fn emit_bag(bag: &ValuesBag) -> Value {
    let mut obj = Map::new();

    let singles: Vec<Value> = bag
        .singles()
        .map(|v| Value::String(v.raw.clone()))
        .collect();
    if !singles.is_empty() {
        obj.insert(KEY_SINGLE_VALUES.to_string(), Value::Array(singles));
    }

    let excluded: Vec<Value> = bag
        .excluded_singles()
        .map(|v| Value::String(v.raw.clone()))
        .collect();
    if !excluded.is_empty() {
        obj.insert(KEY_EXCLUDED_VALUES.to_string(), Value::Array(excluded));
    }

    let ranges: Vec<Value> = bag.ranges().map(emit_range).collect();
    if !ranges.is_empty() {
        obj.insert(KEY_RANGES.to_string(), Value::Array(ranges));
    }

    let excluded_ranges: Vec<Value> = bag.excluded_ranges().map(emit_range).collect();
    if !excluded_ranges.is_empty() {
        obj.insert(KEY_EXCLUDED_RANGES.to_string(), Value::Array(excluded_ranges));
    }

    let compares: Vec<Value> = bag
        .compares()
        .map(|c| {
            let mut entry = Map::new();
            entry.insert(KEY_VALUE.to_string(), Value::String(c.operand.raw.clone()));
            entry.insert(
                KEY_OPERATOR.to_string(),
                Value::String(c.op.symbol().to_string()),
            );
            Value::Object(entry)
        })
        .collect();
    if !compares.is_empty() {
        obj.insert(KEY_COMPARISONS.to_string(), Value::Array(compares));
    }

    let patterns: Vec<Value> = bag
        .patterns()
        .map(|p| {
            let mut entry = Map::new();
            entry.insert(KEY_VALUE.to_string(), Value::String(p.pattern.raw.clone()));
            entry.insert(KEY_TYPE.to_string(), Value::String(p.kind.name().to_string()));
            if p.case_insensitive {
                entry.insert(KEY_CASE_INSENSITIVE.to_string(), Value::Bool(true));
            }
            Value::Object(entry)
        })
        .collect();
    if !patterns.is_empty() {
        obj.insert(KEY_PATTERN_MATCHERS.to_string(), Value::Array(patterns));
    }

    Value::Object(obj)
}

fn emit_range(range: &RangeValue) -> Value {
    let mut entry = Map::new();
    entry.insert(KEY_LOWER.to_string(), Value::String(range.lower.raw.clone()));
    entry.insert(KEY_UPPER.to_string(), Value::String(range.upper.raw.clone()));
    if !range.lower_inclusive {
        entry.insert(KEY_INCLUSIVE_LOWER.to_string(), Value::Bool(false));
    }
    if !range.upper_inclusive {
        entry.insert(KEY_INCLUSIVE_UPPER.to_string(), Value::Bool(false));
    }
    Value::Object(entry)
}
