//! Document codec: emit shape and key order, ingest round-trip,
//! defaults, and invariant enforcement.

use serde_json::json;
use sift_core::{
    CompareOp, ConditionBuilder, ConditionError, FieldConfig, FieldKind, Logical, PatternKind,
    SimpleFieldSet, ValueKind,
};
use sift_interchange::{to_document, to_json_string, DocumentIngestor};

fn catalog() -> SimpleFieldSet {
    SimpleFieldSet::new()
        .with(
            FieldConfig::builder("name", FieldKind::Text)
                .patterns(true)
                .build(),
        )
        .with(
            FieldConfig::builder("num", FieldKind::Integer)
                .ranges(true)
                .compares(true)
                .build(),
        )
}

#[test]
fn emit_covers_every_value_kind() {
    let fields = catalog();
    let condition = ConditionBuilder::create(&fields)
        .field("num")
        .single("1")
        .excluded_single("2")
        .range_bounds("3", "9", false, true)
        .excluded_range("20", "30")
        .compare(CompareOp::Gte, "5")
        .end()
        .field("name")
        .pattern(PatternKind::NotEndsWith, "bla", true)
        .end()
        .group(Logical::Or)
        .field("num")
        .single("7")
        .end()
        .end_group()
        .build();

    let doc = to_document(&condition);
    assert_eq!(
        doc,
        json!({
            "logical": "AND",
            "fields": {
                "num": {
                    "single-values": ["1"],
                    "excluded-values": ["2"],
                    "ranges": [{ "lower": "3", "upper": "9", "inclusive-lower": false }],
                    "excluded-ranges": [{ "lower": "20", "upper": "30" }],
                    "comparisons": [{ "value": "5", "operator": ">=" }],
                },
                "name": {
                    "pattern-matchers": [
                        { "value": "bla", "type": "NOT_ENDS_WITH", "case-insensitive": true }
                    ],
                },
            },
            "groups": [
                {
                    "logical": "OR",
                    "fields": { "num": { "single-values": ["7"] } },
                }
            ],
        })
    );
}

#[test]
fn emitted_keys_follow_tree_and_bag_order() {
    let fields = SimpleFieldSet::new()
        .with(FieldConfig::builder("b", FieldKind::Text).build())
        .with(FieldConfig::builder("a", FieldKind::Integer).ranges(true).build());
    let condition = ConditionBuilder::create(&fields)
        .field("b")
        .single("x")
        .end()
        .field("a")
        .range("1", "2")
        .single("3")
        .end()
        .build();

    let text = to_json_string(&condition);
    // Field insertion order survives serialization.
    assert!(text.find("\"b\"").unwrap() < text.find("\"a\"").unwrap());
    // Bag kinds keep their fixed order regardless of insertion order.
    assert!(text.find("single-values").unwrap() < text.find("ranges").unwrap());
}

#[test]
fn ingest_round_trips_emitted_documents() {
    let fields = catalog();
    let condition = ConditionBuilder::create(&fields)
        .field("num")
        .single("1")
        .range_bounds("3", "9", false, false)
        .compare(CompareOp::Neq, "4")
        .end()
        .group(Logical::Or)
        .field("name")
        .pattern(PatternKind::Contains, "x", false)
        .end()
        .end_group()
        .build();

    let doc = to_document(&condition);
    let back = DocumentIngestor::new()
        .process_value(&doc, &fields)
        .unwrap()
        .unwrap();
    assert_eq!(back.root(), condition.root());
}

#[test]
fn missing_keys_fall_back_to_defaults() {
    let fields = catalog();
    let doc = json!({
        "fields": {
            "num": { "ranges": [{ "lower": "1", "upper": "2" }] },
            "name": { "pattern-matchers": [{ "value": "x", "type": "CONTAINS" }] },
        }
    });
    let condition = DocumentIngestor::new()
        .process_value(&doc, &fields)
        .unwrap()
        .unwrap();

    assert_eq!(condition.root().logical(), Logical::And);
    let range = condition
        .root()
        .get_field("num")
        .unwrap()
        .ranges()
        .next()
        .unwrap()
        .clone();
    assert!(range.lower_inclusive && range.upper_inclusive);
    let pattern = condition
        .root()
        .get_field("name")
        .unwrap()
        .patterns()
        .next()
        .unwrap()
        .clone();
    assert!(!pattern.case_insensitive);
}

#[test]
fn stringly_booleans_and_numeric_scalars_are_accepted() {
    let fields = catalog();
    let doc = json!({
        "fields": {
            "num": {
                "single-values": [10],
                "ranges": [{ "lower": 1, "upper": 2, "inclusive-upper": "false" }],
            },
        }
    });
    let condition = DocumentIngestor::new()
        .process_value(&doc, &fields)
        .unwrap()
        .unwrap();
    let bag = condition.root().get_field("num").unwrap();
    assert_eq!(bag.singles().next().unwrap().raw, "10");
    let range = bag.ranges().next().unwrap();
    assert_eq!(range.lower.raw, "1");
    assert!(!range.upper_inclusive);
}

#[test]
fn empty_documents_yield_no_condition() {
    let fields = catalog();
    let ingestor = DocumentIngestor::new();
    assert!(ingestor.process_str("", &fields).unwrap().is_none());
    assert!(ingestor.process_str("  ", &fields).unwrap().is_none());
    assert!(ingestor.process_str("{}", &fields).unwrap().is_none());
}

#[test]
fn malformed_documents_are_input_errors() {
    let fields = catalog();
    let ingestor = DocumentIngestor::new();

    assert!(matches!(
        ingestor.process_str("not json", &fields),
        Err(ConditionError::InputProcessor { .. })
    ));
    assert!(matches!(
        ingestor.process_value(&json!([1, 2]), &fields),
        Err(ConditionError::InputProcessor { .. })
    ));
    assert!(matches!(
        ingestor.process_value(&json!({ "logical": "XOR" }), &fields),
        Err(ConditionError::InputProcessor { .. })
    ));
    assert!(matches!(
        ingestor.process_value(
            &json!({ "fields": { "num": { "comparisons": [{ "value": "1", "operator": "==" }] } } }),
            &fields
        ),
        Err(ConditionError::InputProcessor { .. })
    ));
    assert!(matches!(
        ingestor.process_value(
            &json!({ "fields": { "name": { "pattern-matchers": [{ "value": "x", "type": "GLOB" }] } } }),
            &fields
        ),
        Err(ConditionError::InputProcessor { .. })
    ));
}

#[test]
fn catalog_violations_reuse_the_core_taxonomy() {
    let fields = catalog();
    let ingestor = DocumentIngestor::new();

    let err = ingestor
        .process_value(&json!({ "fields": { "nope": {} } }), &fields)
        .unwrap_err();
    assert_eq!(err, ConditionError::UnknownField { field: "nope".into() });

    let err = ingestor
        .process_value(
            &json!({ "fields": { "name": { "ranges": [{ "lower": "1", "upper": "2" }] } } }),
            &fields,
        )
        .unwrap_err();
    assert_eq!(
        err,
        ConditionError::UnsupportedValueType {
            field: "name".into(),
            value_type: ValueKind::Range,
        }
    );
}

#[test]
fn limits_apply_to_documents_too() {
    let fields = catalog();
    let mut ingestor = DocumentIngestor::new();
    ingestor.set_max_values(2);
    let err = ingestor
        .process_value(
            &json!({ "fields": { "num": { "single-values": ["1", "2", "3"] } } }),
            &fields,
        )
        .unwrap_err();
    assert_eq!(
        err,
        ConditionError::ValuesOverflow {
            field: "num".into(),
            max: 2,
            current: 3,
            group_index: 0,
            level: 0,
        }
    );

    let mut ingestor = DocumentIngestor::new();
    ingestor.set_max_depth(1);
    let err = ingestor
        .process_value(
            &json!({ "groups": [{ "groups": [{ "fields": { "num": { "single-values": ["1"] } } }] }] }),
            &fields,
        )
        .unwrap_err();
    assert_eq!(
        err,
        ConditionError::GroupsNesting {
            max: 1,
            group_index: 0,
            level: 2,
        }
    );
}

#[test]
fn required_fields_are_enforced_per_group() {
    let fields = SimpleFieldSet::new()
        .with(
            FieldConfig::builder("id", FieldKind::Integer)
                .required(true)
                .build(),
        )
        .with(FieldConfig::builder("name", FieldKind::Text).build());
    let ingestor = DocumentIngestor::new();

    assert!(ingestor
        .process_value(
            &json!({ "fields": { "id": { "single-values": ["1"] } } }),
            &fields
        )
        .is_ok());

    let err = ingestor
        .process_value(
            &json!({ "fields": { "name": { "single-values": ["x"] } } }),
            &fields,
        )
        .unwrap_err();
    assert_eq!(
        err,
        ConditionError::FieldRequired {
            field: "id".into(),
            group_index: 0,
            level: 0,
        }
    );
}
