//! End-to-end FilterQuery scenarios: parse shapes, limit errors, and
//! canonical export output.

use sift_core::{
    CompareOp, Condition, ConditionBuilder, ConditionError, FieldConfig, FieldKind,
    FilterQueryExporter, FilterQueryParser, LabelResolver, Logical, PatternKind, SimpleFieldSet,
};

fn catalog() -> SimpleFieldSet {
    SimpleFieldSet::new().with(
        FieldConfig::builder("field1", FieldKind::Text)
            .ranges(true)
            .compares(true)
            .patterns(true)
            .build(),
    )
}

fn parse<'a>(fields: &'a SimpleFieldSet, src: &str) -> Condition<'a> {
    FilterQueryParser::new()
        .process(src, fields)
        .unwrap()
        .unwrap()
}

fn export(condition: &Condition<'_>) -> String {
    FilterQueryExporter::new().export(condition)
}

#[test]
fn two_barewords_land_in_one_bag() {
    let fields = catalog();
    let condition = parse(&fields, "field1: value, value2;");

    let root = condition.root();
    assert_eq!(root.logical(), Logical::And);
    assert_eq!(root.field_count(), 1);
    assert_eq!(root.group_count(), 0);

    let raws: Vec<&str> = root
        .get_field("field1")
        .unwrap()
        .singles()
        .map(|v| v.raw.as_str())
        .collect();
    assert_eq!(raws, ["value", "value2"]);
}

#[test]
fn bracketed_and_excluded_ranges() {
    let fields = catalog();
    let condition = parse(&fields, "field1: ]1 - 10[, !15 - 30;");
    let bag = condition.root().get_field("field1").unwrap();

    let range = bag.ranges().next().unwrap();
    assert_eq!(range.lower.raw, "1");
    assert_eq!(range.upper.raw, "10");
    assert!(!range.lower_inclusive);
    assert!(!range.upper_inclusive);

    let excluded = bag.excluded_ranges().next().unwrap();
    assert_eq!(excluded.lower.raw, "15");
    assert_eq!(excluded.upper.raw, "30");
    assert!(excluded.lower_inclusive);
    assert!(excluded.upper_inclusive);
}

#[test]
fn pattern_matchers_with_flags_and_regex() {
    let fields = catalog();
    let condition = parse(&fields, r#"field1: ~i!*bla, ~?"(\w+|\d+)";"#);
    let patterns: Vec<_> = condition
        .root()
        .get_field("field1")
        .unwrap()
        .patterns()
        .cloned()
        .collect();

    assert_eq!(patterns[0].kind, PatternKind::NotContains);
    assert_eq!(patterns[0].pattern.raw, "bla");
    assert!(patterns[0].case_insensitive);
    assert!(patterns[0].kind.is_exclusive());

    assert_eq!(patterns[1].kind, PatternKind::Regex);
    assert_eq!(patterns[1].pattern.raw, r"(\w+|\d+)");
    assert!(!patterns[1].case_insensitive);
}

#[test]
fn field_and_subgroup_side_by_side() {
    let fields = catalog();
    let condition = parse(&fields, "field1: value; (field1: v3, v4);");

    let root = condition.root();
    assert_eq!(root.field_count(), 1);
    assert_eq!(root.group_count(), 1);

    let sub = &root.groups()[0];
    assert_eq!(sub.logical(), Logical::And);
    let raws: Vec<&str> = sub
        .get_field("field1")
        .unwrap()
        .singles()
        .map(|v| v.raw.as_str())
        .collect();
    assert_eq!(raws, ["v3", "v4"]);
}

#[test]
fn starred_group_becomes_an_or_subgroup() {
    let fields = catalog();
    let condition = parse(&fields, "*(field1: value, value2);");

    let root = condition.root();
    assert_eq!(root.logical(), Logical::And);
    assert_eq!(root.field_count(), 0);
    assert_eq!(root.group_count(), 1);

    let sub = &root.groups()[0];
    assert_eq!(sub.logical(), Logical::Or);
    assert_eq!(sub.get_field("field1").unwrap().count(), 2);
}

#[test]
fn nesting_past_the_depth_limit_fails() {
    let fields = catalog();
    let mut parser = FilterQueryParser::new();
    parser.set_max_depth(1);
    let err = parser.process("((field1: v))", &fields).unwrap_err();
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
fn export_quoting_table() {
    let fields = catalog();
    let condition = ConditionBuilder::create(&fields)
        .field("field1")
        .single("value ")
        .single("-value2")
        .single("value2-")
        .single("10.00")
        .single("10,00")
        .single("hÌ")
        .single("٤٤٤٦٥٤٦٠٠")
        .single("doctor\"who\"\"")
        .end()
        .build();

    assert_eq!(
        export(&condition),
        r#"field1: "value ", "-value2", "value2-", 10.00, "10,00", hÌ, ٤٤٤٦٥٤٦٠٠, "doctor""who""""";"#
    );
}

#[test]
fn export_excluded_values() {
    let fields = catalog();
    let condition = ConditionBuilder::create(&fields)
        .field("field1")
        .excluded_single("value")
        .excluded_single("value2")
        .end()
        .build();
    assert_eq!(export(&condition), "field1: !value, !value2;");
}

#[test]
fn export_range_brackets() {
    let fields = catalog();
    let condition = ConditionBuilder::create(&fields)
        .field("field1")
        .range("10", "20")
        .range("30", "50")
        .range_bounds("30", "50", true, false)
        .range_bounds("30", "50", false, true)
        .end()
        .build();
    assert_eq!(export(&condition), "field1: 10-20, 30-50, 30-50[, ]30-50;");
}

#[test]
fn export_comparisons_and_patterns() {
    let fields = catalog();
    let condition = ConditionBuilder::create(&fields)
        .field("field1")
        .compare(CompareOp::Lte, "10")
        .compare(CompareOp::Neq, "5")
        .pattern(PatternKind::NotStartsWith, "bla", true)
        .pattern(PatternKind::Regex, "a|b", false)
        .end()
        .build();
    assert_eq!(
        export(&condition),
        r#"field1: <=10, <>5, ~i!>bla, ~?"a|b";"#
    );
}

#[test]
fn export_orders_kinds_within_a_bag() {
    let fields = catalog();
    // Insert in scrambled order; the exporter emits by kind first.
    let condition = ConditionBuilder::create(&fields)
        .field("field1")
        .compare(CompareOp::Gt, "9")
        .excluded_single("x")
        .range("1", "2")
        .single("a")
        .end()
        .build();
    assert_eq!(export(&condition), "field1: a, !x, 1-2, >9;");
}

#[test]
fn export_wraps_an_or_root() {
    let fields = catalog();
    let mut condition = ConditionBuilder::create(&fields)
        .field("field1")
        .single("a")
        .end()
        .build();
    condition.root_mut().set_logical(Logical::Or);
    assert_eq!(export(&condition), "*(field1: a;);");
}

#[test]
fn export_renders_subgroups_after_fields() {
    let fields = catalog();
    let condition = ConditionBuilder::create(&fields)
        .field("field1")
        .single("a")
        .end()
        .group(Logical::Or)
        .field("field1")
        .single("b")
        .single("c")
        .end()
        .end_group()
        .build();
    assert_eq!(export(&condition), "field1: a; *(field1: b, c;);");
}

#[test]
fn export_of_an_empty_condition_is_empty() {
    let fields = catalog();
    let condition = ConditionBuilder::create(&fields).build();
    assert_eq!(export(&condition), "");
}

#[test]
fn canonical_text_round_trips_structurally() {
    let fields = catalog();
    for src in [
        "field1: value, value2;",
        "field1: !a, 1-2, ]3-4[, <=10, ~i*bla;",
        "field1: a; *(field1: b; (field1: c;););",
    ] {
        let condition = parse(&fields, src);
        let text = export(&condition);
        let reparsed = parse(&fields, &text);
        assert_eq!(reparsed.root(), condition.root(), "via {:?}", text);
    }
}

struct Prefixed;
impl LabelResolver for Prefixed {
    fn label(&self, field: &str) -> Option<String> {
        (field == "field1").then(|| "Field One".to_string())
    }
}

#[test]
fn label_resolver_rewrites_emitted_names() {
    let fields = catalog();
    let condition = ConditionBuilder::create(&fields)
        .field("field1")
        .single("a")
        .end()
        .build();
    let exporter = FilterQueryExporter::with_label_resolver(Box::new(Prefixed));
    assert_eq!(exporter.export(&condition), "Field One: a;");
}
