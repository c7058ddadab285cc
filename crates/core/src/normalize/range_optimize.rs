//! Merge overlapping and adjacent ranges, drop contained ranges, and
//! drop excluded ranges the included set already forbids.

use super::{for_each_bag, Pass};
use crate::bag::ValuesBag;
use crate::condition::Condition;
use crate::field::FieldConfig;
use crate::value::RangeValue;
use std::cmp::Ordering;

pub struct RangeOptimizer;

impl Pass for RangeOptimizer {
    fn name(&self) -> &'static str {
        "range-optimize"
    }

    fn apply(&self, condition: &mut Condition<'_>) {
        let fields = condition.field_set();
        for_each_bag(condition.root_mut(), &mut |name, bag| {
            let Some(config) = fields.get(name) else { return };
            optimize_bag(config, bag);
        });
    }
}

struct Span {
    index: usize,
    range: RangeValue,
    changed: bool,
}

fn optimize_bag(config: &FieldConfig, bag: &mut ValuesBag) {
    // Bags with bounds the kind cannot order are left untouched.
    let parses = |r: &RangeValue| {
        config.kind().parses(r.lower.model()) && config.kind().parses(r.upper.model())
    };
    if bag.ranges().any(|r| !parses(r)) || bag.excluded_ranges().any(|r| !parses(r)) {
        return;
    }

    let mut spans: Vec<Span> = bag
        .ranges_indexed()
        .map(|(index, r)| Span {
            index,
            range: r.clone(),
            changed: false,
        })
        .collect();

    // Merge to a fixpoint. The earliest-inserted range of a mergeable
    // pair survives and widens; a contained range is absorbed without
    // widening anything.
    loop {
        let mut found = None;
        'search: for i in 0..spans.len() {
            for j in (i + 1)..spans.len() {
                if mergeable(config, &spans[i].range, &spans[j].range) {
                    found = Some((i, j));
                    break 'search;
                }
            }
        }
        let Some((i, j)) = found else { break };
        let absorbed = spans.remove(j);
        widen(config, &mut spans[i], absorbed.range);
    }

    let survivors: Vec<usize> = spans.iter().map(|s| s.index).collect();
    let removed: Vec<usize> = bag
        .ranges_indexed()
        .map(|(index, _)| index)
        .filter(|index| !survivors.contains(index))
        .collect();
    for index in removed {
        bag.remove_range(index);
    }
    for span in spans.iter().filter(|s| s.changed) {
        if let Some(range) = bag.get_range_mut(span.index) {
            *range = span.range.clone();
        }
    }

    // An excluded range disjoint from every included range forbids
    // nothing the included set allows. Only meaningful when included
    // ranges exist at all.
    if spans.is_empty() {
        return;
    }
    let dropped: Vec<usize> = bag
        .excluded_ranges_indexed()
        .filter(|&(_, er)| spans.iter().all(|s| !intersects(config, &s.range, er)))
        .map(|(index, _)| index)
        .collect();
    for index in dropped {
        bag.remove_excluded_range(index);
    }
}

/// Widen `base` to the union with `other` (caller guarantees they are
/// mergeable).
fn widen(config: &FieldConfig, base: &mut Span, other: RangeValue) {
    let range = &mut base.range;
    match config.compare(other.lower.model(), range.lower.model()) {
        Some(Ordering::Less) => {
            range.lower = other.lower;
            range.lower_inclusive = other.lower_inclusive;
            base.changed = true;
        }
        Some(Ordering::Equal) => {
            if other.lower_inclusive && !range.lower_inclusive {
                range.lower_inclusive = true;
                base.changed = true;
            }
        }
        _ => {}
    }
    match config.compare(other.upper.model(), range.upper.model()) {
        Some(Ordering::Greater) => {
            range.upper = other.upper;
            range.upper_inclusive = other.upper_inclusive;
            base.changed = true;
        }
        Some(Ordering::Equal) => {
            if other.upper_inclusive && !range.upper_inclusive {
                range.upper_inclusive = true;
                base.changed = true;
            }
        }
        _ => {}
    }
}

fn mergeable(config: &FieldConfig, a: &RangeValue, b: &RangeValue) -> bool {
    intersects(config, a, b)
        || touches(config, a, b)
        || touches(config, b, a)
        || successor_adjacent(config, a, b)
        || successor_adjacent(config, b, a)
}

/// The two intervals share at least one point.
fn intersects(config: &FieldConfig, a: &RangeValue, b: &RangeValue) -> bool {
    !before(config, a, b) && !before(config, b, a)
}

/// `a` ends strictly before `b` starts.
fn before(config: &FieldConfig, a: &RangeValue, b: &RangeValue) -> bool {
    match config.compare(a.upper.model(), b.lower.model()) {
        Some(Ordering::Less) => true,
        Some(Ordering::Equal) => !(a.upper_inclusive && b.lower_inclusive),
        _ => false,
    }
}

/// `a.upper` meets `b.lower` with exactly one inclusive side: no shared
/// point, but no gap either.
fn touches(config: &FieldConfig, a: &RangeValue, b: &RangeValue) -> bool {
    matches!(
        config.compare(a.upper.model(), b.lower.model()),
        Some(Ordering::Equal)
    ) && (a.upper_inclusive != b.lower_inclusive)
}

/// Inclusive bounds one increment apart under the kind's successor.
fn successor_adjacent(config: &FieldConfig, a: &RangeValue, b: &RangeValue) -> bool {
    if !(a.upper_inclusive && b.lower_inclusive) {
        return false;
    }
    match config.kind().successor(a.upper.model()) {
        Some(succ) => config.is_equal(&succ, b.lower.model()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ConditionBuilder;
    use crate::field::{FieldKind, SimpleFieldSet};

    fn catalog() -> SimpleFieldSet {
        SimpleFieldSet::new()
            .with(
                FieldConfig::builder("n", FieldKind::Integer)
                    .ranges(true)
                    .build(),
            )
            .with(
                FieldConfig::builder("x", FieldKind::Decimal)
                    .ranges(true)
                    .build(),
            )
            .with(FieldConfig::builder("t", FieldKind::Text).ranges(true).build())
    }

    fn ranges_of<'c>(condition: &'c Condition<'_>, field: &str) -> Vec<(String, String, bool, bool)> {
        condition
            .root()
            .get_field(field)
            .unwrap()
            .ranges()
            .map(|r| {
                (
                    r.lower.raw.clone(),
                    r.upper.raw.clone(),
                    r.lower_inclusive,
                    r.upper_inclusive,
                )
            })
            .collect()
    }

    #[test]
    fn overlapping_ranges_merge_into_the_earliest() {
        let fields = catalog();
        let mut condition = ConditionBuilder::create(&fields)
            .field("n")
            .range("1", "10")
            .range("5", "20")
            .range("30", "40")
            .end()
            .build();
        RangeOptimizer.apply(&mut condition);

        assert_eq!(
            ranges_of(&condition, "n"),
            [
                ("1".into(), "20".into(), true, true),
                ("30".into(), "40".into(), true, true),
            ]
        );
    }

    #[test]
    fn contained_ranges_are_dropped() {
        let fields = catalog();
        let mut condition = ConditionBuilder::create(&fields)
            .field("n")
            .range("1", "100")
            .range("5", "20")
            .end()
            .build();
        RangeOptimizer.apply(&mut condition);
        assert_eq!(ranges_of(&condition, "n"), [("1".into(), "100".into(), true, true)]);
    }

    #[test]
    fn shared_endpoints_merge_unless_both_sides_are_exclusive() {
        let fields = catalog();
        let mut condition = ConditionBuilder::create(&fields)
            .field("x")
            .range_bounds("1", "5", true, false)
            .range("5", "9")
            .end()
            .build();
        RangeOptimizer.apply(&mut condition);
        assert_eq!(ranges_of(&condition, "x"), [("1".into(), "9".into(), true, true)]);

        let mut condition = ConditionBuilder::create(&fields)
            .field("x")
            .range_bounds("1", "5", true, false)
            .range_bounds("5", "9", false, true)
            .end()
            .build();
        RangeOptimizer.apply(&mut condition);
        // A point gap at 5 keeps them apart.
        assert_eq!(ranges_of(&condition, "x").len(), 2);
    }

    #[test]
    fn integer_ranges_merge_across_successor_adjacency() {
        let fields = catalog();
        let mut condition = ConditionBuilder::create(&fields)
            .field("n")
            .range("1", "10")
            .range("11", "20")
            .end()
            .build();
        RangeOptimizer.apply(&mut condition);
        assert_eq!(ranges_of(&condition, "n"), [("1".into(), "20".into(), true, true)]);

        // Decimals have no successor: 10 and 11 stay apart.
        let mut condition = ConditionBuilder::create(&fields)
            .field("x")
            .range("1", "10")
            .range("11", "20")
            .end()
            .build();
        RangeOptimizer.apply(&mut condition);
        assert_eq!(ranges_of(&condition, "x").len(), 2);
    }

    #[test]
    fn redundant_excluded_ranges_are_dropped() {
        let fields = catalog();
        let mut condition = ConditionBuilder::create(&fields)
            .field("n")
            .range("1", "10")
            .excluded_range("4", "6")
            .excluded_range("50", "60")
            .end()
            .build();
        RangeOptimizer.apply(&mut condition);

        let bag = condition.root().get_field("n").unwrap();
        let excluded: Vec<String> = bag.excluded_ranges().map(|r| r.lower.raw.clone()).collect();
        // The one inside the included set still matters; the far one is
        // already forbidden.
        assert_eq!(excluded, ["4"]);
    }

    #[test]
    fn excluded_ranges_survive_without_any_included_range() {
        let fields = catalog();
        let mut condition = ConditionBuilder::create(&fields)
            .field("n")
            .excluded_range("50", "60")
            .end()
            .build();
        RangeOptimizer.apply(&mut condition);
        assert_eq!(
            condition
                .root()
                .get_field("n")
                .unwrap()
                .excluded_ranges()
                .count(),
            1
        );
    }

    #[test]
    fn unparsable_bounds_leave_the_bag_untouched() {
        let fields = catalog();
        let mut condition = ConditionBuilder::create(&fields)
            .field("n")
            .range("1", "10")
            .range("5", "ten")
            .end()
            .build();
        RangeOptimizer.apply(&mut condition);
        assert_eq!(ranges_of(&condition, "n").len(), 2);
    }

    #[test]
    fn text_ranges_merge_lexicographically() {
        let fields = catalog();
        let mut condition = ConditionBuilder::create(&fields)
            .field("t")
            .range("a", "f")
            .range("c", "k")
            .end()
            .build();
        RangeOptimizer.apply(&mut condition);
        assert_eq!(ranges_of(&condition, "t"), [("a".into(), "k".into(), true, true)]);
    }
}
