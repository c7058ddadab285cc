//! Duplicate removal within each bag, under the field's value
//! comparison. The first occurrence wins; bags never dedup across
//! groups.

use super::{for_each_bag, Pass};
use crate::condition::Condition;

pub struct DuplicateRemover;

impl Pass for DuplicateRemover {
    fn name(&self) -> &'static str {
        "duplicates"
    }

    fn apply(&self, condition: &mut Condition<'_>) {
        let fields = condition.field_set();
        for_each_bag(condition.root_mut(), &mut |name, bag| {
            let Some(config) = fields.get(name) else { return };

            let dup = {
                let live: Vec<_> = bag.singles_indexed().collect();
                later_duplicates(&live, |a, b| config.is_equal(a.model(), b.model()))
            };
            for index in dup {
                bag.remove_single(index);
            }

            let dup = {
                let live: Vec<_> = bag.excluded_singles_indexed().collect();
                later_duplicates(&live, |a, b| config.is_equal(a.model(), b.model()))
            };
            for index in dup {
                bag.remove_excluded_single(index);
            }

            let range_eq = |a: &crate::value::RangeValue, b: &crate::value::RangeValue| {
                config.is_equal(a.lower.model(), b.lower.model())
                    && config.is_equal(a.upper.model(), b.upper.model())
                    && a.lower_inclusive == b.lower_inclusive
                    && a.upper_inclusive == b.upper_inclusive
            };
            let dup = {
                let live: Vec<_> = bag.ranges_indexed().collect();
                later_duplicates(&live, range_eq)
            };
            for index in dup {
                bag.remove_range(index);
            }

            let dup = {
                let live: Vec<_> = bag.excluded_ranges_indexed().collect();
                later_duplicates(&live, range_eq)
            };
            for index in dup {
                bag.remove_excluded_range(index);
            }

            let dup = {
                let live: Vec<_> = bag.compares_indexed().collect();
                later_duplicates(&live, |a, b| {
                    a.op == b.op && config.is_equal(a.operand.model(), b.operand.model())
                })
            };
            for index in dup {
                bag.remove_compare(index);
            }

            let dup = {
                let live: Vec<_> = bag.patterns_indexed().collect();
                later_duplicates(&live, |a, b| {
                    a.kind == b.kind
                        && a.case_insensitive == b.case_insensitive
                        && config.is_equal(a.pattern.model(), b.pattern.model())
                })
            };
            for index in dup {
                bag.remove_pattern(index);
            }
        });
    }
}

/// Indexes of entries equal to an earlier entry.
fn later_duplicates<T>(live: &[(usize, &T)], eq: impl Fn(&T, &T) -> bool) -> Vec<usize> {
    let mut dup = Vec::new();
    for j in 1..live.len() {
        if live[..j].iter().any(|&(_, earlier)| eq(earlier, live[j].1)) {
            dup.push(live[j].0);
        }
    }
    dup
}
