//! Coalesce successor-contiguous runs of single values into ranges.

use super::{for_each_bag, Pass};
use crate::condition::Condition;
use crate::value::{RangeValue, SingleValue};
use std::cmp::Ordering;

/// For fields whose kind has a successor and which accept ranges,
/// maximal runs (length >= 2) of singles contiguous under the successor
/// collapse into one inclusive range appended to the bag. Values the
/// kind cannot parse are left alone.
pub struct ValuesToRange;

impl Pass for ValuesToRange {
    fn name(&self) -> &'static str {
        "values-to-range"
    }

    fn apply(&self, condition: &mut Condition<'_>) {
        let fields = condition.field_set();
        for_each_bag(condition.root_mut(), &mut |name, bag| {
            let Some(config) = fields.get(name) else { return };
            let kind = config.kind();
            if !kind.has_successor() || !config.accept_ranges() {
                return;
            }

            // Work on a sorted scratch list; the bag itself is never
            // reordered.
            let mut members: Vec<(usize, SingleValue)> = bag
                .singles_indexed()
                .filter(|(_, v)| kind.parses(v.model()))
                .map(|(i, v)| (i, v.clone()))
                .collect();
            if members.len() < 2 {
                return;
            }
            members.sort_by(|a, b| {
                config
                    .compare(a.1.model(), b.1.model())
                    .unwrap_or(Ordering::Equal)
            });

            let mut runs: Vec<Vec<(usize, SingleValue)>> = Vec::new();
            for member in members {
                let extends = runs
                    .last()
                    .and_then(|run| run.last())
                    .map_or(false, |(_, last)| {
                        kind.successor(last.model())
                            .map_or(false, |succ| config.is_equal(&succ, member.1.model()))
                    });
                if extends {
                    if let Some(run) = runs.last_mut() {
                        run.push(member);
                    }
                } else {
                    runs.push(vec![member]);
                }
            }

            for run in runs.into_iter().filter(|r| r.len() >= 2) {
                let lower = run[0].1.clone();
                let upper = run[run.len() - 1].1.clone();
                for (index, _) in &run {
                    bag.remove_single(*index);
                }
                bag.add_range(RangeValue::new(lower, upper));
            }
        });
    }
}
