//! Transform pass: derive normalized forms through each field's
//! transformer chain.

use super::{for_each_bag, Pass};
use crate::condition::Condition;
use crate::error::ValuesError;
use crate::field::FieldConfig;
use crate::value::SingleValue;

/// Runs every raw value through its field's transformer chain and
/// records the result as the value's normalized form. A transformer
/// error attaches to the bag and leaves the value untouched.
pub struct Transform;

impl Pass for Transform {
    fn name(&self) -> &'static str {
        "transform"
    }

    fn apply(&self, condition: &mut Condition<'_>) {
        let fields = condition.field_set();
        for_each_bag(condition.root_mut(), &mut |name, bag| {
            let Some(config) = fields.get(name) else { return };
            if config.transformers().is_empty() {
                return;
            }

            let mut errors = Vec::new();
            for v in bag.singles_mut() {
                run_chain(config, v, &mut errors);
            }
            for v in bag.excluded_singles_mut() {
                run_chain(config, v, &mut errors);
            }
            for r in bag.ranges_mut() {
                run_chain(config, &mut r.lower, &mut errors);
                run_chain(config, &mut r.upper, &mut errors);
            }
            for r in bag.excluded_ranges_mut() {
                run_chain(config, &mut r.lower, &mut errors);
                run_chain(config, &mut r.upper, &mut errors);
            }
            for c in bag.compares_mut() {
                run_chain(config, &mut c.operand, &mut errors);
            }
            for p in bag.patterns_mut() {
                run_chain(config, &mut p.pattern, &mut errors);
            }
            for e in errors {
                bag.add_error(e);
            }
        });
    }
}

fn run_chain(config: &FieldConfig, value: &mut SingleValue, errors: &mut Vec<ValuesError>) {
    let mut current = value.raw.clone();
    for transformer in config.transformers() {
        match transformer.transform(&current) {
            Ok(next) => current = next,
            Err(message) => {
                errors.push(ValuesError::new(value.raw.clone(), message));
                return;
            }
        }
    }
    value.normalized = Some(current);
}
