//! Optional validation pass driven by a caller-supplied validator.

use super::{for_each_bag, Pass};
use crate::condition::Condition;
use crate::error::ValuesError;
use crate::field::FieldConfig;
use crate::value::SingleValue;

/// Caller-supplied constraint hook. Violations become bag errors and
/// short-circuit the rest of the chain.
pub trait ConditionValidator {
    fn validate(&self, config: &FieldConfig, value: &SingleValue) -> Result<(), String>;
}

pub struct Validate {
    validator: Box<dyn ConditionValidator>,
}

impl Validate {
    pub fn new(validator: Box<dyn ConditionValidator>) -> Self {
        Validate { validator }
    }
}

impl Pass for Validate {
    fn name(&self) -> &'static str {
        "validate"
    }

    fn apply(&self, condition: &mut Condition<'_>) {
        let fields = condition.field_set();
        for_each_bag(condition.root_mut(), &mut |name, bag| {
            let Some(config) = fields.get(name) else { return };

            let mut errors = Vec::new();
            {
                let mut check = |value: &SingleValue| {
                    if let Err(message) = self.validator.validate(config, value) {
                        errors.push(ValuesError::new(value.raw.clone(), message));
                    }
                };
                for v in bag.singles() {
                    check(v);
                }
                for v in bag.excluded_singles() {
                    check(v);
                }
                for r in bag.ranges() {
                    check(&r.lower);
                    check(&r.upper);
                }
                for r in bag.excluded_ranges() {
                    check(&r.lower);
                    check(&r.upper);
                }
                for c in bag.compares() {
                    check(&c.operand);
                }
                for p in bag.patterns() {
                    check(&p.pattern);
                }
            }
            for e in errors {
                bag.add_error(e);
            }
        });
    }
}
