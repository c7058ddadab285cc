//! Normalization pipeline: ordered rewriting passes over a condition
//! tree.
//!
//! The chain is a thin orchestrator that runs each pass in sequence.
//! Every pass sees the mutable tree; as soon as a pass leaves errors on
//! a bag the chain stops. Passes mutate bags only; fields and
//! subgroups are never reordered.

mod dedup;
mod range_optimize;
mod transform;
mod validate;
mod values_to_range;

pub use dedup::DuplicateRemover;
pub use range_optimize::RangeOptimizer;
pub use transform::Transform;
pub use validate::{ConditionValidator, Validate};
pub use values_to_range::ValuesToRange;

use crate::bag::ValuesBag;
use crate::condition::Condition;
use crate::group::ValuesGroup;

/// A single tree-rewriting pass.
pub trait Pass {
    fn name(&self) -> &'static str;
    fn apply(&self, condition: &mut Condition<'_>);
}

pub struct NormalizeChain {
    passes: Vec<Box<dyn Pass>>,
}

impl NormalizeChain {
    /// Transform, duplicate removal, range optimization.
    pub fn standard() -> Self {
        NormalizeChain {
            passes: vec![
                Box::new(Transform),
                Box::new(DuplicateRemover),
                Box::new(RangeOptimizer),
            ],
        }
    }

    pub fn empty() -> Self {
        NormalizeChain { passes: Vec::new() }
    }

    pub fn push(&mut self, pass: Box<dyn Pass>) {
        self.passes.push(pass);
    }

    /// Insert the validation pass right after the transform pass, or at
    /// the front when the chain has none.
    pub fn with_validator(mut self, validator: Box<dyn ConditionValidator>) -> Self {
        let at = self
            .passes
            .iter()
            .position(|p| p.name() == "transform")
            .map(|i| i + 1)
            .unwrap_or(0);
        self.passes.insert(at, Box::new(Validate::new(validator)));
        self
    }

    /// Insert the run-coalescing pass right before the range optimizer,
    /// or at the end when the chain has none.
    pub fn with_values_to_range(mut self) -> Self {
        let at = self
            .passes
            .iter()
            .position(|p| p.name() == "range-optimize")
            .unwrap_or(self.passes.len());
        self.passes.insert(at, Box::new(ValuesToRange));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Run the chain; stops once the tree carries errors.
    pub fn run(&self, condition: &mut Condition<'_>) {
        for pass in &self.passes {
            pass.apply(condition);
            if condition.has_errors() {
                break;
            }
        }
    }
}

/// Run the standard chain.
pub fn normalize(condition: &mut Condition<'_>) {
    NormalizeChain::standard().run(condition);
}

/// Apply `f` to every bag in the tree, own fields before subgroups.
pub(crate) fn for_each_bag(group: &mut ValuesGroup, f: &mut dyn FnMut(&str, &mut ValuesBag)) {
    for (name, bag) in group.fields_mut() {
        f(name, bag);
    }
    for child in group.groups_mut() {
        for_each_bag(child, f);
    }
}
