//! Fluent construction of condition trees.
//!
//! The open-scope chain is an explicit index stack into the owned tree,
//! so nested builders never point back at their parents. The builder is
//! infallible: it performs no catalog or limit checks, that being the
//! parser's and the codec's job.

use crate::bag::ValuesBag;
use crate::condition::Condition;
use crate::field::FieldSet;
use crate::group::{Logical, ValuesGroup};
use crate::value::{CompareOp, CompareValue, PatternKind, PatternValue, RangeValue, SingleValue};

pub struct ConditionBuilder<'a> {
    field_set: &'a dyn FieldSet,
    root: ValuesGroup,
    /// Subgroup indices of the open scopes, root-first.
    open: Vec<usize>,
}

impl<'a> ConditionBuilder<'a> {
    pub fn create(field_set: &'a dyn FieldSet) -> Self {
        ConditionBuilder {
            field_set,
            root: ValuesGroup::new(Logical::And),
            open: Vec::new(),
        }
    }

    fn current(&mut self) -> &mut ValuesGroup {
        let mut group = &mut self.root;
        for &index in &self.open {
            group = &mut group.groups_mut()[index];
        }
        group
    }

    /// Open a values builder for `name`, continuing any bag the current
    /// group already holds for it.
    pub fn field(mut self, name: impl Into<String>) -> ValuesBuilder<'a> {
        let name = name.into();
        let bag = self.current().take_field(&name).unwrap_or_default();
        ValuesBuilder {
            owner: self,
            name,
            bag,
        }
    }

    /// Open a values builder with a fresh bag, replacing any existing
    /// one when it closes.
    pub fn field_new(mut self, name: impl Into<String>) -> ValuesBuilder<'a> {
        let name = name.into();
        self.current().take_field(&name);
        ValuesBuilder {
            owner: self,
            name,
            bag: ValuesBag::new(),
        }
    }

    /// Open a nested group scope.
    pub fn group(mut self, logical: Logical) -> Self {
        let index = {
            let current = self.current();
            current.add_group(ValuesGroup::new(logical));
            current.group_count() - 1
        };
        self.open.push(index);
        self
    }

    /// Close the innermost open group; at the root this is a no-op.
    pub fn end_group(mut self) -> Self {
        self.open.pop();
        self
    }

    /// Close any open scopes and hand back the finished condition.
    pub fn build(self) -> Condition<'a> {
        Condition::with_root(self.field_set, self.root)
    }
}

/// Value surface of one field bag; `end()` returns to the owner.
pub struct ValuesBuilder<'a> {
    owner: ConditionBuilder<'a>,
    name: String,
    bag: ValuesBag,
}

impl<'a> ValuesBuilder<'a> {
    pub fn single(mut self, raw: impl Into<String>) -> Self {
        self.bag.add_single(SingleValue::new(raw));
        self
    }

    pub fn excluded_single(mut self, raw: impl Into<String>) -> Self {
        self.bag.add_excluded_single(SingleValue::new(raw));
        self
    }

    /// Inclusive range.
    pub fn range(self, lower: impl Into<String>, upper: impl Into<String>) -> Self {
        self.range_bounds(lower, upper, true, true)
    }

    pub fn range_bounds(
        mut self,
        lower: impl Into<String>,
        upper: impl Into<String>,
        lower_inclusive: bool,
        upper_inclusive: bool,
    ) -> Self {
        self.bag.add_range(RangeValue::bounds(
            SingleValue::new(lower),
            SingleValue::new(upper),
            lower_inclusive,
            upper_inclusive,
        ));
        self
    }

    pub fn excluded_range(self, lower: impl Into<String>, upper: impl Into<String>) -> Self {
        self.excluded_range_bounds(lower, upper, true, true)
    }

    pub fn excluded_range_bounds(
        mut self,
        lower: impl Into<String>,
        upper: impl Into<String>,
        lower_inclusive: bool,
        upper_inclusive: bool,
    ) -> Self {
        self.bag.add_excluded_range(RangeValue::bounds(
            SingleValue::new(lower),
            SingleValue::new(upper),
            lower_inclusive,
            upper_inclusive,
        ));
        self
    }

    pub fn compare(mut self, op: CompareOp, operand: impl Into<String>) -> Self {
        self.bag
            .add_compare(CompareValue::new(op, SingleValue::new(operand)));
        self
    }

    pub fn pattern(
        mut self,
        kind: PatternKind,
        pattern: impl Into<String>,
        case_insensitive: bool,
    ) -> Self {
        self.bag.add_pattern(PatternValue::new(
            kind,
            SingleValue::new(pattern),
            case_insensitive,
        ));
        self
    }

    /// Write the bag into the current group and return to the condition
    /// builder.
    pub fn end(self) -> ConditionBuilder<'a> {
        let ValuesBuilder {
            mut owner,
            name,
            bag,
        } = self;
        owner.current().add_field(name, bag);
        owner
    }
}
