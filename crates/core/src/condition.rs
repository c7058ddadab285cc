//! The condition root: a borrowed field catalog plus an owned group tree.

use crate::field::FieldSet;
use crate::group::ValuesGroup;
use std::fmt;

/// A parsed or built search condition. The field set is a read-only
/// collaborator borrowed for the condition's lifetime; the group tree is
/// owned. Mutation is meant for construction and normalization only;
/// downstream consumers treat the tree as frozen.
pub struct Condition<'a> {
    field_set: &'a dyn FieldSet,
    root: ValuesGroup,
}

impl<'a> Condition<'a> {
    pub fn new(field_set: &'a dyn FieldSet) -> Self {
        Condition {
            field_set,
            root: ValuesGroup::default(),
        }
    }

    pub fn with_root(field_set: &'a dyn FieldSet, root: ValuesGroup) -> Self {
        Condition { field_set, root }
    }

    /// The catalog reference outlives `&self`, so callers can hold it
    /// alongside a mutable borrow of the tree.
    pub fn field_set(&self) -> &'a dyn FieldSet {
        self.field_set
    }

    pub fn root(&self) -> &ValuesGroup {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut ValuesGroup {
        &mut self.root
    }

    pub fn into_root(self) -> ValuesGroup {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.root.has_errors()
    }
}

impl fmt::Debug for Condition<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition").field("root", &self.root).finish()
    }
}
