//! Tree nodes of a condition: field bags plus ordered subgroups under a
//! logical mode.

use crate::bag::ValuesBag;
use serde::{Deserialize, Serialize};

/// How a group combines its members.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Logical {
    #[default]
    And,
    Or,
}

impl Logical {
    pub fn as_str(self) -> &'static str {
        match self {
            Logical::And => "AND",
            Logical::Or => "OR",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "AND" => Some(Logical::And),
            "OR" => Some(Logical::Or),
            _ => None,
        }
    }
}

/// A condition tree node. Owns its bags and subgroups exclusively; the
/// field map and the subgroup list both keep insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValuesGroup {
    fields: Vec<(String, ValuesBag)>,
    groups: Vec<ValuesGroup>,
    logical: Logical,
}

impl ValuesGroup {
    pub fn new(logical: Logical) -> Self {
        ValuesGroup {
            fields: Vec::new(),
            groups: Vec::new(),
            logical,
        }
    }

    // -- Fields -------------------------------------------------

    /// Insert a bag for `name`, replacing any existing one in place (the
    /// original insertion slot is kept). Callers that want to merge
    /// read-modify via [`ValuesGroup::take_field`].
    pub fn add_field(&mut self, name: impl Into<String>, bag: ValuesBag) {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = bag,
            None => self.fields.push((name, bag)),
        }
    }

    /// Remove and return the bag for `name`, freeing the slot. A
    /// follow-up [`ValuesGroup::add_field`] re-inserts at the end.
    pub fn take_field(&mut self, name: &str) -> Option<ValuesBag> {
        let pos = self.fields.iter().position(|(n, _)| n == name)?;
        Some(self.fields.remove(pos).1)
    }

    pub fn get_field(&self, name: &str) -> Option<&ValuesBag> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, b)| b)
    }

    pub fn get_field_mut(&mut self, name: &str) -> Option<&mut ValuesBag> {
        self.fields
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, b)| b)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &ValuesBag)> {
        self.fields.iter().map(|(n, b)| (n.as_str(), b))
    }

    pub fn fields_mut(&mut self) -> impl Iterator<Item = (&str, &mut ValuesBag)> {
        self.fields.iter_mut().map(|(n, b)| (n.as_str(), b))
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    // -- Subgroups ----------------------------------------------

    pub fn add_group(&mut self, group: ValuesGroup) {
        self.groups.push(group);
    }

    pub fn groups(&self) -> &[ValuesGroup] {
        &self.groups
    }

    pub fn groups_mut(&mut self) -> &mut [ValuesGroup] {
        &mut self.groups
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    // -- Mode and state -----------------------------------------

    pub fn set_logical(&mut self, logical: Logical) {
        self.logical = logical;
    }

    pub fn logical(&self) -> Logical {
        self.logical
    }

    /// No fields and no subgroups.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.groups.is_empty()
    }

    /// True iff any own bag carries errors or any subgroup does.
    pub fn has_errors(&self) -> bool {
        self.fields.iter().any(|(_, bag)| bag.has_errors())
            || self.groups.iter().any(ValuesGroup::has_errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValuesError;
    use crate::value::SingleValue;

    fn bag_with(raw: &str) -> ValuesBag {
        let mut bag = ValuesBag::new();
        bag.add_single(SingleValue::new(raw));
        bag
    }

    #[test]
    fn fields_keep_insertion_order() {
        let mut group = ValuesGroup::new(Logical::And);
        group.add_field("b", bag_with("1"));
        group.add_field("a", bag_with("2"));
        let names: Vec<&str> = group.fields().map(|(n, _)| n).collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn add_field_replaces_in_place() {
        let mut group = ValuesGroup::new(Logical::And);
        group.add_field("a", bag_with("1"));
        group.add_field("b", bag_with("2"));
        group.add_field("a", bag_with("3"));

        let names: Vec<&str> = group.fields().map(|(n, _)| n).collect();
        assert_eq!(names, ["a", "b"]);
        let raws: Vec<&str> = group
            .get_field("a")
            .unwrap()
            .singles()
            .map(|v| v.raw.as_str())
            .collect();
        assert_eq!(raws, ["3"]);
    }

    #[test]
    fn errors_propagate_from_nested_groups() {
        let mut inner = ValuesGroup::new(Logical::Or);
        let mut bag = bag_with("x");
        bag.add_error(ValuesError::new("x", "bad"));
        inner.add_field("f", bag);

        let mut root = ValuesGroup::new(Logical::And);
        assert!(!root.has_errors());
        root.add_group(inner);
        assert!(root.has_errors());
    }

    #[test]
    fn empty_means_no_fields_and_no_groups() {
        let mut group = ValuesGroup::default();
        assert!(group.is_empty());
        group.add_group(ValuesGroup::new(Logical::Or));
        assert!(!group.is_empty());
    }
}
