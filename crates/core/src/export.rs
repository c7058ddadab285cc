//! FilterQuery exporter: canonical textual rendering of a condition tree.
//!
//! Output is a deterministic function of the tree and the optional label
//! resolver. The exporter renders the raw form of every value, so a
//! parse of the output reproduces the tree structurally.

use crate::bag::ValuesBag;
use crate::condition::Condition;
use crate::group::{Logical, ValuesGroup};
use crate::value::RangeValue;

/// Maps internal field names to display labels. When resolution fails
/// the internal name is emitted.
pub trait LabelResolver {
    fn label(&self, field: &str) -> Option<String>;
}

#[derive(Default)]
pub struct FilterQueryExporter {
    label_resolver: Option<Box<dyn LabelResolver>>,
}

impl FilterQueryExporter {
    pub fn new() -> Self {
        FilterQueryExporter::default()
    }

    pub fn with_label_resolver(resolver: Box<dyn LabelResolver>) -> Self {
        FilterQueryExporter {
            label_resolver: Some(resolver),
        }
    }

    /// Render the tree. A root `And` group is written bare; a root `Or`
    /// is wrapped as `*( … );` since only groups carry the mode marker.
    pub fn export(&self, condition: &Condition<'_>) -> String {
        let root = condition.root();
        if root.is_empty() {
            return String::new();
        }
        match root.logical() {
            Logical::And => self.render_body(root),
            Logical::Or => format!("*({});", self.render_body(root)),
        }
    }

    fn render_body(&self, group: &ValuesGroup) -> String {
        let mut parts = Vec::new();
        for (name, bag) in group.fields() {
            if bag.is_empty() {
                continue;
            }
            parts.push(self.render_field(name, bag));
        }
        for child in group.groups() {
            parts.push(self.render_group(child));
        }
        parts.join(" ")
    }

    fn render_group(&self, group: &ValuesGroup) -> String {
        let marker = match group.logical() {
            Logical::And => "",
            Logical::Or => "*",
        };
        format!("{}({});", marker, self.render_body(group))
    }

    /// `name: v1, v2, …;` with the bag's kinds in their fixed order:
    /// singles, excluded singles, ranges, excluded ranges, comparisons,
    /// pattern matches.
    fn render_field(&self, name: &str, bag: &ValuesBag) -> String {
        let display = self
            .label_resolver
            .as_ref()
            .and_then(|r| r.label(name))
            .unwrap_or_else(|| name.to_string());

        let mut values = Vec::with_capacity(bag.count());
        for v in bag.singles() {
            values.push(quote(&v.raw));
        }
        for v in bag.excluded_singles() {
            values.push(format!("!{}", quote(&v.raw)));
        }
        for r in bag.ranges() {
            values.push(render_range(r, false));
        }
        for r in bag.excluded_ranges() {
            values.push(render_range(r, true));
        }
        for c in bag.compares() {
            values.push(format!("{}{}", c.op.symbol(), quote(&c.operand.raw)));
        }
        for p in bag.patterns() {
            values.push(format!(
                "~{}{}{}{}",
                if p.case_insensitive { "i" } else { "" },
                if p.kind.is_exclusive() { "!" } else { "" },
                p.kind.symbol(),
                quote(&p.pattern.raw)
            ));
        }
        format!("{}: {};", display, values.join(", "))
    }
}

/// Bracket notation appears only for exclusive bounds: `]lo-hi`,
/// `lo-hi[`, `]lo-hi[`.
fn render_range(range: &RangeValue, excluded: bool) -> String {
    format!(
        "{}{}{}-{}{}",
        if excluded { "!" } else { "" },
        if range.lower_inclusive { "" } else { "]" },
        quote(&range.lower.raw),
        quote(&range.upper.raw),
        if range.upper_inclusive { "" } else { "[" }
    )
}

/// Quote with `"` and double internal `"` unless the value re-lexes as a
/// single token: a bareword (letters then optional digits) or a plain
/// non-negative decimal. A leading `-` always forces quoting.
fn quote(value: &str) -> String {
    if is_bareword(value) || is_plain_decimal(value) {
        value.to_string()
    } else {
        format!("\"{}\"", value.replace('"', "\"\""))
    }
}

fn is_bareword(value: &str) -> bool {
    let rest = value.trim_start_matches(|c: char| c.is_alphabetic());
    if rest.len() == value.len() {
        // No leading letter.
        return false;
    }
    rest.chars().all(|c| c.is_numeric())
}

fn is_plain_decimal(value: &str) -> bool {
    let mut parts = value.splitn(2, '.');
    let int = parts.next().unwrap_or("");
    if int.is_empty() || !int.chars().all(|c| c.is_numeric()) {
        return false;
    }
    match parts.next() {
        None => true,
        Some(frac) => !frac.is_empty() && frac.chars().all(|c| c.is_numeric()),
    }
}
