//! Rule generation.
//!
//! Turns each [`WorkItem`] into selector/declaration writes on the shared
//! [`RuleTable`]. For a variant `grid(3a)` under breakpoint `md` with the
//! default element, three kinds of rules are produced:
//!
//! | Rule | Selector |
//! |------|----------|
//! | Type reset (once per type and breakpoint) | `lay-out[md*="grid("]` and `lay-out[md*="grid("] > *` |
//! | Container | `lay-out[md="grid(3a)"]` |
//! | Declared | derived from each rule's `selector`, see [`rewrite_selector`] |
//!
//! The reset pair clears placement state for every variant of the type, so a
//! later, more specific container selector can set it without specificity
//! fights.
//!
//! Generation never fails. A variant with nothing to declare only
//! contributes the reset pair.

use std::collections::HashSet;

use crate::resolve::WorkItem;
use crate::table::RuleTable;
use crate::variant::Variant;

/// Grid template columns of the container.
pub const PROP_COLUMNS: &str = "--layout-gtc";
/// Grid template rows of the container.
pub const PROP_ROWS: &str = "--layout-gtr";
/// Item count of `columns` layouts.
pub const PROP_ITEM_COUNT: &str = "--_ci";
/// Internal auto-placement state, reset on every container of a type.
pub const PROP_AUTO_PLACEMENT: &str = "--_ga";
/// Grid area of children, reset to `auto` for every child of a type.
pub const PROP_CHILD_AREA: &str = "--layout-ga";
/// Column gap consumed by the lanes track formula.
pub const PROP_COLUMN_GAP: &str = "--layout-cg";

/// Generates rules for work items, remembering which reset pairs exist.
#[derive(Debug)]
pub struct RuleGenerator<'a> {
    element: &'a str,
    /// `(query, breakpoint, prefix)` triples whose reset pair was written.
    resets: HashSet<(String, String, String)>,
}

impl<'a> RuleGenerator<'a> {
    /// Creates a generator targeting `element` (normally `lay-out`).
    pub fn new(element: &'a str) -> Self {
        Self {
            element,
            resets: HashSet::new(),
        }
    }

    /// Writes every rule realizing `item` into `table`.
    pub fn generate(&mut self, item: &WorkItem<'_>, table: &mut RuleTable) {
        let query = item.media_query.as_str();

        self.reset_type(item, table);

        let base = container_selector(self.element, item.breakpoint, item.prefix, item.layout_id);

        let properties = container_properties(item.prefix, item.layout_id, item.variant);
        if !properties.is_empty() {
            table.add(query, item.breakpoint, &base, properties);
        }

        for rule in &item.variant.rules {
            let selector = rewrite_selector(self.element, &base, &rule.selector);
            table.add(
                query,
                item.breakpoint,
                &selector,
                rule.properties
                    .iter()
                    .map(|(property, value)| (property, value.to_string())),
            );
        }
    }

    fn reset_type(&mut self, item: &WorkItem<'_>, table: &mut RuleTable) {
        let key = (
            item.media_query.clone(),
            item.breakpoint.to_string(),
            item.prefix.to_string(),
        );
        if !self.resets.insert(key) {
            return;
        }

        let type_selector = format!(
            "{}[{}*=\"{}(\"]",
            self.element, item.breakpoint, item.prefix
        );
        table.add(
            &item.media_query,
            item.breakpoint,
            &type_selector,
            [(PROP_AUTO_PLACEMENT, "initial")],
        );
        table.add(
            &item.media_query,
            item.breakpoint,
            &format!("{} > *", type_selector),
            [(PROP_CHILD_AREA, "auto")],
        );
    }
}

/// Builds the exact-match container selector, e.g. `lay-out[md="grid(3a)"]`.
pub fn container_selector(element: &str, breakpoint: &str, prefix: &str, layout_id: &str) -> String {
    format!("{}[{}=\"{}({})\"]", element, breakpoint, prefix, layout_id)
}

/// Custom properties set on a variant's container.
///
/// - `columns` → `--layout-gtc`, `rows` → `--layout-gtr`
/// - `items` on the `columns` type → `--_ci`
/// - blank strings and a zero item count count as absent
/// - a numeric id on the `lanes` type without explicit `columns` → an
///   `auto-fill` track list sized so at most that many lanes fit
pub fn container_properties(prefix: &str, layout_id: &str, variant: &Variant) -> Vec<(&'static str, String)> {
    let mut properties = Vec::new();

    let columns = variant.columns.as_deref().filter(|c| !c.trim().is_empty());
    match (columns, prefix) {
        (Some(columns), _) => properties.push((PROP_COLUMNS, columns.to_string())),
        (None, "lanes") => {
            if let Some(tracks) = lanes_tracks(layout_id) {
                properties.push((PROP_COLUMNS, tracks));
            }
        }
        (None, _) => {}
    }

    if let Some(rows) = variant.rows.as_deref().filter(|r| !r.trim().is_empty()) {
        properties.push((PROP_ROWS, rows.to_string()));
    }

    if prefix == "columns" {
        if let Some(items) = variant.items.filter(|&n| n > 0) {
            properties.push((PROP_ITEM_COUNT, items.to_string()));
        }
    }

    properties
}

/// Track list for `lanes(N)`: each lane is at least `1/N` of the container
/// minus the gaps between `N` lanes.
fn lanes_tracks(layout_id: &str) -> Option<String> {
    let lanes: u32 = layout_id.trim().parse().ok().filter(|&n| n > 0)?;
    Some(format!(
        "repeat(auto-fill, minmax(calc((100% - {} * var({}, 1rem)) / {}), 1fr))",
        lanes - 1,
        PROP_COLUMN_GAP,
        lanes
    ))
}

/// Rewrites a declared rule selector relative to the container selector.
///
/// | Declared | Result |
/// |----------|--------|
/// | `&`, `root`, or the element name | `base` |
/// | `&>*` | `base > *` |
/// | `&.active`, `&:hover` | `base.active`, `base:hover` |
/// | anything else, e.g. `span` | `base > span` |
///
/// Plain selectors use the child combinator: layout rules never reach past
/// one level of nesting.
///
/// ```
/// use layout_css::rewrite_selector;
///
/// let base = r#"lay-out[md="grid(3a)"]"#;
/// assert_eq!(rewrite_selector("lay-out", base, "&"), base);
/// assert_eq!(rewrite_selector("lay-out", base, "span"), format!("{} > span", base));
/// ```
pub fn rewrite_selector(element: &str, base: &str, selector: &str) -> String {
    let selector = selector.trim();

    if selector == "&" || selector == "root" || selector == element {
        base.to_string()
    } else if selector == "&>*" {
        format!("{} > *", base)
    } else if let Some(suffix) = selector.strip_prefix('&') {
        format!("{}{}", base, suffix)
    } else {
        format!("{} > {}", base, selector)
    }
}
