//! Breakpoint resolution.
//!
//! Walks every breakpoint's ordered `layouts` list and expands each
//! [`LayoutRef`] into concrete [`WorkItem`]s:
//!
//! - `"grid"` → every variant registered for the `grid` type
//! - `{ "grid": ["grid(3a)"] }` → only the listed variants
//!
//! Within one breakpoint a `(query, prefix, id)` triple is produced at most
//! once, however many references name it. Unknown types and ids are reported
//! as warnings and skipped individually; the rest of the breakpoint still
//! resolves.
//!
//! The output order is breakpoint order, then reference order, then variant
//! order. It becomes the emission order of rules that share a query.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{Config, LayoutRef};
use crate::diagnostics::{Diagnostics, Warning};
use crate::registry::LayoutRegistry;
use crate::variant::Variant;

static TRAILING_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([^)]+)\)$").expect("static pattern is valid"));

/// Extracts the bare id from a namespaced id.
///
/// Ids without a trailing `(...)` are returned whole, so a hand-written id
/// still produces a selector instead of being dropped.
///
/// ```
/// use layout_css::extract_layout_id;
///
/// assert_eq!(extract_layout_id("columns(2)"), "2");
/// assert_eq!(extract_layout_id("custom"), "custom");
/// ```
pub fn extract_layout_id(full_id: &str) -> &str {
    TRAILING_ID
        .captures(full_id)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(full_id)
}

/// One variant to realize under one breakpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem<'a> {
    pub prefix: &'a str,
    /// Bare id, e.g. `3a`.
    pub layout_id: &'a str,
    pub breakpoint: &'a str,
    pub media_query: String,
    pub variant: &'a Variant,
}

/// Expands every breakpoint of `config` against `registry`.
pub fn resolve<'a>(
    config: &'a Config,
    registry: &'a LayoutRegistry,
    diagnostics: &mut Diagnostics,
) -> Vec<WorkItem<'a>> {
    let mut items = Vec::new();

    for (name, breakpoint) in config.breakpoints() {
        let Some(media_query) = breakpoint.media_query() else {
            log::debug!("breakpoint '{}' has no range, skipping", name);
            continue;
        };

        let before = items.len();
        let mut scope = BreakpointScope {
            name,
            media_query,
            registry,
            seen: HashSet::new(),
        };

        for layout_ref in &breakpoint.layouts {
            match layout_ref {
                LayoutRef::All(layout_type) => {
                    scope.expand_all(layout_type, &mut items, diagnostics);
                }
                LayoutRef::Curated(selection) => {
                    for (layout_type, ids) in selection.iter() {
                        scope.expand_curated(layout_type, ids, &mut items, diagnostics);
                    }
                }
            }
        }

        log::debug!(
            "breakpoint '{}' resolved {} variant(s)",
            name,
            items.len() - before
        );
    }

    items
}

/// Resolution state for a single breakpoint.
struct BreakpointScope<'a> {
    name: &'a str,
    media_query: String,
    registry: &'a LayoutRegistry,
    /// `(prefix, bare id)` pairs already produced for this breakpoint.
    seen: HashSet<(&'a str, &'a str)>,
}

impl<'a> BreakpointScope<'a> {
    fn expand_all(
        &mut self,
        layout_type: &str,
        items: &mut Vec<WorkItem<'a>>,
        diagnostics: &mut Diagnostics,
    ) {
        let registry = self.registry;
        let (Some(variants), Some(prefix)) =
            (registry.get(layout_type), registry.prefix_of(layout_type))
        else {
            diagnostics.warn(Warning::UnknownLayoutType {
                breakpoint: self.name.to_string(),
                layout_type: layout_type.to_string(),
            });
            return;
        };

        for variant in variants {
            self.push(prefix, variant, items);
        }
    }

    fn expand_curated(
        &mut self,
        layout_type: &str,
        ids: &[String],
        items: &mut Vec<WorkItem<'a>>,
        diagnostics: &mut Diagnostics,
    ) {
        let registry = self.registry;
        let Some(prefix) = registry.prefix_of(layout_type) else {
            diagnostics.warn(Warning::UnknownLayoutType {
                breakpoint: self.name.to_string(),
                layout_type: layout_type.to_string(),
            });
            return;
        };

        for id in ids {
            match registry.find(layout_type, id) {
                Some(variant) => self.push(prefix, variant, items),
                None => diagnostics.warn(Warning::UnknownVariant {
                    breakpoint: self.name.to_string(),
                    layout_type: layout_type.to_string(),
                    id: id.clone(),
                }),
            }
        }
    }

    fn push(&mut self, prefix: &'a str, variant: &'a Variant, items: &mut Vec<WorkItem<'a>>) {
        let layout_id = extract_layout_id(&variant.id);
        if !self.seen.insert((prefix, layout_id)) {
            return;
        }

        items.push(WorkItem {
            prefix,
            layout_id,
            breakpoint: self.name,
            media_query: self.media_query.clone(),
            variant,
        });
    }
}
