//! Rule aggregation.
//!
//! [`RuleTable`] accumulates every `(query, breakpoint, selector) →
//! declarations` write of one build. Writes to an existing key merge property
//! by property: a known property keeps its position and takes the new value, a
//! new property is appended, and nothing is ever removed.
//!
//! Rules are stored in one [`Block`] per distinct query string and, inside it,
//! one [`Section`] per breakpoint. Two breakpoints that compile to the same
//! query therefore print inside one `@media` block but keep their own cascade
//! layers. Blocks, sections and selectors all keep first-seen order, so
//! emitting the same table twice yields the same bytes.
//!
//! # Grouping
//!
//! [`Section::grouped`] folds selectors whose declarations are equal into one
//! rule with a selector list. Equality ignores declaration order; the group
//! prints the declarations of its first member.
//!
//! A group prints where its first member was written, so joining it moves a
//! later selector up. That move is refused when a rule it would jump over
//! sets any of the same properties: the later rule has to keep winning the
//! cascade, and it starts a new group instead.
//!
//! ```
//! use layout_css::RuleTable;
//!
//! let mut table = RuleTable::new();
//! table.add("@media (min-width: 720px)", "md", "a", [("gap", "1rem")]);
//! table.add("@media (min-width: 720px)", "md", "b", [("gap", "1rem")]);
//!
//! let block = table.blocks().next().unwrap();
//! let section = block.sections().next().unwrap();
//! let groups = section.grouped();
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].selectors, vec!["a", "b"]);
//! ```

use std::collections::HashMap;

use crate::ordered::OrderedMap;

/// Ordered property → value map of one selector.
pub type Declarations = OrderedMap<String>;

/// All rules sharing one at-rule prelude.
#[derive(Debug, Clone)]
pub struct Block {
    query: String,
    sections: OrderedMap<Section>,
}

/// The rules one breakpoint contributed to a [`Block`].
#[derive(Debug, Clone)]
pub struct Section {
    breakpoint: String,
    rules: OrderedMap<Declarations>,
}

/// Selectors sharing identical declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleGroup<'a> {
    pub selectors: Vec<&'a str>,
    pub declarations: &'a Declarations,
}

impl Block {
    fn new(query: &str) -> Self {
        Self {
            query: query.to_string(),
            sections: OrderedMap::new(),
        }
    }

    /// The at-rule prelude, e.g. `@media (min-width: 720px)`.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Per-breakpoint sections in first-seen order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    /// Iterates `(selector, declarations)` across all sections.
    pub fn rules(&self) -> impl Iterator<Item = (&str, &Declarations)> {
        self.sections.values().flat_map(Section::rules)
    }

    pub fn len(&self) -> usize {
        self.sections.values().map(Section::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Section {
    fn new(breakpoint: &str) -> Self {
        Self {
            breakpoint: breakpoint.to_string(),
            rules: OrderedMap::new(),
        }
    }

    /// Breakpoint name whose cascade layer wraps these rules.
    pub fn breakpoint(&self) -> &str {
        &self.breakpoint
    }

    /// Iterates `(selector, declarations)` in first-seen order.
    pub fn rules(&self) -> impl Iterator<Item = (&str, &Declarations)> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Groups selectors with equal declaration sets.
    ///
    /// Groups appear in order of their first member. A selector only joins an
    /// earlier group when no rule between the group's first member and itself
    /// shares a property with it.
    pub fn grouped(&self) -> Vec<RuleGroup<'_>> {
        let rules: Vec<(&str, &Declarations)> = self.rules.iter().collect();
        let mut groups: Vec<RuleGroup<'_>> = Vec::new();
        let mut starts: Vec<usize> = Vec::new();
        let mut assigned: Vec<usize> = Vec::with_capacity(rules.len());
        let mut by_key: HashMap<Vec<(&str, &str)>, usize> = HashMap::new();

        for (i, &(selector, declarations)) in rules.iter().enumerate() {
            let key = canonical_key(declarations);
            let joinable = by_key.get(&key).copied().filter(|&slot| {
                (starts[slot] + 1..i)
                    .all(|j| assigned[j] == slot || !shares_property(rules[j].1, declarations))
            });

            match joinable {
                Some(slot) => {
                    groups[slot].selectors.push(selector);
                    assigned.push(slot);
                }
                None => {
                    let slot = groups.len();
                    by_key.insert(key, slot);
                    starts.push(i);
                    assigned.push(slot);
                    groups.push(RuleGroup {
                        selectors: vec![selector],
                        declarations,
                    });
                }
            }
        }

        groups
    }

    /// One group per selector, in first-seen order.
    pub fn ungrouped(&self) -> Vec<RuleGroup<'_>> {
        self.rules
            .iter()
            .map(|(selector, declarations)| RuleGroup {
                selectors: vec![selector],
                declarations,
            })
            .collect()
    }
}

/// Order-independent identity of a declaration set.
fn canonical_key(declarations: &Declarations) -> Vec<(&str, &str)> {
    let mut entries: Vec<(&str, &str)> = declarations
        .iter()
        .map(|(property, value)| (property, value.as_str()))
        .collect();
    entries.sort_unstable();
    entries
}

fn shares_property(a: &Declarations, b: &Declarations) -> bool {
    a.keys().any(|property| b.contains_key(property))
}

/// Accumulated rules of one build.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    blocks: OrderedMap<Block>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn section_mut(&mut self, media_query: &str, breakpoint: &str) -> &mut Section {
        let block = self
            .blocks
            .get_or_insert_with(media_query, || Block::new(media_query));
        if !block.sections.contains_key(breakpoint) {
            if let Some(first) = block.sections.keys().next() {
                log::debug!(
                    "breakpoint '{}' shares query '{}' with '{}'",
                    breakpoint,
                    media_query,
                    first
                );
            }
        }
        block
            .sections
            .get_or_insert_with(breakpoint, || Section::new(breakpoint))
    }

    /// Merges declarations into `(media_query, breakpoint, selector)`.
    pub fn add<I, K, V>(&mut self, media_query: &str, breakpoint: &str, selector: &str, properties: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let declarations = self
            .section_mut(media_query, breakpoint)
            .rules
            .get_or_insert_with(selector, Declarations::new);
        for (property, value) in properties {
            declarations.insert(property, value.into());
        }
    }

    /// Declarations currently stored for a key.
    pub fn get(&self, media_query: &str, breakpoint: &str, selector: &str) -> Option<&Declarations> {
        self.blocks
            .get(media_query)?
            .sections
            .get(breakpoint)?
            .rules
            .get(selector)
    }

    /// Blocks in first-seen order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }

    /// Number of `(query, breakpoint, selector)` entries.
    pub fn len(&self) -> usize {
        self.blocks.values().map(Block::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
