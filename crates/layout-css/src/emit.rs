//! Stylesheet emission.
//!
//! Renders a [`RuleTable`] plus the configuration's static parts into one CSS
//! string. Sections always appear in this order, separated by a blank line:
//!
//! 1. the `@layer` order declaration
//! 2. core module CSS, then common module CSS, verbatim
//! 3. the layout container sizing block
//! 4. one block per theme
//! 5. one `@media`/`@container` block per distinct query, in first-seen order
//!
//! Empty sections are skipped. With [`EmitOptions::layered`] each
//! breakpoint's rules inside a query block sit in `@layer <ns>.<breakpoint> {
//! ... }` so later breakpoints win regardless of specificity. Breakpoints that
//! share a query string get one layer each inside the same block.
//!
//! The output is a pure function of its inputs.

use crate::config::{Config, ContainerSpec, ThemeSpec};
use crate::table::{Block, RuleGroup, RuleTable};

/// Fixed layers declared ahead of the per-breakpoint ones.
pub const BASE_LAYERS: [&str; 3] = ["base", "reset", "animations"];

/// Default custom property for `layoutContainer.maxLayoutWidth`.
pub const PROP_MAX_WIDTH: &str = "--layout-bleed-mw";
/// Default custom property for `layoutContainer.layoutMargin`.
pub const PROP_MARGIN: &str = "--layout-mi";
/// Default custom property prefix for width tokens.
pub const PROP_WIDTH_TOKEN_PREFIX: &str = "--layout-w-";

const INDENT: &str = "  ";

/// Controls the shape of emitted query blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitOptions {
    /// Wrap each query block's rules in its breakpoint's cascade layer.
    pub layered: bool,
    /// Merge selectors with identical declarations into one rule.
    pub group_identical: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            layered: true,
            group_identical: true,
        }
    }
}

/// Renders the complete stylesheet.
pub fn emit(
    table: &RuleTable,
    config: &Config,
    core: &str,
    common: &str,
    options: &EmitOptions,
) -> String {
    let mut sections: Vec<String> = vec![layer_declaration(config)];

    for module in [core, common] {
        let module = module.trim_end();
        if !module.trim_start().is_empty() {
            sections.push(module.to_string());
        }
    }

    if let Some(block) = container_block(&config.layout_container) {
        sections.push(block);
    }

    sections.extend(
        config
            .themes
            .iter()
            .filter_map(|(name, theme)| theme_block(&config.element, name, theme)),
    );

    sections.extend(
        table
            .blocks()
            .filter(|block| !block.is_empty())
            .map(|block| query_block(block, &config.layer, options)),
    );

    let mut css = sections.join("\n\n");
    css.push('\n');
    css
}

/// `@layer layout.base, layout.reset, layout.animations, layout.md, ...;`
///
/// Breakpoints are listed in configuration order, disabled ones included, so
/// the layer order never depends on which breakpoints produced rules.
pub fn layer_declaration(config: &Config) -> String {
    let names: Vec<String> = BASE_LAYERS
        .iter()
        .map(|name| layer_name(&config.layer, name))
        .chain(
            config
                .breakpoints
                .keys()
                .map(|name| layer_name(&config.layer, name)),
        )
        .collect();
    format!("@layer {};", names.join(", "))
}

fn layer_name(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", namespace, name)
    }
}

/// Sizing properties for the page-level layout container.
///
/// Returns `None` when nothing is configured.
pub fn container_block(spec: &ContainerSpec) -> Option<String> {
    let mut declarations: Vec<(String, String)> = Vec::new();

    let max_width = spec.max_layout_width.as_ref().map(|token| {
        let property = token.css_property().unwrap_or(PROP_MAX_WIDTH).to_string();
        declarations.push((property.clone(), token.value().to_string()));
        property
    });

    let margin = spec.layout_margin.as_ref().map(|token| {
        let property = token.css_property().unwrap_or(PROP_MARGIN).to_string();
        declarations.push((property.clone(), token.value().to_string()));
        property
    });

    for (name, token) in spec.width_tokens.iter() {
        let property = token
            .css_property()
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}{}", PROP_WIDTH_TOKEN_PREFIX, name));
        declarations.push((property, token.value().to_string()));
    }

    if spec.set_root {
        let centered = match (&max_width, &margin) {
            (Some(mw), Some(mi)) => Some(format!("max(var({}), (100% - var({})) / 2)", mi, mw)),
            (Some(mw), None) => Some(format!("max(0px, (100% - var({})) / 2)", mw)),
            (None, Some(mi)) => Some(format!("var({})", mi)),
            (None, None) => None,
        };
        if let Some(value) = centered {
            declarations.push(("margin-inline".to_string(), value));
        }
    }

    if declarations.is_empty() {
        return None;
    }

    let mut css = String::new();
    write_rule(
        &mut css,
        0,
        &[spec.element()],
        declarations.iter().map(|(p, v)| (p.as_str(), v.as_str())),
    );
    Some(css.trim_end().to_string())
}

fn theme_block(element: &str, name: &str, theme: &ThemeSpec) -> Option<String> {
    let declarations: Vec<(&str, &str)> = [("--layout-bg", &theme.bg), ("--layout-c", &theme.color)]
        .into_iter()
        .filter_map(|(property, value)| value.as_deref().map(|v| (property, v)))
        .collect();

    if declarations.is_empty() {
        return None;
    }

    let selector = format!("{}[theme=\"{}\"]", element, name);
    let mut css = String::new();
    write_rule(&mut css, 0, &[selector.as_str()], declarations);
    Some(css.trim_end().to_string())
}

fn query_block(block: &Block, namespace: &str, options: &EmitOptions) -> String {
    let mut css = String::new();
    css.push_str(&format!("{} {{\n", block.query()));

    for (i, section) in block.sections().filter(|s| !s.is_empty()).enumerate() {
        if i > 0 {
            css.push('\n');
        }
        let groups = if options.group_identical {
            section.grouped()
        } else {
            section.ungrouped()
        };

        if options.layered {
            css.push_str(&format!(
                "{}@layer {} {{\n",
                INDENT,
                layer_name(namespace, section.breakpoint())
            ));
            write_groups(&mut css, 2, &groups);
            css.push_str(INDENT);
            css.push_str("}\n");
        } else {
            write_groups(&mut css, 1, &groups);
        }
    }

    css.push('}');
    css
}

fn write_groups(css: &mut String, depth: usize, groups: &[RuleGroup<'_>]) {
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            css.push('\n');
        }
        write_rule(
            css,
            depth,
            group.selectors.as_slice(),
            group.declarations.iter().map(|(p, v)| (p, v.as_str())),
        );
    }
}

fn write_rule<'a, S, I>(css: &mut String, depth: usize, selectors: &[S], declarations: I)
where
    S: AsRef<str>,
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let indent = INDENT.repeat(depth);
    let selector_list = selectors
        .iter()
        .map(|s| format!("{}{}", indent, s.as_ref()))
        .collect::<Vec<_>>()
        .join(",\n");

    css.push_str(&format!("{} {{\n", selector_list));
    for (property, value) in declarations {
        css.push_str(&format!("{}{}{}: {};\n", indent, INDENT, property, value));
    }
    css.push_str(&format!("{}}}\n", indent));
}
