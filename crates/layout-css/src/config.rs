//! Breakpoint configuration.
//!
//! The configuration file describes *when* layouts apply: a set of named
//! breakpoints, each a `@media` or `@container` width range carrying an
//! ordered list of layout references. It also names the CSS modules to inline
//! and the sizing of the page-level layout container.
//!
//! # Format
//!
//! ```json
//! {
//!   "element": "lay-out",
//!   "core": ["base", "reset"],
//!   "common": ["animations"],
//!   "layoutContainer": {
//!     "maxLayoutWidth": { "value": "1024px" },
//!     "layoutMargin": { "value": "1rem" }
//!   },
//!   "breakpoints": {
//!     "md": { "type": "@media", "min": "720px", "layouts": ["columns", { "grid": ["grid(3a)"] }] },
//!     "lg": { "type": "@media", "min": "1024px", "layouts": ["grid"] }
//!   }
//! }
//! ```
//!
//! Breakpoints keep their document order; that order drives both the cascade
//! layer declaration and the emission order of query blocks.

use serde::Deserialize;

use crate::error::SourceError;
use crate::ordered::OrderedMap;

/// Default custom element the generated selectors target.
pub const DEFAULT_ELEMENT: &str = "lay-out";

/// Default cascade-layer namespace.
pub const DEFAULT_LAYER: &str = "layout";

/// Default element receiving the container sizing properties.
pub const DEFAULT_CONTAINER_ELEMENT: &str = "body";

/// Top-level build configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub breakpoints: OrderedMap<Breakpoint>,

    /// CSS module names emitted before the generated layout rules.
    #[serde(default)]
    pub core: Vec<String>,

    /// CSS module names emitted after the core modules.
    #[serde(default)]
    pub common: Vec<String>,

    #[serde(default)]
    pub layout_container: ContainerSpec,

    #[serde(default = "default_element")]
    pub element: String,

    /// Cascade-layer namespace (`layout` → `@layer layout.md { ... }`).
    #[serde(default = "default_layer")]
    pub layer: String,

    #[serde(default)]
    pub themes: OrderedMap<ThemeSpec>,
}

fn default_element() -> String {
    DEFAULT_ELEMENT.to_string()
}

fn default_layer() -> String {
    DEFAULT_LAYER.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            breakpoints: OrderedMap::new(),
            core: Vec::new(),
            common: Vec::new(),
            layout_container: ContainerSpec::default(),
            element: default_element(),
            layer: default_layer(),
            themes: OrderedMap::new(),
        }
    }
}

impl Config {
    /// Parses a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        serde_json::from_str(json).map_err(|e| SourceError::Parse {
            path: None,
            message: e.to_string(),
        })
    }

    /// Iterates breakpoints in document order.
    pub fn breakpoints(&self) -> impl Iterator<Item = (&str, &Breakpoint)> {
        self.breakpoints.iter()
    }
}

/// Which at-rule a breakpoint compiles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum QueryType {
    #[default]
    #[serde(rename = "@media")]
    Media,
    #[serde(rename = "@container")]
    Container,
}

impl QueryType {
    pub fn at_rule(self) -> &'static str {
        match self {
            QueryType::Media => "@media",
            QueryType::Container => "@container",
        }
    }
}

/// One named responsive condition and the layouts enabled under it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakpoint {
    #[serde(rename = "type", default)]
    pub query_type: QueryType,
    #[serde(default)]
    pub min: Option<String>,
    #[serde(default)]
    pub max: Option<String>,
    /// Query container name, only meaningful for `@container`.
    #[serde(default)]
    pub container: Option<String>,
    #[serde(default)]
    pub layouts: Vec<LayoutRef>,
}

impl Breakpoint {
    /// Builds the at-rule prelude for this breakpoint.
    ///
    /// Returns `None` when neither `min` nor `max` is set: such a breakpoint
    /// is disabled and contributes no rules.
    ///
    /// ```
    /// use layout_css::{Breakpoint, QueryType};
    ///
    /// let bp = Breakpoint {
    ///     min: Some("720px".into()),
    ///     max: Some("1023px".into()),
    ///     ..Default::default()
    /// };
    /// assert_eq!(
    ///     bp.media_query().as_deref(),
    ///     Some("@media (min-width: 720px) and (max-width: 1023px)")
    /// );
    /// ```
    pub fn media_query(&self) -> Option<String> {
        let conditions: Vec<String> = [("min-width", &self.min), ("max-width", &self.max)]
            .into_iter()
            .filter_map(|(feature, value)| {
                value
                    .as_deref()
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(|v| format!("({}: {})", feature, v))
            })
            .collect();

        if conditions.is_empty() {
            return None;
        }

        let mut prelude = self.query_type.at_rule().to_string();
        if self.query_type == QueryType::Container {
            if let Some(name) = self.container.as_deref().filter(|n| !n.is_empty()) {
                prelude.push(' ');
                prelude.push_str(name);
            }
        }
        prelude.push(' ');
        prelude.push_str(&conditions.join(" and "));
        Some(prelude)
    }
}

/// A reference from a breakpoint to layouts of one or more types.
///
/// - A bare string selects every variant of that type.
/// - An object selects only the listed namespaced ids per type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LayoutRef {
    All(String),
    Curated(OrderedMap<Vec<String>>),
}

/// Sizing of the page-level layout container.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSpec {
    #[serde(default)]
    pub element: Option<String>,
    #[serde(default)]
    pub max_layout_width: Option<TokenValue>,
    #[serde(default)]
    pub layout_margin: Option<TokenValue>,
    #[serde(default)]
    pub width_tokens: OrderedMap<TokenValue>,
    /// Center the container itself with a computed `margin-inline`.
    #[serde(default)]
    pub set_root: bool,
}

impl ContainerSpec {
    pub fn element(&self) -> &str {
        self.element
            .as_deref()
            .filter(|e| !e.is_empty())
            .unwrap_or(DEFAULT_CONTAINER_ELEMENT)
    }
}

/// A configured length, written either as a plain string or as
/// `{ "value": "...", "cssProperty": "--..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TokenValue {
    Plain(String),
    Detailed {
        value: String,
        #[serde(default, rename = "cssProperty")]
        css_property: Option<String>,
    },
}

impl TokenValue {
    pub fn value(&self) -> &str {
        match self {
            TokenValue::Plain(value) => value,
            TokenValue::Detailed { value, .. } => value,
        }
    }

    pub fn css_property(&self) -> Option<&str> {
        match self {
            TokenValue::Plain(_) => None,
            TokenValue::Detailed { css_property, .. } => css_property.as_deref(),
        }
    }
}

/// Colors applied by the `theme` attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ThemeSpec {
    #[serde(default)]
    pub bg: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bp(query_type: QueryType, min: Option<&str>, max: Option<&str>) -> Breakpoint {
        Breakpoint {
            query_type,
            min: min.map(String::from),
            max: max.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_media_query_min_only() {
        let query = bp(QueryType::Media, Some("720px"), None).media_query();
        assert_eq!(query.as_deref(), Some("@media (min-width: 720px)"));
    }

    #[test]
    fn test_media_query_max_only() {
        let query = bp(QueryType::Media, None, Some("480px")).media_query();
        assert_eq!(query.as_deref(), Some("@media (max-width: 480px)"));
    }

    #[test]
    fn test_container_query_with_name() {
        let mut breakpoint = bp(QueryType::Container, Some("40rem"), None);
        breakpoint.container = Some("page".into());
        assert_eq!(
            breakpoint.media_query().as_deref(),
            Some("@container page (min-width: 40rem)")
        );
    }

    #[test]
    fn test_breakpoint_without_range_is_inert() {
        assert_eq!(bp(QueryType::Media, None, None).media_query(), None);
        assert_eq!(bp(QueryType::Media, Some("  "), None).media_query(), None);
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config.element, "lay-out");
        assert_eq!(config.layer, "layout");
        assert_eq!(config.layout_container.element(), "body");
        assert!(config.breakpoints.is_empty());
    }

    #[test]
    fn test_layout_refs_parse_both_shapes() {
        let config = Config::from_json(
            r#"{
                "breakpoints": {
                    "md": { "type": "@container", "min": "720px",
                            "layouts": ["columns", { "grid": ["grid(3a)", "grid(3b)"] }] }
                }
            }"#,
        )
        .unwrap();

        let (name, md) = config.breakpoints().next().unwrap();
        assert_eq!(name, "md");
        assert_eq!(md.query_type, QueryType::Container);
        assert_eq!(md.layouts[0], LayoutRef::All("columns".into()));
        match &md.layouts[1] {
            LayoutRef::Curated(map) => {
                assert_eq!(map.get("grid").unwrap(), &vec!["grid(3a)", "grid(3b)"]);
            }
            other => panic!("expected curated ref, got {:?}", other),
        }
    }

    #[test]
    fn test_token_value_shapes() {
        let spec: ContainerSpec = serde_json::from_str(
            r#"{
                "element": "main",
                "maxLayoutWidth": { "value": "1024px", "cssProperty": "--layout-bleed-mw" },
                "layoutMargin": "1rem",
                "setRoot": true
            }"#,
        )
        .unwrap();

        assert_eq!(spec.element(), "main");
        assert_eq!(spec.max_layout_width.as_ref().unwrap().value(), "1024px");
        assert_eq!(
            spec.max_layout_width.as_ref().unwrap().css_property(),
            Some("--layout-bleed-mw")
        );
        assert_eq!(spec.layout_margin.as_ref().unwrap().value(), "1rem");
        assert!(spec.set_root);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = Config::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SourceError::Parse { .. }));
    }
}
