//! Layout variant files.
//!
//! A variant file defines one layout family. Its `prefix` is the token
//! authors write in attribute values (`md="grid(3a)"`), and each entry in
//! `layouts` is one concrete pattern within that family:
//!
//! ```json
//! {
//!   "prefix": "grid",
//!   "layouts": [
//!     {
//!       "id": "3a",
//!       "columns": "1fr 1fr",
//!       "items": 3,
//!       "rules": [
//!         { "selector": "*:nth-of-type(3n+1)", "properties": { "grid-column": "span 2" } }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Fields used only by the runtime element or demo tooling (`srcset`,
//! `description`, `breakpoints`, `repeatable`, ...) are ignored here.

use std::fmt;

use serde::Deserialize;

use crate::error::SourceError;
use crate::ordered::OrderedMap;

/// One layout family as written on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct VariantFile {
    pub prefix: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub layouts: Vec<Variant>,
}

impl VariantFile {
    /// Parses a variant file from JSON text.
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        serde_json::from_str(json).map_err(|e| SourceError::Parse {
            path: None,
            message: e.to_string(),
        })
    }
}

/// A single layout pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Variant {
    /// Bare id on disk; namespaced as `prefix(id)` once registered.
    pub id: String,
    #[serde(default)]
    pub columns: Option<String>,
    #[serde(default)]
    pub rows: Option<String>,
    #[serde(default)]
    pub items: Option<u32>,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// Extra declarations scoped relative to the variant's container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Rule {
    pub selector: String,
    #[serde(default)]
    pub properties: OrderedMap<CssValue>,
}

/// A declaration value. JSON numbers are accepted for unitless properties
/// such as `order` or `z-index`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CssValue {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for CssValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CssValue::Text(text) => f.write_str(text),
            CssValue::Number(number) => write!(f, "{}", number),
        }
    }
}

impl From<&str> for CssValue {
    fn from(value: &str) -> Self {
        CssValue::Text(value.to_string())
    }
}
