//! layout-css - Compiles declarative layout definitions into one cascade-layered stylesheet.
//!
//! Layouts are described as data instead of CSS:
//!
//! - a **configuration** names the breakpoints (`@media`/`@container` width
//!   ranges) and which layouts each one enables
//! - **variant files** (one per layout type) describe concrete grid patterns:
//!   template columns and rows, item counts, and per-child rules
//!
//! The compiler expands that into attribute selectors a `<lay-out>` custom
//! element matches at runtime, e.g. `<lay-out md="columns(2)">`.
//!
//! # Quick Start
//!
//! ```rust
//! use layout_css::{Builder, MemorySource};
//!
//! let source = MemorySource::new(r#"{
//!     "breakpoints": {
//!         "md": { "min": "720px", "layouts": ["columns"] }
//!     }
//! }"#)
//! .with_layout("columns", r#"{
//!     "prefix": "columns",
//!     "layouts": [{ "id": "2", "columns": "1fr 1fr", "items": 2 }]
//! }"#);
//!
//! let output = Builder::new(source).build().unwrap();
//!
//! assert!(output.css.starts_with("@layer layout.base, layout.reset, layout.animations, layout.md;"));
//! assert!(output.css.contains("lay-out[md=\"columns(2)\"] {\n      --layout-gtc: 1fr 1fr;\n      --_ci: 2;"));
//! ```
//!
//! # Pipeline
//!
//! ```text
//! SourceProvider ─► LayoutRegistry ─► resolve ─► RuleGenerator ─► RuleTable ─► emit
//! ```
//!
//! | Stage | Input | Output |
//! |-------|-------|--------|
//! | [`LayoutRegistry`] | variant files | variants indexed by `prefix(id)` |
//! | [`resolve`] | config + registry | [`WorkItem`]s, deduplicated per breakpoint |
//! | [`RuleGenerator`] | work items | selector/declaration writes |
//! | [`RuleTable`] | writes | merged, ordered rules per query and breakpoint |
//! | [`emit`] | table + config | the stylesheet |
//!
//! [`Builder`] wires the stages to a [`SourceProvider`]; [`compile`] runs the
//! middle stages on already-loaded inputs.
//!
//! # Errors and Warnings
//!
//! A build fails ([`BuildError`]) only when the configuration cannot be loaded
//! or the layout sources cannot be listed. Unknown references, broken variant
//! files and missing CSS modules become [`Warning`]s: they are logged through
//! the `log` facade and returned in [`BuildOutput::warnings`], and the build
//! carries on without the affected rules.

mod builder;
mod config;
mod diagnostics;
mod emit;
mod error;
mod generate;
mod minify;
mod ordered;
mod registry;
mod resolve;
mod source;
mod table;
mod variant;

pub use builder::{compile, BuildOutput, Builder};
pub use config::{
    Breakpoint, Config, ContainerSpec, LayoutRef, QueryType, ThemeSpec, TokenValue,
    DEFAULT_CONTAINER_ELEMENT, DEFAULT_ELEMENT, DEFAULT_LAYER,
};
pub use diagnostics::{Diagnostics, ModuleKind, Warning};
pub use emit::{container_block, emit, layer_declaration, EmitOptions, BASE_LAYERS};
pub use error::{BuildError, SourceError};
pub use generate::{container_properties, container_selector, rewrite_selector, RuleGenerator};
pub use minify::minify;
pub use ordered::OrderedMap;
pub use registry::{namespaced_id, LayoutRegistry};
pub use resolve::{extract_layout_id, resolve, WorkItem};
pub use source::{DirSource, MemorySource, SourceProvider};
pub use table::{Block, Declarations, RuleGroup, RuleTable, Section};
pub use variant::{CssValue, Rule, Variant, VariantFile};
