//! Layout registry.
//!
//! [`LayoutRegistry`] holds every loaded variant file, keyed by *layout type*
//! (the file's base name, e.g. `grid` for `layouts/grid.json`). Loading
//! rewrites each variant's bare id into its namespaced form, so everything
//! downstream only ever sees `prefix(id)`:
//!
//! | file | prefix | bare id | registered id |
//! |------|--------|---------|---------------|
//! | `columns.json` | `columns` | `2` | `columns(2)` |
//! | `grid.json` | `grid` | `3a` | `grid(3a)` |
//!
//! Variants are indexed twice: as an ordered list (for "every variant of this
//! type") and by exact namespaced id (for curated subsets).
//!
//! A type that no breakpoint references is simply never looked up; a type that
//! is referenced but missing is reported by the resolver, not here.

use std::collections::HashMap;

use crate::diagnostics::{Diagnostics, Warning};
use crate::variant::{Variant, VariantFile};

/// Registered variants of one layout type.
#[derive(Debug, Clone)]
struct LayoutType {
    prefix: String,
    variants: Vec<Variant>,
    by_id: HashMap<String, usize>,
}

/// Prefix-qualified index over all loaded variant files.
#[derive(Debug, Clone, Default)]
pub struct LayoutRegistry {
    types: HashMap<String, LayoutType>,
    /// Type names in registration order.
    order: Vec<String>,
}

impl LayoutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from `(layout_type, file)` pairs.
    pub fn load<I, S>(files: I, diagnostics: &mut Diagnostics) -> Self
    where
        I: IntoIterator<Item = (S, VariantFile)>,
        S: Into<String>,
    {
        let mut registry = Self::new();
        for (layout_type, file) in files {
            registry.register(layout_type, file, diagnostics);
        }
        registry
    }

    /// Registers one variant file under `layout_type`.
    ///
    /// Registering the same type twice replaces the earlier file. Within a
    /// file, a repeated id replaces the earlier variant but keeps its
    /// position, and a [`Warning::DuplicateVariant`] is recorded.
    pub fn register(
        &mut self,
        layout_type: impl Into<String>,
        file: VariantFile,
        diagnostics: &mut Diagnostics,
    ) {
        let layout_type = layout_type.into();
        let prefix = file.prefix;

        let mut entry = LayoutType {
            prefix: prefix.clone(),
            variants: Vec::with_capacity(file.layouts.len()),
            by_id: HashMap::new(),
        };

        for mut variant in file.layouts {
            variant.id = namespaced_id(&prefix, &variant.id);

            match entry.by_id.get(&variant.id) {
                Some(&slot) => {
                    diagnostics.warn(Warning::DuplicateVariant {
                        layout_type: layout_type.clone(),
                        id: variant.id.clone(),
                    });
                    entry.variants[slot] = variant;
                }
                None => {
                    entry.by_id.insert(variant.id.clone(), entry.variants.len());
                    entry.variants.push(variant);
                }
            }
        }

        log::debug!(
            "registered {} variant(s) for '{}' (prefix '{}')",
            entry.variants.len(),
            layout_type,
            prefix
        );

        if self.types.insert(layout_type.clone(), entry).is_none() {
            self.order.push(layout_type);
        }
    }

    /// Returns every variant of a type, or `None` if the type is unknown.
    pub fn get(&self, layout_type: &str) -> Option<&[Variant]> {
        self.types.get(layout_type).map(|t| t.variants.as_slice())
    }

    /// Finds one variant by its exact namespaced id.
    pub fn find(&self, layout_type: &str, namespaced_id: &str) -> Option<&Variant> {
        let entry = self.types.get(layout_type)?;
        entry.by_id.get(namespaced_id).map(|&slot| &entry.variants[slot])
    }

    /// Returns the prefix a type's file declared.
    pub fn prefix_of(&self, layout_type: &str) -> Option<&str> {
        self.types.get(layout_type).map(|t| t.prefix.as_str())
    }

    /// Iterates registered type names in registration order.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Total number of registered variants across all types.
    pub fn variant_count(&self) -> usize {
        self.types.values().map(|t| t.variants.len()).sum()
    }
}

/// Builds `prefix(id)`.
pub fn namespaced_id(prefix: &str, id: &str) -> String {
    format!("{}({})", prefix, id)
}
