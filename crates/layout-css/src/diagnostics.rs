//! Non-fatal build diagnostics.
//!
//! Recoverable problems (an unknown layout reference, an unreadable variant
//! file, a missing CSS module) never abort a build. Each one is logged through
//! the `log` facade at `warn` level and kept in a [`Diagnostics`] collector so
//! callers and tests can inspect what was skipped.

use thiserror::Error;

/// A recoverable problem encountered during a build.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Warning {
    #[error("layout '{layout_type}' not found (breakpoint '{breakpoint}')")]
    UnknownLayoutType {
        breakpoint: String,
        layout_type: String,
    },

    #[error("layout variant '{id}' not found in {layout_type} (breakpoint '{breakpoint}')")]
    UnknownVariant {
        breakpoint: String,
        layout_type: String,
        id: String,
    },

    #[error("failed to load layout file '{layout_type}': {message}")]
    VariantFileFailed { layout_type: String, message: String },

    #[error("duplicate variant '{id}' in {layout_type}, later definition wins")]
    DuplicateVariant { layout_type: String, id: String },

    #[error("{kind} CSS module '{module}' not found")]
    CssModuleMissing { kind: ModuleKind, module: String },

    #[error("failed to load {kind} CSS module '{module}': {message}")]
    CssModuleFailed {
        kind: ModuleKind,
        module: String,
        message: String,
    },
}

/// Which config list a CSS module came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    Core,
    Common,
}

impl std::fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModuleKind::Core => write!(f, "core"),
            ModuleKind::Common => write!(f, "common"),
        }
    }
}

/// Collects warnings for one build.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning and logs it.
    pub fn warn(&mut self, warning: Warning) {
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}
