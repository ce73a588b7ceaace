//! Build orchestration.
//!
//! [`Builder`] runs one complete build against a [`SourceProvider`]:
//!
//! ```text
//! load config ─► load variant files ─► load CSS modules
//!      │                │                     │
//!    fatal        warning per file     warning per module
//!                       ▼                     │
//!                 LayoutRegistry              │
//!                       ▼                     │
//!          resolve ─► generate ─► RuleTable   │
//!                                    ▼        ▼
//!                                   emit ─► CSS
//! ```
//!
//! Every build starts from scratch: a fresh registry, rule table and
//! diagnostics collector, dropped when the build returns.

use crate::config::Config;
use crate::diagnostics::{Diagnostics, ModuleKind, Warning};
use crate::emit::{emit, EmitOptions};
use crate::error::BuildError;
use crate::generate::RuleGenerator;
use crate::registry::LayoutRegistry;
use crate::resolve::resolve;
use crate::source::SourceProvider;
use crate::table::RuleTable;

/// Result of a successful build.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub css: String,
    /// Number of `(query, selector)` entries generated.
    pub rules: usize,
    pub warnings: Vec<Warning>,
}

impl BuildOutput {
    /// Size of the stylesheet in bytes.
    pub fn size(&self) -> usize {
        self.css.len()
    }
}

/// Runs builds against one source.
///
/// ```
/// use layout_css::{Builder, MemorySource};
///
/// let source = MemorySource::new(
///     r#"{ "breakpoints": { "md": { "min": "720px", "layouts": ["columns"] } } }"#,
/// )
/// .with_layout("columns", r#"{ "prefix": "columns", "layouts": [{ "id": "2", "columns": "1fr 1fr" }] }"#);
///
/// let output = Builder::new(source).build().unwrap();
/// assert!(output.css.contains(r#"lay-out[md="columns(2)"]"#));
/// assert!(output.warnings.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Builder<S> {
    source: S,
    options: EmitOptions,
}

impl<S: SourceProvider> Builder<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            options: EmitOptions::default(),
        }
    }

    pub fn options(mut self, options: EmitOptions) -> Self {
        self.options = options;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Runs the whole pipeline once.
    ///
    /// Only an unreadable configuration or an unlistable layout source is an
    /// error; everything else is reported in [`BuildOutput::warnings`].
    pub fn build(&self) -> Result<BuildOutput, BuildError> {
        let config = self.source.load_config().map_err(BuildError::Config)?;
        let mut diagnostics = Diagnostics::new();

        let registry = self.load_registry(&mut diagnostics)?;
        log::debug!(
            "loaded {} layout type(s), {} variant(s)",
            registry.len(),
            registry.variant_count()
        );

        let core = self.load_modules(ModuleKind::Core, &config.core, &mut diagnostics);
        let common = self.load_modules(ModuleKind::Common, &config.common, &mut diagnostics);

        let table = compile(&config, &registry, &mut diagnostics);
        let css = emit(&table, &config, &core, &common, &self.options);

        log::info!(
            "generated {} rule(s), {:.2} KB",
            table.len(),
            css.len() as f64 / 1024.0
        );

        Ok(BuildOutput {
            css,
            rules: table.len(),
            warnings: diagnostics.into_warnings(),
        })
    }

    fn load_registry(&self, diagnostics: &mut Diagnostics) -> Result<LayoutRegistry, BuildError> {
        let types = self.source.variant_types().map_err(BuildError::Source)?;

        let mut files = Vec::with_capacity(types.len());
        for layout_type in types {
            match self.source.load_variant_file(&layout_type) {
                Ok(file) => files.push((layout_type, file)),
                Err(e) => diagnostics.warn(Warning::VariantFileFailed {
                    layout_type,
                    message: e.to_string(),
                }),
            }
        }

        Ok(LayoutRegistry::load(files, diagnostics))
    }

    /// Concatenates the named modules, separated by a blank line.
    fn load_modules(&self, kind: ModuleKind, names: &[String], diagnostics: &mut Diagnostics) -> String {
        let mut texts = Vec::with_capacity(names.len());
        for name in names {
            match self.source.load_css_module(name) {
                Ok(Some(text)) => texts.push(text),
                Ok(None) => diagnostics.warn(Warning::CssModuleMissing {
                    kind,
                    module: name.clone(),
                }),
                Err(e) => diagnostics.warn(Warning::CssModuleFailed {
                    kind,
                    module: name.clone(),
                    message: e.to_string(),
                }),
            }
        }
        texts.join("\n\n")
    }
}

/// Resolves every breakpoint and generates its rules into a fresh table.
pub fn compile(config: &Config, registry: &LayoutRegistry, diagnostics: &mut Diagnostics) -> RuleTable {
    let items = resolve(config, registry, diagnostics);

    let mut table = RuleTable::new();
    let mut generator = RuleGenerator::new(&config.element);
    for item in &items {
        generator.generate(item, &mut table);
    }
    table
}
