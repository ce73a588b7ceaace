//! Input providers.
//!
//! A build reads three kinds of input: the configuration, one JSON file per
//! layout type, and raw CSS for the `core`/`common` module names. The
//! [`SourceProvider`] trait hides where they come from, so the pipeline itself
//! never touches the filesystem.
//!
//! Two providers ship with the crate:
//!
//! - [`MemorySource`]: everything held in memory, for tests and embedding.
//! - [`DirSource`]: the on-disk project layout used by the CLI.
//!
//! ```text
//! project/
//! ├── layout.config.json
//! ├── layouts/
//! │   ├── columns.json      → layout type "columns"
//! │   └── grid.json         → layout type "grid"
//! └── core/
//!     ├── base.css          → module "base"
//!     └── animations.css    → module "animations"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::SourceError;
use crate::ordered::OrderedMap;
use crate::variant::VariantFile;

/// Extension of layout type files.
pub const LAYOUT_EXTENSION: &str = "json";
/// Extension of CSS module files.
pub const MODULE_EXTENSION: &str = "css";

/// Supplies the inputs of one build.
pub trait SourceProvider {
    /// Loads and parses the configuration.
    fn load_config(&self) -> Result<Config, SourceError>;

    /// Names of all available layout types, in a stable order.
    fn variant_types(&self) -> Result<Vec<String>, SourceError>;

    /// Loads and parses the variant file of one layout type.
    fn load_variant_file(&self, layout_type: &str) -> Result<VariantFile, SourceError>;

    /// Loads the raw text of a CSS module.
    ///
    /// `Ok(None)` means the module does not exist.
    fn load_css_module(&self, name: &str) -> Result<Option<String>, SourceError>;
}

/// In-memory inputs.
///
/// ```
/// use layout_css::{MemorySource, SourceProvider};
///
/// let source = MemorySource::new(r#"{ "breakpoints": {} }"#)
///     .with_layout("grid", r#"{ "prefix": "grid", "layouts": [] }"#)
///     .with_module("base", "lay-out { display: grid; }");
///
/// assert_eq!(source.variant_types().unwrap(), vec!["grid"]);
/// assert!(source.load_css_module("missing").unwrap().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    config: String,
    layouts: OrderedMap<String>,
    modules: OrderedMap<String>,
}

impl MemorySource {
    /// Creates a source from configuration JSON text.
    pub fn new(config: impl Into<String>) -> Self {
        Self {
            config: config.into(),
            ..Default::default()
        }
    }

    /// Adds a layout type's variant file JSON.
    pub fn with_layout(mut self, layout_type: impl Into<String>, json: impl Into<String>) -> Self {
        self.layouts.insert(layout_type, json.into());
        self
    }

    /// Adds a CSS module.
    pub fn with_module(mut self, name: impl Into<String>, css: impl Into<String>) -> Self {
        self.modules.insert(name, css.into());
        self
    }
}

impl SourceProvider for MemorySource {
    fn load_config(&self) -> Result<Config, SourceError> {
        Config::from_json(&self.config)
    }

    fn variant_types(&self) -> Result<Vec<String>, SourceError> {
        Ok(self.layouts.keys().map(str::to_string).collect())
    }

    fn load_variant_file(&self, layout_type: &str) -> Result<VariantFile, SourceError> {
        let json = self
            .layouts
            .get(layout_type)
            .ok_or_else(|| SourceError::NotFound(layout_type.to_string()))?;
        VariantFile::from_json(json)
    }

    fn load_css_module(&self, name: &str) -> Result<Option<String>, SourceError> {
        Ok(self.modules.get(name).cloned())
    }
}

/// Inputs read from a project directory.
///
/// Layout types are the `*.json` files directly inside the layouts directory
/// (by default `<config dir>/layouts`), named by file stem and listed in
/// sorted order. Modules are `<name>.css` files inside the modules directory
/// (by default `<config dir>/core`).
#[derive(Debug, Clone)]
pub struct DirSource {
    config_path: PathBuf,
    layouts_dir: PathBuf,
    modules_dir: PathBuf,
}

impl DirSource {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        let config_path = config_path.into();
        let root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            layouts_dir: root.join("layouts"),
            modules_dir: root.join("core"),
            config_path,
        }
    }

    /// Overrides the layouts directory.
    pub fn layouts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.layouts_dir = dir.into();
        self
    }

    /// Overrides the CSS modules directory.
    pub fn modules_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.modules_dir = dir.into();
        self
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Every file whose change affects the build output.
    ///
    /// Missing directories contribute nothing.
    pub fn watched_paths(&self) -> Vec<PathBuf> {
        let mut paths = vec![self.config_path.clone()];
        for (dir, extension) in [
            (&self.layouts_dir, LAYOUT_EXTENSION),
            (&self.modules_dir, MODULE_EXTENSION),
        ] {
            if let Ok(files) = list_files(dir, extension) {
                paths.extend(files);
            }
        }
        paths
    }

    fn layout_path(&self, layout_type: &str) -> PathBuf {
        self.layouts_dir
            .join(format!("{}.{}", layout_type, LAYOUT_EXTENSION))
    }

    fn module_path(&self, name: &str) -> PathBuf {
        self.modules_dir.join(format!("{}.{}", name, MODULE_EXTENSION))
    }
}

impl SourceProvider for DirSource {
    fn load_config(&self) -> Result<Config, SourceError> {
        let text = read(&self.config_path)?;
        Config::from_json(&text).map_err(|e| e.at(&self.config_path))
    }

    fn variant_types(&self) -> Result<Vec<String>, SourceError> {
        let files = list_files(&self.layouts_dir, LAYOUT_EXTENSION)?;
        Ok(files
            .iter()
            .filter_map(|path| path.file_stem())
            .map(|stem| stem.to_string_lossy().into_owned())
            .collect())
    }

    fn load_variant_file(&self, layout_type: &str) -> Result<VariantFile, SourceError> {
        let path = self.layout_path(layout_type);
        let text = read(&path)?;
        VariantFile::from_json(&text).map_err(|e| e.at(&path))
    }

    fn load_css_module(&self, name: &str) -> Result<Option<String>, SourceError> {
        let path = self.module_path(name);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(SourceError::Io { path, source }),
        }
    }
}

fn read(path: &Path) -> Result<String, SourceError> {
    fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Files with `extension` directly inside `dir`, sorted by path.
fn list_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, SourceError> {
    let io_error = |source: io::Error| SourceError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
