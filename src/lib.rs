//! projgen generates project skeletons from directories of template files.
//! Files whose final extension is the template marker are rendered against a
//! nested parameter store; every other file is copied verbatim.

use std::path::{Path, PathBuf};

use log::debug;

/// Command-line interface module for projgen
pub mod cli;

/// Common constants
pub mod constants;

/// Error types and handling
pub mod error;

/// Extension filters and functions available inside templates
pub mod functions;

/// Logger setup
pub mod logger;

/// Parameter store, overrides and parameter files
pub mod params;

/// Static placeholder discovery
pub mod collector;

/// Template rendering
pub mod renderer;

/// Output tree materialization
pub mod processor;

use crate::collector::{collect_into, PlaceholderSet};
use crate::constants::NAME_KEY;
use crate::error::Result;
use crate::params::{apply_overrides, ensure_complete, load_params_file, Store};
use crate::processor::{list_templates, materialize, GeneratedProject};
use crate::renderer::MiniJinjaRenderer;

/// Options for the `generate` operation.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Directory holding one subdirectory per project type.
    pub template_dir: PathBuf,
    /// Project type, the subdirectory of `template_dir` to generate from.
    pub project_type: String,
    /// Where the project is written.
    pub output_dir: PathBuf,
    /// Explicit project name, stored under `name`.
    pub name: Option<String>,
    /// `key=value` / `key.sub=value` overrides.
    pub overrides: Vec<String>,
    /// Optional parameters file.
    pub params_file: Option<PathBuf>,
    /// Final extension marking template files.
    pub marker: String,
}

impl GenerateOptions {
    pub fn template_root(&self) -> PathBuf {
        self.template_dir.join(&self.project_type)
    }
}

/// Builds the parameter store: parameters file, then overrides, then the
/// explicit name, each taking precedence over the previous.
pub fn build_store(options: &GenerateOptions) -> Result<Store> {
    let mut store = match &options.params_file {
        Some(path) => load_params_file(path)?,
        None => Store::new(),
    };
    apply_overrides(&mut store, &options.overrides);
    if let Some(name) = &options.name {
        store.insert(NAME_KEY, name.as_str());
    }
    Ok(store)
}

/// Returns the sorted placeholder paths referenced by the templates under
/// `template_root`.
pub fn discover<P: AsRef<Path>>(template_root: P, marker: &str) -> Result<Vec<String>> {
    let files = list_templates(template_root, marker)?;
    let renderer = MiniJinjaRenderer::new();
    let mut placeholders = PlaceholderSet::new();
    collect_into(&mut placeholders, renderer.environment(), &files);
    Ok(placeholders.into_vec())
}

/// Lists the placeholders a project type requires.
pub fn inspect<P: AsRef<Path>>(
    template_dir: P,
    project_type: &str,
    marker: &str,
) -> Result<Vec<String>> {
    discover(template_dir.as_ref().join(project_type), marker)
}

/// Generates a project.
///
/// Discovers placeholders, checks all of them resolve, then renders and copies
/// the template tree. Nothing is written when a parameter is missing.
pub fn generate(options: &GenerateOptions) -> Result<GeneratedProject> {
    let store = build_store(options)?;
    let template_root = options.template_root();

    let required = discover(&template_root, &options.marker)?;
    debug!("Templates require {} parameter(s)", required.len());
    ensure_complete(&store, &required)?;

    let renderer = MiniJinjaRenderer::new();
    materialize(&renderer, &template_root, &options.output_dir, &store, &options.marker)
}
