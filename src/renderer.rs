//! Template rendering for projgen.
//! Evaluates a single template against the parameter store using MiniJinja
//! plus the extension library from [`crate::functions`].
use crate::error::{Error, Result};
use crate::functions;
use crate::params::Store;
use log::debug;
use minijinja::{Environment, UndefinedBehavior};
use std::fs;
use std::path::Path;

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders template source with the given parameters.
    ///
    /// # Arguments
    /// * `path` - Path the source was read from, used for naming and errors
    /// * `source` - Template source text
    /// * `params` - Parameter store to evaluate against
    ///
    /// # Errors
    /// * `Error::TemplateParseError` if the source does not compile
    /// * `Error::TemplateExecutionError` if evaluation fails
    fn render(&self, path: &Path, source: &str, params: &Store) -> Result<String>;
}

/// Builds the environment shared by rendering and placeholder discovery.
pub fn build_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    functions::register(&mut env);
    env
}

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Creates a renderer with the extension library registered.
    pub fn new() -> Self {
        Self { env: build_environment() }
    }

    pub fn environment(&self) -> &Environment<'static> {
        &self.env
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(&self, path: &Path, source: &str, params: &Store) -> Result<String> {
        let name = path.display().to_string();
        let parse_error = |e: minijinja::Error| Error::TemplateParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let mut env = self.env.clone();
        env.add_template_owned(name.clone(), source.to_string()).map_err(parse_error)?;
        let tmpl = env.get_template(&name).map_err(parse_error)?;

        tmpl.render(params).map_err(|e| Error::TemplateExecutionError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Reads a template file and renders it. The caller receives either the full
/// output or an error, never partial content.
pub fn render_file<P: AsRef<Path>>(
    renderer: &dyn TemplateRenderer,
    path: P,
    params: &Store,
) -> Result<Vec<u8>> {
    let path = path.as_ref();
    debug!("Rendering template {}", path.display());
    let source = fs::read_to_string(path).map_err(|e| Error::fs(path, e))?;
    renderer.render(path, &source, params).map(String::into_bytes)
}
