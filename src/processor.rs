//! Project materialization.
//! Walks the template tree and, per file, either renders it and writes the
//! result without the template marker or copies it verbatim.

use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::{
    error::{Error, Result},
    params::Store,
    renderer::{render_file, TemplateRenderer},
};

/// Files produced by a generation run, relative to the output root.
#[derive(Debug, Default)]
pub struct GeneratedProject {
    pub files_rendered: Vec<PathBuf>,
    pub files_copied: Vec<PathBuf>,
}

/// Whether `path`'s final extension is exactly `marker`.
///
/// `config.yml.tmpl` is a template for marker `tmpl` (or `.tmpl`);
/// `config.tmpl.yml` is not.
pub fn is_template<P: AsRef<Path>>(path: P, marker: &str) -> bool {
    let marker = marker.trim_start_matches('.');
    path.as_ref()
        .extension()
        .is_some_and(|ext| ext == marker)
}

/// Joins `relative_path` onto `output_root`, stripping the marker from
/// template file names. Returns the target path and whether it is a template.
pub fn resolve_target_path<P: AsRef<Path>, O: AsRef<Path>>(
    relative_path: P,
    output_root: O,
    marker: &str,
) -> (PathBuf, bool) {
    let relative_path = relative_path.as_ref();
    let target = output_root.as_ref().join(relative_path);
    if is_template(relative_path, marker) {
        (target.with_extension(""), true)
    } else {
        (target, false)
    }
}

/// Lists every regular file under `root`, sorted by path.
pub fn list_files<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(Error::TemplateNotFound { path: root.to_path_buf() });
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            Error::fs(path, e.into())
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Lists the template files under `root`.
pub fn list_templates<P: AsRef<Path>>(root: P, marker: &str) -> Result<Vec<PathBuf>> {
    Ok(list_files(root)?
        .into_iter()
        .filter(|path| is_template(path, marker))
        .collect())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::fs(parent, e))?;
    }
    Ok(())
}

fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, content).map_err(|e| Error::fs(path, e))
}

fn copy_file(source: &Path, dest: &Path) -> Result<()> {
    let content = fs::read(source).map_err(|e| Error::fs(source, e))?;
    write_file(dest, &content)
}

/// Drives generation of one project tree.
pub struct Processor<'a> {
    renderer: &'a dyn TemplateRenderer,
    template_root: &'a Path,
    output_root: &'a Path,
    params: &'a Store,
    marker: &'a str,
}

impl<'a> Processor<'a> {
    pub fn new(
        renderer: &'a dyn TemplateRenderer,
        template_root: &'a Path,
        output_root: &'a Path,
        params: &'a Store,
        marker: &'a str,
    ) -> Self {
        Self { renderer, template_root, output_root, params, marker }
    }

    /// Processes every file under the template root. Stops at the first
    /// failure; files written before it are left in place.
    pub fn run(&self) -> Result<GeneratedProject> {
        debug!("Listing files under {}", self.template_root.display());
        let files = list_files(self.template_root)?;

        let mut project = GeneratedProject::default();
        for file in &files {
            self.process(file, &mut project)?;
        }
        Ok(project)
    }

    fn process(&self, source: &Path, project: &mut GeneratedProject) -> Result<()> {
        let relative_path = source.strip_prefix(self.template_root).map_err(|e| {
            Error::ConfigError(format!("{} is outside the template root: {e}", source.display()))
        })?;
        let (target, is_template) = resolve_target_path(relative_path, self.output_root, self.marker);

        if is_template {
            let content = render_file(self.renderer, source, self.params)?;
            debug!("Writing file: {}", target.display());
            write_file(&target, &content)?;
            project.files_rendered.push(relative_path.with_extension(""));
        } else {
            debug!("Copying file: {}", target.display());
            copy_file(source, &target)?;
            project.files_copied.push(relative_path.to_path_buf());
        }
        Ok(())
    }
}

/// Renders or copies every file from `template_root` into `output_root`.
pub fn materialize(
    renderer: &dyn TemplateRenderer,
    template_root: &Path,
    output_root: &Path,
    params: &Store,
    marker: &str,
) -> Result<GeneratedProject> {
    Processor::new(renderer, template_root, output_root, params, marker).run()
}
