//! Static placeholder discovery.
//! Compiles every template and reads the variable paths it references out of
//! the compiled expression tree, without rendering anything.

use crate::functions::GLOBAL_FUNCTIONS;
use crate::renderer::build_environment;
use log::{debug, warn};
use minijinja::Environment;
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of scanning one template file.
#[derive(Debug)]
pub struct FileScan {
    pub path: PathBuf,
    /// Placeholder paths found in the file, or why the file could not be read or parsed.
    pub result: Result<BTreeSet<String>, String>,
}

/// Caller-owned accumulator of placeholder paths, drained in sorted order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PlaceholderSet {
    paths: BTreeSet<String>,
}

impl PlaceholderSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.paths.into_iter().collect()
    }
}

impl Extend<String> for PlaceholderSet {
    fn extend<T: IntoIterator<Item = String>>(&mut self, iter: T) {
        self.paths.extend(iter);
    }
}

/// Extracts the dotted variable paths referenced by `source`.
pub fn scan_source(
    env: &Environment<'static>,
    name: &str,
    source: &str,
) -> Result<BTreeSet<String>, String> {
    let mut env = env.clone();
    env.add_template_owned(name.to_string(), source.to_string()).map_err(|e| e.to_string())?;
    let tmpl = env.get_template(name).map_err(|e| e.to_string())?;
    Ok(tmpl
        .undeclared_variables(true)
        .into_iter()
        .filter(|path| !is_global_function(path))
        .collect())
}

/// Reads and scans a single template file.
pub fn scan_file(env: &Environment<'static>, path: &Path) -> FileScan {
    let name = path.display().to_string();
    let result = fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|source| scan_source(env, &name, &source));
    FileScan { path: path.to_path_buf(), result }
}

fn is_global_function(path: &str) -> bool {
    let root = path.split('.').next().unwrap_or(path);
    GLOBAL_FUNCTIONS.contains(&root)
}

/// Scans `files` in parallel and folds every successful result into `acc`.
///
/// Each file is scanned independently; the merge happens on the calling
/// thread once all scans are done. Files that fail to parse contribute
/// nothing and are returned alongside the successful scans.
pub fn collect_into<P>(
    acc: &mut PlaceholderSet,
    env: &Environment<'static>,
    files: &[P],
) -> Vec<FileScan>
where
    P: AsRef<Path> + Sync,
{
    let scans: Vec<FileScan> = files
        .par_iter()
        .map(|file| scan_file(env, file.as_ref()))
        .collect();

    for scan in &scans {
        match &scan.result {
            Ok(paths) => {
                debug!("{} references {} placeholder(s)", scan.path.display(), paths.len());
                acc.extend(paths.iter().cloned());
            }
            Err(reason) => warn!("Skipping {} during discovery: {reason}", scan.path.display()),
        }
    }
    scans
}

/// Returns the sorted, deduplicated placeholder paths used across `files`.
pub fn collect<P>(files: &[P]) -> Vec<String>
where
    P: AsRef<Path> + Sync,
{
    let env = build_environment();
    let mut placeholders = PlaceholderSet::new();
    collect_into(&mut placeholders, &env, files);
    placeholders.into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str) -> BTreeSet<String> {
        scan_source(&build_environment(), "test", source).unwrap()
    }

    #[test]
    fn nested_attribute_chains_are_dotted() {
        let found = scan("{{ User.Name }} {{ User.Name | upper }} {{ GroupID }}");
        assert_eq!(found, BTreeSet::from(["GroupID".to_string(), "User.Name".to_string()]));
    }

    #[test]
    fn global_functions_are_not_placeholders() {
        let found =
            scan("{{ now('%Y') }} {{ env('HOME') }} {% for i in range(2) %}{{ i }}{% endfor %}");
        assert!(found.is_empty());
    }

    #[test]
    fn locally_bound_names_are_not_placeholders() {
        let found = scan("{% set greeting = 'hi' %}{{ greeting }} {{ target }}");
        assert_eq!(found, BTreeSet::from(["target".to_string()]));
    }

    #[test]
    fn malformed_source_is_an_error() {
        assert!(scan_source(&build_environment(), "bad", "{{ unclosed").is_err());
    }
}
