//! Parameter store handling.
//! Builds the nested key/value structure that templates are rendered against,
//! applies command-line overrides and checks which placeholder paths resolve.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::{debug, warn};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// A single parameter value: either a plain string or a nested table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(String),
    Table(IndexMap<String, Value>),
}

impl Value {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s),
            Value::Table(_) => None,
        }
    }

    pub fn as_table(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Table(table) => Some(table),
            Value::Scalar(_) => None,
        }
    }

    /// Turns this value into a table, discarding a scalar if one was stored.
    fn make_table(&mut self, key: &str) -> &mut IndexMap<String, Value> {
        if let Value::Scalar(old) = self {
            warn!("Parameter '{key}' was '{old}' and is replaced by a nested table");
            *self = Value::Table(IndexMap::new());
        }
        let Value::Table(table) = self else {
            unreachable!("scalar was replaced by a table above");
        };
        table
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(s)
    }
}

/// Root of the parameter structure handed to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Store(IndexMap<String, Value>);

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sets a top-level key, replacing whatever was stored there.
    pub fn insert<V: Into<Value>>(&mut self, key: &str, value: V) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Resolves a dotted path. Every segment but the last has to name a table;
    /// the last one may hold any value.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.0.get(segments.next()?)?;
        for segment in segments {
            current = current.as_table()?.get(segment)?;
        }
        Some(current)
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.get_path(path).is_some()
    }

    /// Whether `path` is already declared, either itself or through a scalar
    /// stored at one of its prefixes.
    pub fn is_declared(&self, path: &str) -> bool {
        if self.contains_path(path) {
            return true;
        }
        path.match_indices('.')
            .any(|(end, _)| matches!(self.get_path(&path[..end]), Some(Value::Scalar(_))))
    }

    /// Assigns `value` at the dotted `path`, creating intermediate tables.
    /// An intermediate scalar is overwritten with a fresh table.
    pub fn set_path(&mut self, path: &str, value: Value) {
        let segments: Vec<&str> = path.split('.').collect();
        let Some((last, parents)) = segments.split_last() else {
            return;
        };
        let mut table = &mut self.0;
        for segment in parents {
            table = table
                .entry(segment.to_string())
                .or_insert_with(|| Value::Table(IndexMap::new()))
                .make_table(segment);
        }
        table.insert(last.to_string(), value);
    }
}

impl TryFrom<serde_json::Value> for Store {
    type Error = Error;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        let value = serde_yaml::to_value(value)
            .map_err(|e| Error::ConfigError(format!("Invalid parameters: {e}")))?;
        store_from_yaml(value)
    }
}

/// Merges `key=value` and `key.sub=value` overrides into the store, in order.
/// Strings without `=` are ignored.
pub fn apply_overrides<I, S>(store: &mut Store, overrides: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for raw in overrides {
        let raw = raw.as_ref();
        let Some((key, value)) = raw.split_once('=') else {
            debug!("Ignoring override without '=': {raw}");
            continue;
        };
        if key.is_empty() {
            debug!("Ignoring override with empty key: {raw}");
            continue;
        }
        store.set_path(key, Value::Scalar(value.to_string()));
    }
}

/// Returns the required dotted paths that do not resolve in `store`, in input order.
pub fn missing_keys<S: AsRef<str>>(store: &Store, required: &[S]) -> Vec<String> {
    required
        .iter()
        .map(AsRef::as_ref)
        .filter(|path| !store.contains_path(path))
        .map(str::to_string)
        .collect()
}

/// Fails with [`Error::MissingParameters`] naming every unresolved path.
pub fn ensure_complete<S: AsRef<str>>(store: &Store, required: &[S]) -> Result<()> {
    let keys = missing_keys(store, required);
    if keys.is_empty() {
        Ok(())
    } else {
        Err(Error::MissingParameters { keys })
    }
}

/// Loads a parameters file.
///
/// `.json`, `.yaml` and `.yml` files are read as a structured mapping; anything
/// else is read as line-oriented `key=value` pairs where blank lines and `#`
/// comments are skipped and the first occurrence of a key wins.
pub fn load_params_file<P: AsRef<Path>>(path: P) -> Result<Store> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::fs(path, e))?;
    debug!("Loading parameters from {}", path.display());

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json" | "yaml" | "yml") => parse_structured(&content),
        _ => parse_key_values(&content),
    }
}

/// Parses line-oriented `key=value` content.
pub fn parse_key_values(content: &str) -> Result<Store> {
    let mut store = Store::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (key, value) = line.split_once('=').ok_or_else(|| {
            Error::ConfigError(format!(
                "invalid parameter format on line {}: {line}. Expected key=value",
                index + 1
            ))
        })?;
        let key = key.trim();
        if store.is_declared(key) {
            debug!("Duplicate parameter '{key}' on line {} ignored", index + 1);
            continue;
        }
        store.set_path(key, Value::Scalar(value.trim().to_string()));
    }
    Ok(store)
}

/// Parses a JSON or YAML mapping.
pub fn parse_structured(content: &str) -> Result<Store> {
    let value: serde_yaml::Value = serde_yaml::from_str(content)
        .map_err(|e| Error::ConfigError(format!("Invalid parameters file: {e}")))?;
    store_from_yaml(value)
}

fn store_from_yaml(value: serde_yaml::Value) -> Result<Store> {
    match value {
        serde_yaml::Value::Null => Ok(Store::new()),
        serde_yaml::Value::Mapping(_) => match convert(value, "")? {
            Value::Table(table) => Ok(Store(table)),
            Value::Scalar(_) => Err(Error::ConfigError(
                "parameters must be a mapping".to_string(),
            )),
        },
        serde_yaml::Value::Tagged(tagged) => store_from_yaml(tagged.value),
        _ => Err(Error::ConfigError(
            "parameters must be a mapping".to_string(),
        )),
    }
}

fn convert(value: serde_yaml::Value, path: &str) -> Result<Value> {
    use serde_yaml::Value as Yaml;

    match value {
        Yaml::Null => Ok(Value::Scalar(String::new())),
        Yaml::Bool(b) => Ok(Value::Scalar(b.to_string())),
        Yaml::Number(n) => Ok(Value::Scalar(n.to_string())),
        Yaml::String(s) => Ok(Value::Scalar(s)),
        Yaml::Sequence(_) => Err(Error::ConfigError(format!(
            "parameter '{path}' is a sequence; only scalars and mappings are supported"
        ))),
        Yaml::Mapping(mapping) => {
            let mut table = IndexMap::new();
            for (key, value) in mapping {
                let key = normalize_key(key, path)?;
                let child = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                table.insert(key, convert(value, &child)?);
            }
            Ok(Value::Table(table))
        }
        Yaml::Tagged(tagged) => convert(tagged.value, path),
    }
}

// Mapping keys may be numbers or booleans in YAML; lookups are by string.
fn normalize_key(key: serde_yaml::Value, path: &str) -> Result<String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        other => Err(Error::ConfigError(format!(
            "unsupported key {other:?} under '{path}'"
        ))),
    }
}
