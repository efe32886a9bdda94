//! Error handling for projgen.
//! Defines the error taxonomy and result alias used throughout the crate.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while assembling parameters, discovering placeholders,
/// or generating a project.
#[derive(Error, Debug)]
pub enum Error {
    /// An override passed on the command line is not of the form `key=value`.
    #[error("Invalid parameter format: '{0}'. Expected key=value")]
    InvalidOverrideFormat(String),

    /// One or more placeholders discovered in the templates have no value.
    #[error("Missing parameters: {}", keys.join(", "))]
    MissingParameters { keys: Vec<String> },

    /// A template file could not be parsed.
    #[error("Failed to parse template '{}': {message}", path.display())]
    TemplateParseError { path: PathBuf, message: String },

    /// A template parsed but failed while being evaluated.
    #[error("Failed to render template '{}': {message}", path.display())]
    TemplateExecutionError { path: PathBuf, message: String },

    /// Read, write or mkdir failure on a specific path.
    #[error("Filesystem error at '{}': {source}", path.display())]
    FilesystemError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Represents errors in the parameters file or in the parameter structure
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The template directory for the requested project type does not exist.
    #[error("Template directory not found: '{}'", path.display())]
    TemplateNotFound { path: PathBuf },
}

impl Error {
    /// Wraps an IO error together with the path it occurred on.
    pub fn fs<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Error::FilesystemError { path: path.into(), source }
    }
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
