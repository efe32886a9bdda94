//! Command-line interface implementation for projgen.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

use crate::constants::{DEFAULT_OUTPUT_DIR, DEFAULT_TEMPLATE_MARKER};
use crate::error::Error;
use crate::GenerateOptions;

/// Command-line arguments structure for projgen.
#[derive(Parser, Debug)]
#[command(author, version, about = "projgen: project generator that renders project skeletons from templates", long_about = None)]
pub struct Args {
    /// Path to the template directory
    #[arg(long, global = true, value_name = "DIR")]
    pub template_dir: Option<PathBuf>,

    /// Type of project (e.g. maven, gradle, angular)
    #[arg(short = 't', long = "type", global = true, value_name = "TYPE")]
    pub project_type: Option<String>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a new project from a template
    Generate {
        /// Name of the project (can also be provided via --parameter name=value)
        #[arg(short, long)]
        name: Option<String>,

        /// Output directory
        #[arg(short, long = "out", default_value = DEFAULT_OUTPUT_DIR)]
        output_dir: PathBuf,

        /// Path to the parameters file
        #[arg(short = 'f', long = "file", value_name = "FILE")]
        params_file: Option<PathBuf>,

        /// Additional parameters in key=value format
        #[arg(short = 'p', long = "parameter", value_name = "KEY=VALUE", value_parser = parse_override)]
        parameters: Vec<String>,

        /// Final file extension that marks a template
        #[arg(long, default_value = DEFAULT_TEMPLATE_MARKER)]
        marker: String,
    },

    /// Inspect template parameters and requirements
    Inspect {
        /// Final file extension that marks a template
        #[arg(long, default_value = DEFAULT_TEMPLATE_MARKER)]
        marker: String,
    },

    /// Print the current version of projgen
    Version,
}

/// Validates a `key=value` override.
pub fn parse_override(raw: &str) -> Result<String, Error> {
    match raw.split_once('=') {
        Some((key, _)) if !key.is_empty() => Ok(raw.to_string()),
        _ => Err(Error::InvalidOverrideFormat(raw.to_string())),
    }
}

impl Args {
    /// Template directory and project type, required by `generate` and `inspect`.
    pub fn template_location(&self) -> Result<(PathBuf, String), Error> {
        match (&self.template_dir, &self.project_type) {
            (Some(dir), Some(project_type)) => Ok((dir.clone(), project_type.clone())),
            (None, _) => Err(Error::ConfigError("--template-dir is required".to_string())),
            (_, None) => Err(Error::ConfigError("--type is required".to_string())),
        }
    }

    /// Converts a `generate` invocation into [`GenerateOptions`].
    pub fn generate_options(&self) -> Result<Option<GenerateOptions>, Error> {
        let Command::Generate { name, output_dir, params_file, parameters, marker } = &self.command
        else {
            return Ok(None);
        };
        let (template_dir, project_type) = self.template_location()?;
        Ok(Some(GenerateOptions {
            template_dir,
            project_type,
            output_dir: output_dir.clone(),
            name: name.clone(),
            overrides: parameters.clone(),
            params_file: params_file.clone(),
            marker: marker.clone(),
        }))
    }
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 0 and the help text when no arguments are given
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    if std::env::args_os().len() < 2 {
        let _ = Args::command().print_help();
        std::process::exit(0);
    }
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingSubcommand {
                let _ = Args::command().print_help();
                std::process::exit(1);
            }
            e.exit();
        }
    }
}
