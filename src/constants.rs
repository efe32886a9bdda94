//! Common constants used throughout projgen.

/// Final extension that marks a file as a template
pub const DEFAULT_TEMPLATE_MARKER: &str = "tmpl";

/// Parameter key filled by the explicit project name flag
pub const NAME_KEY: &str = "name";

/// Output directory used when none is given
pub const DEFAULT_OUTPUT_DIR: &str = ".";
