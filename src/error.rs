//! Semantic error types for parameter resolution.
//!
//! Every failure the library can report is a variant of [`ConfigError`]. The
//! library never prints or exits; callers decide how to surface the error,
//! typically by converting it to an `eyre::Report` at the application boundary.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::parameter::ValueKind;

/// Errors that can occur while declaring, merging, or reading parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A textual value could not be converted to the parameter's type.
    #[error("invalid value '{value}' for parameter '{name}': expected {expected}")]
    Parse {
        /// The parameter name.
        name: String,
        /// The rejected text.
        value: String,
        /// The type the parameter holds.
        expected: ValueKind,
    },

    /// A parameter was read before any source gave it a value.
    #[error("parameter '{name}' used without initialization")]
    Usage {
        /// The parameter name.
        name: String,
    },

    /// A parameter name is not declared in the group.
    #[error("parameter {name} is not contained in group {group}")]
    ParameterNotFound {
        /// The group that was searched.
        group: String,
        /// The missing parameter name.
        name: String,
    },

    /// A group name is not registered in the store.
    #[error("group {name} is not registered")]
    GroupNotFound {
        /// The missing group name.
        name: String,
    },

    /// A typed lookup asked for a different type than the parameter holds.
    #[error("parameter '{name}' holds {actual}, not {requested}")]
    TypeMismatch {
        /// The parameter name.
        name: String,
        /// The type the caller asked for.
        requested: ValueKind,
        /// The type declared in the schema.
        actual: ValueKind,
    },

    /// A value was supplied through a source the parameter does not accept.
    #[error("parameter '{name}' cannot be set from the {source_name}")]
    Eligibility {
        /// The parameter name.
        name: String,
        /// The rejected source, e.g. `command line`.
        source_name: &'static str,
    },

    /// A parameter with the same name already exists in the group.
    #[error("parameter '{name}' is already declared in group {group}")]
    DuplicateParameter {
        /// The group receiving the parameter.
        group: String,
        /// The clashing parameter name.
        name: String,
    },

    /// A group with the same name is already registered.
    #[error("group '{name}' is already registered")]
    DuplicateGroup {
        /// The clashing group name.
        name: String,
    },

    /// No configuration file exists at the expected path, or at any of the
    /// candidate paths when probing.
    #[error("configuration file not found: {}", join_paths(.paths))]
    FileNotFound {
        /// Every path that was tried, in probing order.
        paths: Vec<Utf8PathBuf>,
    },

    /// The configuration file is not valid INI.
    #[error("parsing error in {file}:{line} - {message}")]
    FileSyntax {
        /// The file (or in-memory origin) being parsed.
        file: String,
        /// The 1-based line reported by the INI reader.
        line: usize,
        /// The reader's description of the problem.
        message: String,
    },

    /// The command line could not be parsed against the option schema.
    #[error("command line parsing error: {message}")]
    CommandLineSyntax {
        /// The parser's one-line description of the problem.
        message: String,
    },

    /// An I/O error occurred while reading or writing configuration.
    #[error("I/O error at '{path}': {source}")]
    Io {
        /// The path where the error occurred.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

fn join_paths(paths: &[Utf8PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A specialised `Result` type for parameter operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
