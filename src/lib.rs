//! Typed configuration parameters merged from the command line and INI files.
//!
//! `paramstore` lets a program declare named, typed parameters, gather them
//! into groups, and resolve each value from three sources in a fixed priority
//! order: command-line flags, then a configuration file section, then the
//! compiled-in default.
//!
//! # Model
//!
//! - A [`Parameter<T>`] holds a `bool`, `i64`, `f64`, or `String` along with
//!   a description, an optional default, the sources it accepts, and the
//!   source of its current value.
//! - A [`ParameterGroup`] owns an ordered set of parameters and maps to one
//!   `[section]` of the INI file.
//! - A [`ParameterStore`] owns the groups, builds the `clap` command line
//!   from their schemas, and writes help text and configuration files.
//!
//! # Modules
//!
//! - [`error`]: Semantic error type for every fallible operation
//! - [`group`]: Parameter groups and typed lookup
//! - [`parameter`]: Typed parameters and source eligibility
//! - [`paths`]: Configuration file discovery and `~` expansion
//! - [`startup`]: Standard `General` options and the canonical merge sequence
//! - [`store`]: The store and its merge protocol

pub mod error;
pub mod group;
pub mod parameter;
pub mod paths;
pub mod startup;
pub mod store;

pub use error::{ConfigError, Result};
pub use group::{CommandLineValues, ParameterGroup};
pub use parameter::{AnyParameter, Eligibility, ParamValue, Parameter, Provenance, ValueKind};
pub use store::{FlagStyle, GroupHandle, ParameterStore};
