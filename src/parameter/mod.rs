//! Typed parameters and the capability trait that lets groups store them
//! side by side.
//!
//! A [`Parameter<T>`] records where its current value came from as a
//! [`Provenance`]. Sources are ranked `Default < File < CommandLine`, and a
//! source only replaces a value whose provenance does not outrank it. This is
//! what keeps a command-line value in place when a configuration file is read
//! afterwards.

mod value;


use std::any::Any;
use std::fmt;
use std::io::{self, Write};

use ini::Properties;
use tracing::{debug, trace};

use crate::error::{ConfigError, Result};

pub use value::{ParamValue, ValueKind};

/// Sources a parameter accepts values from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Eligibility {
    /// Only the configuration file may set the value.
    FileOnly,
    /// Only the command line may set the value.
    CommandLineOnly,
    /// Both sources may set the value.
    #[default]
    Both,
}

impl Eligibility {
    /// Returns whether command-line flags may set the value.
    #[must_use]
    pub const fn allows_command_line(self) -> bool {
        matches!(self, Self::CommandLineOnly | Self::Both)
    }

    /// Returns whether configuration files may set the value.
    #[must_use]
    pub const fn allows_file(self) -> bool {
        matches!(self, Self::FileOnly | Self::Both)
    }
}

/// Where a parameter's current value came from, lowest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Provenance {
    /// Compiled-in default or programmatic assignment.
    Default,
    /// A configuration file section.
    File,
    /// A command-line flag.
    CommandLine,
}

impl Provenance {
    /// Human-readable source name used in diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::File => "configuration file",
            Self::CommandLine => "command line",
        }
    }
}

/// One flag in the command-line option schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaEntry {
    /// Flag name without leading dashes, possibly `group.name`.
    pub flag: String,
    /// The parameter the flag feeds.
    pub parameter: String,
    /// Help text.
    pub description: String,
    /// Type of the parameter; booleans become presence switches.
    pub kind: ValueKind,
    /// Default advertised to the parser, if any.
    pub default: Option<String>,
    /// Hidden flags are accepted but omitted from help.
    pub hidden: bool,
}

/// Builds the flag name for `name`, prefixed with `qualifier.` when given.
#[must_use]
pub fn flag_name(qualifier: Option<&str>, name: &str) -> String {
    qualifier.map_or_else(|| name.to_owned(), |group| format!("{group}.{name}"))
}

/// A single named, typed configuration value.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter<T: ParamValue> {
    name: String,
    description: String,
    value: Option<T>,
    default: Option<T>,
    eligibility: Eligibility,
    provenance: Option<Provenance>,
}

impl<T: ParamValue> Parameter<T> {
    /// Declares a parameter without a default.
    ///
    /// The parameter is uninitialized until a source supplies a value, except
    /// for `bool`, which starts as `false`.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let implicit = T::implicit_default();
        Self {
            name: name.into(),
            description: description.into(),
            provenance: implicit.as_ref().map(|_| Provenance::Default),
            value: implicit.clone(),
            default: implicit,
            eligibility: Eligibility::Both,
        }
    }

    /// Declares a parameter with a compiled-in default.
    #[must_use]
    pub fn with_default(
        name: impl Into<String>,
        description: impl Into<String>,
        default: impl Into<T>,
    ) -> Self {
        let initial = default.into();
        Self {
            name: name.into(),
            description: description.into(),
            value: Some(initial.clone()),
            default: Some(initial),
            eligibility: Eligibility::Both,
            provenance: Some(Provenance::Default),
        }
    }

    /// Restricts the sources this parameter accepts.
    #[must_use]
    pub const fn with_eligibility(mut self, eligibility: Eligibility) -> Self {
        self.eligibility = eligibility;
        self
    }

    /// The parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Sources this parameter accepts.
    #[must_use]
    pub const fn eligibility(&self) -> Eligibility {
        self.eligibility
    }

    /// Where the current value came from, `None` when uninitialized.
    #[must_use]
    pub const fn provenance(&self) -> Option<Provenance> {
        self.provenance
    }

    /// Whether the parameter holds a value from any source.
    #[must_use]
    pub const fn initialized(&self) -> bool {
        self.provenance.is_some()
    }

    /// Whether the value came from a file or the command line.
    #[must_use]
    pub fn set_by_user(&self) -> bool {
        self.provenance >= Some(Provenance::File)
    }

    /// The compiled-in default, if one was declared.
    #[must_use]
    pub const fn default_value(&self) -> Option<&T> {
        self.default.as_ref()
    }

    /// Returns the resolved value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Usage`] if no source has supplied a value.
    pub fn get(&self) -> Result<&T> {
        self.value.as_ref().ok_or_else(|| ConfigError::Usage {
            name: self.name.clone(),
        })
    }

    /// Assigns a value from program code.
    ///
    /// The assignment counts as a default: it is not "set by user" and any
    /// later file or command-line value replaces it.
    pub fn set(&mut self, value: impl Into<T>) {
        self.value = Some(value.into());
        self.provenance = Some(Provenance::Default);
    }

    /// Applies the raw text of a command-line flag.
    ///
    /// Returns whether the parameter is initialized afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Eligibility`] if the parameter is file-only, or
    /// [`ConfigError::Parse`] if the text does not convert to `T`.
    pub fn set_from_command_line(&mut self, raw: &str) -> Result<bool> {
        if !self.eligibility.allows_command_line() {
            return Err(ConfigError::Eligibility {
                name: self.name.clone(),
                source_name: Provenance::CommandLine.label(),
            });
        }
        let value = T::parse_flag(raw).ok_or_else(|| self.parse_error(raw))?;
        self.apply(value, Provenance::CommandLine);
        Ok(self.initialized())
    }

    /// Applies the value stored under this parameter's name in `section`.
    ///
    /// An absent key leaves the parameter unchanged. Returns whether the
    /// parameter is initialized afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Eligibility`] if the section holds a value for a
    /// command-line-only parameter, or [`ConfigError::Parse`] if the stored
    /// text does not convert to `T`.
    pub fn set_from_file_section(&mut self, section: &Properties) -> Result<bool> {
        let Some(raw) = section.get(&self.name) else {
            return Ok(self.initialized());
        };
        if !self.eligibility.allows_file() {
            return Err(ConfigError::Eligibility {
                name: self.name.clone(),
                source_name: Provenance::File.label(),
            });
        }
        let value = T::parse_text(raw).ok_or_else(|| self.parse_error(raw))?;
        self.apply(value, Provenance::File);
        Ok(self.initialized())
    }

    /// Describes the command-line flag for this parameter.
    ///
    /// Returns `None` for file-only parameters. Booleans never advertise a
    /// default because they are presence switches.
    #[must_use]
    pub fn describe_for_schema(
        &self,
        qualifier: Option<&str>,
        include_defaults: bool,
    ) -> Option<SchemaEntry> {
        if !self.eligibility.allows_command_line() {
            return None;
        }
        let default = self
            .default
            .as_ref()
            .filter(|_| include_defaults && T::KIND != ValueKind::Bool)
            .map(ParamValue::to_text);
        Some(SchemaEntry {
            flag: flag_name(qualifier, &self.name),
            parameter: self.name.clone(),
            description: self.description.clone(),
            kind: T::KIND,
            default,
            hidden: false,
        })
    }

    /// Writes the INI lines for this parameter.
    ///
    /// An uninitialized parameter is written as a commented placeholder so
    /// that reading the file back leaves it uninitialized.
    ///
    /// # Errors
    ///
    /// Propagates write failures from `writer`.
    pub fn write_config_line(&self, writer: &mut dyn Write) -> io::Result<()> {
        if !self.eligibility.allows_file() {
            return Ok(());
        }
        writeln!(writer, "# {}", self.description)?;
        match self.value.as_ref() {
            None => writeln!(writer, "# {} = <unset>", self.name),
            Some(value) => writeln!(writer, "{} = {}", self.name, value.to_file_text()),
        }
    }

    fn apply(&mut self, value: T, source: Provenance) {
        if self.provenance.is_some_and(|current| current > source) {
            trace!(
                parameter = %self.name,
                source = source.label(),
                "keeping higher-priority value"
            );
            return;
        }
        debug!(parameter = %self.name, source = source.label(), "value applied");
        self.value = Some(value);
        self.provenance = Some(source);
    }

    fn parse_error(&self, raw: &str) -> ConfigError {
        ConfigError::Parse {
            name: self.name.clone(),
            value: raw.to_owned(),
            expected: T::KIND,
        }
    }
}

/// The type-erased view of a [`Parameter<T>`] that groups store.
pub trait AnyParameter: fmt::Debug {
    /// The parameter name.
    fn name(&self) -> &str;
    /// The human-readable description.
    fn description(&self) -> &str;
    /// The type tag of the stored value.
    fn kind(&self) -> ValueKind;
    /// Sources this parameter accepts.
    fn eligibility(&self) -> Eligibility;
    /// Where the current value came from.
    fn provenance(&self) -> Option<Provenance>;
    /// Whether the parameter holds a value.
    fn initialized(&self) -> bool;
    /// Whether the value came from a file or the command line.
    fn set_by_user(&self) -> bool;
    /// Canonical text of the current value.
    fn value_text(&self) -> Option<String>;
    /// See [`Parameter::set_from_command_line`].
    ///
    /// # Errors
    ///
    /// As for [`Parameter::set_from_command_line`].
    fn set_from_command_line(&mut self, raw: &str) -> Result<bool>;
    /// See [`Parameter::set_from_file_section`].
    ///
    /// # Errors
    ///
    /// As for [`Parameter::set_from_file_section`].
    fn set_from_file_section(&mut self, section: &Properties) -> Result<bool>;
    /// See [`Parameter::describe_for_schema`].
    fn describe_for_schema(
        &self,
        qualifier: Option<&str>,
        include_defaults: bool,
    ) -> Option<SchemaEntry>;
    /// See [`Parameter::write_config_line`].
    ///
    /// # Errors
    ///
    /// Propagates write failures from `writer`.
    fn write_config_line(&self, writer: &mut dyn Write) -> io::Result<()>;
    /// Deep copy behind a fresh box.
    fn clone_boxed(&self) -> Box<dyn AnyParameter>;
    /// Access to the concrete type for typed lookups.
    fn as_any(&self) -> &dyn Any;
    /// Mutable access to the concrete type for typed assignment.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: ParamValue> AnyParameter for Parameter<T> {
    fn name(&self) -> &str {
        Self::name(self)
    }

    fn description(&self) -> &str {
        Self::description(self)
    }

    fn kind(&self) -> ValueKind {
        T::KIND
    }

    fn eligibility(&self) -> Eligibility {
        Self::eligibility(self)
    }

    fn provenance(&self) -> Option<Provenance> {
        Self::provenance(self)
    }

    fn initialized(&self) -> bool {
        Self::initialized(self)
    }

    fn set_by_user(&self) -> bool {
        Self::set_by_user(self)
    }

    fn value_text(&self) -> Option<String> {
        self.value.as_ref().map(ParamValue::to_text)
    }

    fn set_from_command_line(&mut self, raw: &str) -> Result<bool> {
        Self::set_from_command_line(self, raw)
    }

    fn set_from_file_section(&mut self, section: &Properties) -> Result<bool> {
        Self::set_from_file_section(self, section)
    }

    fn describe_for_schema(
        &self,
        qualifier: Option<&str>,
        include_defaults: bool,
    ) -> Option<SchemaEntry> {
        Self::describe_for_schema(self, qualifier, include_defaults)
    }

    fn write_config_line(&self, writer: &mut dyn Write) -> io::Result<()> {
        Self::write_config_line(self, writer)
    }

    fn clone_boxed(&self) -> Box<dyn AnyParameter> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Clone for Box<dyn AnyParameter> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}
