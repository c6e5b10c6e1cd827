//! Named collections of heterogeneous parameters.
//!
//! A group maps onto one `[section]` of an INI file and, when qualified flags
//! are requested, onto the `--group.name` prefix on the command line.


use std::collections::HashMap;
use std::io::{self, Write};

use ini::Ini;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::parameter::{AnyParameter, Eligibility, ParamValue, Parameter, SchemaEntry, flag_name};

/// Raw flag values taken from one command-line parse, keyed by flag name.
///
/// Boolean switches given without a value are stored as `"true"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLineValues {
    values: HashMap<String, String>,
}

impl CommandLineValues {
    /// Creates an empty set of values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the raw text supplied for `flag`.
    pub fn insert(&mut self, flag: impl Into<String>, raw: impl Into<String>) {
        self.values.insert(flag.into(), raw.into());
    }

    /// Returns the raw text supplied for `flag`.
    #[must_use]
    pub fn get(&self, flag: &str) -> Option<&str> {
        self.values.get(flag).map(String::as_str)
    }

    /// Number of flags present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no flags were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CommandLineValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(flag, raw)| (flag.into(), raw.into()))
                .collect(),
        }
    }
}

/// A named, insertion-ordered set of parameters.
#[derive(Debug, Clone)]
pub struct ParameterGroup {
    name: String,
    description: String,
    parameters: Vec<Box<dyn AnyParameter>>,
}

impl ParameterGroup {
    /// Creates an empty group.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            parameters: Vec::new(),
        }
    }

    /// Sets the description written as a comment above the INI section.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Adds `parameter`, consuming and returning the group.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateParameter`] if the name is taken.
    pub fn with<T: ParamValue>(mut self, parameter: Parameter<T>) -> Result<Self> {
        self.add(parameter)?;
        Ok(self)
    }

    /// Adds `parameter` to the group.
    ///
    /// Names are unique within a group; a second parameter with the same name
    /// is rejected rather than replacing the first.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateParameter`] if the name is taken.
    pub fn add<T: ParamValue>(&mut self, parameter: Parameter<T>) -> Result<&mut Self> {
        self.add_boxed(Box::new(parameter))
    }

    /// Adds an already type-erased parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateParameter`] if the name is taken.
    pub fn add_boxed(&mut self, parameter: Box<dyn AnyParameter>) -> Result<&mut Self> {
        if self.position(parameter.name()).is_some() {
            return Err(ConfigError::DuplicateParameter {
                group: self.name.clone(),
                name: parameter.name().to_owned(),
            });
        }
        self.parameters.push(parameter);
        Ok(self)
    }

    /// The group name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The group description, empty when none was given.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Parameters in insertion order.
    pub fn parameters(&self) -> impl Iterator<Item = &dyn AnyParameter> {
        self.parameters.iter().map(AsRef::as_ref)
    }

    /// Looks up a parameter by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParameterNotFound`] if the name is not declared.
    pub fn lookup(&self, name: &str) -> Result<&dyn AnyParameter> {
        self.parameters
            .iter()
            .find(|parameter| parameter.name() == name)
            .map(AsRef::as_ref)
            .ok_or_else(|| self.not_found(name))
    }

    /// Looks up a parameter by name for modification.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParameterNotFound`] if the name is not declared.
    pub fn lookup_mut(&mut self, name: &str) -> Result<&mut dyn AnyParameter> {
        let group = &self.name;
        self.parameters
            .iter_mut()
            .find(|parameter| parameter.name() == name)
            .map(|parameter| {
                let erased: &mut dyn AnyParameter = parameter.as_mut();
                erased
            })
            .ok_or_else(|| ConfigError::ParameterNotFound {
                group: group.clone(),
                name: name.to_owned(),
            })
    }

    /// Looks up a parameter and checks that it holds `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParameterNotFound`] for an unknown name or
    /// [`ConfigError::TypeMismatch`] if the parameter holds another type.
    pub fn parameter<T: ParamValue>(&self, name: &str) -> Result<&Parameter<T>> {
        let parameter = self.lookup(name)?;
        let actual = parameter.kind();
        parameter
            .as_any()
            .downcast_ref::<Parameter<T>>()
            .ok_or_else(|| ConfigError::TypeMismatch {
                name: name.to_owned(),
                requested: T::KIND,
                actual,
            })
    }

    /// Mutable variant of [`parameter`](Self::parameter).
    ///
    /// # Errors
    ///
    /// As for [`parameter`](Self::parameter).
    pub fn parameter_mut<T: ParamValue>(&mut self, name: &str) -> Result<&mut Parameter<T>> {
        let parameter = self.lookup_mut(name)?;
        let actual = parameter.kind();
        parameter
            .as_any_mut()
            .downcast_mut::<Parameter<T>>()
            .ok_or_else(|| ConfigError::TypeMismatch {
                name: name.to_owned(),
                requested: T::KIND,
                actual,
            })
    }

    /// Returns the resolved value of parameter `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParameterNotFound`], [`ConfigError::TypeMismatch`]
    /// or [`ConfigError::Usage`] when the parameter is unknown, holds another
    /// type, or has no value yet.
    pub fn get<T: ParamValue>(&self, name: &str) -> Result<T> {
        self.parameter::<T>(name)?.get().cloned()
    }

    /// Assigns a value from program code, see [`Parameter::set`].
    ///
    /// # Errors
    ///
    /// As for [`parameter`](Self::parameter).
    pub fn set<T: ParamValue>(&mut self, name: &str, value: impl Into<T>) -> Result<()> {
        self.parameter_mut::<T>(name)?.set(value);
        Ok(())
    }

    /// Whether parameter `name` holds a value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParameterNotFound`] for an unknown name.
    pub fn initialized(&self, name: &str) -> Result<bool> {
        Ok(self.lookup(name)?.initialized())
    }

    /// Whether parameter `name` was set from a file or the command line.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParameterNotFound`] for an unknown name.
    pub fn set_by_user(&self, name: &str) -> Result<bool> {
        Ok(self.lookup(name)?.set_by_user())
    }

    /// Whether every parameter holds a value.
    #[must_use]
    pub fn all_initialized(&self) -> bool {
        self.parameters.iter().all(|parameter| parameter.initialized())
    }

    /// Applies flags from one command-line parse.
    ///
    /// Each parameter takes `group.name` when present and falls back to the
    /// bare `name`. Returns whether every parameter is initialized afterwards.
    ///
    /// # Errors
    ///
    /// Propagates [`ConfigError::Eligibility`] and [`ConfigError::Parse`]
    /// from the parameters.
    pub fn ingest_command_line(&mut self, values: &CommandLineValues) -> Result<bool> {
        for parameter in &mut self.parameters {
            let qualified = flag_name(Some(self.name.as_str()), parameter.name());
            let supplied = values
                .get(&qualified)
                .or_else(|| values.get(parameter.name()));
            if let Some(raw) = supplied {
                parameter.set_from_command_line(raw)?;
            }
        }
        Ok(self.all_initialized())
    }

    /// Applies the section named after this group in `document`.
    ///
    /// Without a matching section nothing changes. Returns whether every
    /// parameter is initialized afterwards.
    ///
    /// # Errors
    ///
    /// Propagates [`ConfigError::Eligibility`] and [`ConfigError::Parse`]
    /// from the parameters, stopping at the first failure.
    pub fn ingest_file(&mut self, document: &Ini) -> Result<bool> {
        let Some(section) = document.section(Some(self.name.as_str())) else {
            debug!(group = %self.name, "no matching section");
            return Ok(self.all_initialized());
        };
        let mut all_initialized = true;
        for parameter in &mut self.parameters {
            all_initialized &= parameter.set_from_file_section(section)?;
        }
        Ok(all_initialized)
    }

    /// Flags this group contributes to the command-line parser.
    ///
    /// With `qualified`, every flag is prefixed by the group name. With
    /// `include_defaults`, compiled-in defaults are advertised; only help
    /// output should ask for that, since a parser default would look like a
    /// supplied value and override the configuration file.
    #[must_use]
    pub fn option_schema(&self, qualified: bool, include_defaults: bool) -> Vec<SchemaEntry> {
        let qualifier = qualified.then_some(self.name.as_str());
        self.parameters
            .iter()
            .filter_map(|parameter| parameter.describe_for_schema(qualifier, include_defaults))
            .collect()
    }

    /// Hidden flags for file-only parameters.
    ///
    /// The parser accepts them so that supplying one is reported as an
    /// eligibility error instead of an unknown flag.
    #[must_use]
    pub fn guarded_flags(&self, qualified: bool) -> Vec<SchemaEntry> {
        let qualifier = qualified.then_some(self.name.as_str());
        self.parameters
            .iter()
            .filter(|parameter| parameter.eligibility() == Eligibility::FileOnly)
            .map(|parameter| SchemaEntry {
                flag: flag_name(qualifier, parameter.name()),
                parameter: parameter.name().to_owned(),
                description: parameter.description().to_owned(),
                kind: parameter.kind(),
                default: None,
                hidden: true,
            })
            .collect()
    }

    /// Writes the group as an INI section.
    ///
    /// # Errors
    ///
    /// Propagates write failures from `writer`.
    pub fn write_section(&self, writer: &mut dyn Write) -> io::Result<()> {
        for line in self.description.lines() {
            writeln!(writer, "# {line}")?;
        }
        writeln!(writer)?;
        writeln!(writer, "[{}]", self.name)?;
        for parameter in &self.parameters {
            parameter.write_config_line(writer)?;
        }
        Ok(())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.parameters
            .iter()
            .position(|parameter| parameter.name() == name)
    }

    fn not_found(&self, name: &str) -> ConfigError {
        ConfigError::ParameterNotFound {
            group: self.name.clone(),
            name: name.to_owned(),
        }
    }
}
