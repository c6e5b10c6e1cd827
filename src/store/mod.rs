//! The top-level parameter store and its merge protocol.
//!
//! A store owns every group, builds the command-line parser from their
//! schemas, and routes command-line flags and INI sections to them.
//!
//! # Merge order
//!
//! Every value remembers its source, and a source never overwrites a value
//! from a higher-priority one (command line > file > default). The usual
//! driver sequence is:
//!
//! 1. [`parse_command_line`](ParameterStore::parse_command_line), to learn for
//!    example which configuration file to load;
//! 2. [`parse_config_file`](ParameterStore::parse_config_file);
//! 3. optionally [`parse_command_line`](ParameterStore::parse_command_line)
//!    again with the same arguments, which changes nothing further.
//!
//! Parsing never advertises compiled-in defaults to `clap`. A parser default
//! would be indistinguishable from a supplied flag and would override a value
//! read from the file. Defaults are only shown in help output.

pub(crate) mod io;


use std::collections::HashSet;
use std::ffi::OsString;

use camino::{Utf8Path, Utf8PathBuf};
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use ini::Ini;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::group::{CommandLineValues, ParameterGroup};
use crate::parameter::{SchemaEntry, ValueKind};

/// Which flag spellings the command-line parser accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlagStyle {
    /// `--name` only.
    #[default]
    Bare,
    /// `--group.name` only.
    Qualified,
    /// Both spellings; the qualified one wins when both are given.
    Both,
}

impl FlagStyle {
    const fn bare(self) -> bool {
        matches!(self, Self::Bare | Self::Both)
    }

    const fn qualified(self) -> bool {
        matches!(self, Self::Qualified | Self::Both)
    }
}

/// Stable reference to a group registered in a [`ParameterStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupHandle(usize);

/// Owner of all parameter groups.
#[derive(Debug, Clone)]
pub struct ParameterStore {
    title: String,
    program: String,
    groups: Vec<ParameterGroup>,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new("Allowed options")
    }
}

impl ParameterStore {
    /// Creates an empty store; `title` heads the help output.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            program: String::from("program"),
            groups: Vec::new(),
        }
    }

    /// Sets the program name shown in help usage lines.
    #[must_use]
    pub fn with_program_name(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Registers `group`, consuming and returning the store.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateGroup`] if the name is taken.
    pub fn with_group(mut self, group: ParameterGroup) -> Result<Self> {
        self.add_group(group)?;
        Ok(self)
    }

    /// Registers `group` and returns a handle to it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateGroup`] if the name is taken.
    pub fn add_group(&mut self, group: ParameterGroup) -> Result<GroupHandle> {
        if self.groups.iter().any(|existing| existing.name() == group.name()) {
            return Err(ConfigError::DuplicateGroup {
                name: group.name().to_owned(),
            });
        }
        self.groups.push(group);
        Ok(GroupHandle(self.groups.len() - 1))
    }

    /// The help title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Groups in registration order.
    pub fn groups(&self) -> impl Iterator<Item = &ParameterGroup> {
        self.groups.iter()
    }

    /// Looks up a group by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::GroupNotFound`] for an unknown name.
    pub fn group(&self, name: &str) -> Result<&ParameterGroup> {
        self.groups
            .iter()
            .find(|group| group.name() == name)
            .ok_or_else(|| ConfigError::GroupNotFound {
                name: name.to_owned(),
            })
    }

    /// Looks up a group by name for modification.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::GroupNotFound`] for an unknown name.
    pub fn group_mut(&mut self, name: &str) -> Result<&mut ParameterGroup> {
        self.groups
            .iter_mut()
            .find(|group| group.name() == name)
            .ok_or_else(|| ConfigError::GroupNotFound {
                name: name.to_owned(),
            })
    }

    /// Returns the group behind `handle`, `None` for a foreign handle.
    #[must_use]
    pub fn by_handle(&self, handle: GroupHandle) -> Option<&ParameterGroup> {
        self.groups.get(handle.0)
    }

    /// Mutable variant of [`by_handle`](Self::by_handle).
    pub fn by_handle_mut(&mut self, handle: GroupHandle) -> Option<&mut ParameterGroup> {
        self.groups.get_mut(handle.0)
    }

    /// Builds the `clap` command for the current schema.
    ///
    /// Booleans are presence switches that also accept `--flag=value`. Other
    /// parameters take `--name=value` or `--name value`. `clap`'s own
    /// `--help` and `--version` are disabled so a declared `help` parameter
    /// can act as the trigger. A bare flag shared by several groups is
    /// registered once and feeds all of them.
    #[must_use]
    pub fn command(&self, style: FlagStyle, include_defaults: bool) -> Command {
        let mut command = Command::new(self.program.clone())
            .about(self.title.clone())
            .disable_help_flag(true)
            .disable_version_flag(true);
        let mut seen = HashSet::new();
        for group in &self.groups {
            let heading = if group.description().is_empty() {
                group.name().to_owned()
            } else {
                group.description().to_owned()
            };
            command = command.next_help_heading(heading);
            for entry in group_schema(group, style, include_defaults) {
                if seen.insert(entry.flag.clone()) {
                    command = command.arg(schema_arg(entry));
                }
            }
        }
        command
    }

    /// Parses `args` (including the program name) and applies the flags.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CommandLineSyntax`] for unknown flags or bad
    /// syntax, and propagates [`ConfigError::Eligibility`] and
    /// [`ConfigError::Parse`] from the parameters.
    pub fn parse_command_line<I, T>(&mut self, args: I, style: FlagStyle) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let command = self.command(style, false);
        let flags: Vec<String> = command
            .get_arguments()
            .map(|arg| arg.get_id().as_str().to_owned())
            .collect();
        let matches =
            command
                .try_get_matches_from(args)
                .map_err(|error| ConfigError::CommandLineSyntax {
                    message: clap_message(&error),
                })?;
        let values = supplied_values(&matches, &flags);
        debug!(flags = values.len(), "command line parsed");
        for group in &mut self.groups {
            group.ingest_command_line(&values)?;
        }
        Ok(())
    }

    /// Help text listing every command-line flag with its default.
    #[must_use]
    pub fn help_text(&self, style: FlagStyle) -> String {
        self.command(style, true).render_help().to_string()
    }

    /// Writes [`help_text`](Self::help_text) to `writer`.
    ///
    /// # Errors
    ///
    /// Propagates write failures from `writer`.
    pub fn write_help(&self, writer: &mut dyn std::io::Write, style: FlagStyle) -> std::io::Result<()> {
        writer.write_all(self.help_text(style).as_bytes())
    }

    /// Reads an INI file and applies its sections to the matching groups.
    ///
    /// A leading `~` is expanded to `$HOME`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileNotFound`], [`ConfigError::Io`], or any
    /// error from [`parse_config_str`](Self::parse_config_str).
    pub fn parse_config_file(&mut self, path: impl AsRef<Utf8Path>) -> Result<()> {
        self.parse_config_file_with_env(path.as_ref(), &mockable::DefaultEnv::new())
    }

    /// [`parse_config_file`](Self::parse_config_file) with an explicit
    /// environment for `~` expansion.
    ///
    /// # Errors
    ///
    /// As for [`parse_config_file`](Self::parse_config_file).
    pub fn parse_config_file_with_env<E: mockable::Env>(
        &mut self,
        path: &Utf8Path,
        env: &E,
    ) -> Result<()> {
        let resolved = crate::paths::expand_tilde(path, env);
        let content = io::read_file(&resolved)?;
        self.parse_config_str(&content, resolved.as_str())
    }

    /// Reads the first existing file among `candidates`, each with `suffix`
    /// appended, and returns its path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileNotFound`] listing every path tried if no
    /// candidate exists, otherwise as for
    /// [`parse_config_file`](Self::parse_config_file).
    pub fn parse_first_config_file(
        &mut self,
        candidates: &[&str],
        suffix: &str,
    ) -> Result<Utf8PathBuf> {
        self.parse_first_config_file_with_env(candidates, suffix, &mockable::DefaultEnv::new())
    }

    /// [`parse_first_config_file`](Self::parse_first_config_file) with an
    /// explicit environment for `~` expansion.
    ///
    /// # Errors
    ///
    /// As for [`parse_first_config_file`](Self::parse_first_config_file).
    pub fn parse_first_config_file_with_env<E: mockable::Env>(
        &mut self,
        candidates: &[&str],
        suffix: &str,
        env: &E,
    ) -> Result<Utf8PathBuf> {
        let paths = crate::paths::candidate_paths(candidates, suffix, env);
        let Some(found) = crate::paths::first_existing(&paths).map(Utf8Path::to_path_buf) else {
            return Err(ConfigError::FileNotFound { paths });
        };
        let content = io::read_file(&found)?;
        self.parse_config_str(&content, found.as_str())?;
        Ok(found)
    }

    /// Parses INI text and applies its sections to the matching groups.
    ///
    /// `origin` names the text in syntax errors, usually a file path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileSyntax`], or a parameter's
    /// [`ConfigError::Parse`] or [`ConfigError::Eligibility`]. Groups before
    /// the failing one keep the values already applied.
    pub fn parse_config_str(&mut self, content: &str, origin: &str) -> Result<()> {
        let document = io::parse_ini(content, origin)?;
        debug!(%origin, "configuration parsed");
        self.ingest_document(&document)
    }

    /// Writes every group as an INI section.
    ///
    /// # Errors
    ///
    /// Propagates write failures from `writer`.
    pub fn write_config(&self, writer: &mut dyn std::io::Write) -> std::io::Result<()> {
        for group in &self.groups {
            group.write_section(writer)?;
        }
        Ok(())
    }

    /// Writes [`write_config`](Self::write_config) output to `path`.
    ///
    /// A leading `~` is expanded to `$HOME`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be written.
    pub fn write_config_file(&self, path: impl AsRef<Utf8Path>) -> Result<()> {
        self.write_config_file_with_env(path.as_ref(), &mockable::DefaultEnv::new())
    }

    /// [`write_config_file`](Self::write_config_file) with an explicit
    /// environment for `~` expansion.
    ///
    /// # Errors
    ///
    /// As for [`write_config_file`](Self::write_config_file).
    pub fn write_config_file_with_env<E: mockable::Env>(
        &self,
        path: &Utf8Path,
        env: &E,
    ) -> Result<()> {
        let resolved = crate::paths::expand_tilde(path, env);
        let mut buffer = Vec::new();
        self.write_config(&mut buffer)
            .map_err(|source| ConfigError::Io {
                path: resolved.clone(),
                source,
            })?;
        io::write_file(&resolved, &buffer)
    }

    fn ingest_document(&mut self, document: &Ini) -> Result<()> {
        for group in &mut self.groups {
            if !group.ingest_file(document)? {
                debug!(group = group.name(), "group has uninitialized parameters");
            }
        }
        Ok(())
    }
}

fn group_schema(group: &ParameterGroup, style: FlagStyle, include_defaults: bool) -> Vec<SchemaEntry> {
    let mut entries = Vec::new();
    if style.bare() {
        entries.extend(group.option_schema(false, include_defaults));
        entries.extend(group.guarded_flags(false));
    }
    if style.qualified() {
        entries.extend(group.option_schema(true, include_defaults));
        entries.extend(group.guarded_flags(true));
    }
    entries
}

fn schema_arg(entry: SchemaEntry) -> Arg {
    let base = Arg::new(entry.flag.clone())
        .long(entry.flag)
        .help(entry.description)
        .hide(entry.hidden)
        .action(ArgAction::Set)
        .value_parser(value_parser!(String));
    let shaped = match entry.kind {
        ValueKind::Bool => base
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true")
            .value_name("BOOL"),
        ValueKind::Integer => base.allow_negative_numbers(true).value_name("INT"),
        ValueKind::Float => base.allow_negative_numbers(true).value_name("NUMBER"),
        ValueKind::Text => base.value_name("TEXT"),
    };
    shaped.default_values(entry.default)
}

fn supplied_values(matches: &ArgMatches, flags: &[String]) -> CommandLineValues {
    flags
        .iter()
        .filter(|flag| matches.value_source(flag) == Some(ValueSource::CommandLine))
        .filter_map(|flag| {
            matches
                .try_get_one::<String>(flag)
                .ok()
                .flatten()
                .map(|raw| (flag.clone(), raw.clone()))
        })
        .collect()
}

/// First line of a `clap` error without the `error: ` prefix.
fn clap_message(error: &clap::Error) -> String {
    let rendered = error.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).to_owned()
}
