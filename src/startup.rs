//! Ready-made startup sequence for programs built on a [`ParameterStore`].
//!
//! [`add_general_options`] registers a `General` group with the usual
//! command-line-only switches, and [`read_configuration`] runs the canonical
//! merge sequence around them: parse the command line, stop for `--help`,
//! load the configuration file, re-apply the command line, and save the
//! result when asked.

use std::ffi::OsString;

use camino::Utf8Path;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::group::ParameterGroup;
use crate::parameter::{Eligibility, Parameter};
use crate::store::{FlagStyle, GroupHandle, ParameterStore};

/// Name of the group created by [`add_general_options`].
pub const GENERAL_GROUP: &str = "General";
/// Flag naming an INI file to load.
pub const LOAD_INI: &str = "load-ini";
/// Flag naming an INI file to write after merging.
pub const SAVE_INI: &str = "save-ini";
/// Flag requesting help output.
pub const HELP: &str = "help";

/// What the program should do after [`read_configuration`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Startup {
    /// Configuration is resolved; carry on.
    Run,
    /// `--help` was given; show the text and stop.
    Help(String),
}

/// Registers the `General` group holding `--load-ini`, `--save-ini`, and
/// `--help`, all command-line only.
///
/// # Errors
///
/// Returns [`ConfigError::DuplicateGroup`] if the store already has a
/// `General` group.
pub fn add_general_options(store: &mut ParameterStore) -> Result<GroupHandle> {
    let group = ParameterGroup::new(GENERAL_GROUP)
        .with_description("General program options")
        .with(
            Parameter::<String>::new(LOAD_INI, "Load settings from ini file")
                .with_eligibility(Eligibility::CommandLineOnly),
        )?
        .with(
            Parameter::<String>::new(SAVE_INI, "Save settings to ini file")
                .with_eligibility(Eligibility::CommandLineOnly),
        )?
        .with(
            Parameter::<bool>::new(HELP, "Print help")
                .with_eligibility(Eligibility::CommandLineOnly),
        )?;
    store.add_group(group)
}

/// Runs the canonical merge sequence with the process environment.
///
/// # Errors
///
/// As for [`read_configuration_with_env`].
pub fn read_configuration<I, T>(
    store: &mut ParameterStore,
    candidates: &[&str],
    args: I,
) -> Result<Startup>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    read_configuration_with_env(store, candidates, args, &mockable::DefaultEnv::new())
}

/// Runs the canonical merge sequence.
///
/// The file named by `--load-ini` is read when given; otherwise the first
/// existing entry of `candidates` is, and finding none is not an error. The
/// store must contain the group from [`add_general_options`].
///
/// # Errors
///
/// Returns [`ConfigError::GroupNotFound`] without the `General` group, and
/// propagates any command-line, file, or write failure.
pub fn read_configuration_with_env<I, T, E>(
    store: &mut ParameterStore,
    candidates: &[&str],
    args: I,
    env: &E,
) -> Result<Startup>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
    E: mockable::Env,
{
    let arguments: Vec<OsString> = args.into_iter().map(Into::into).collect();
    store.parse_command_line(arguments.iter().cloned(), FlagStyle::Bare)?;

    let general = store.group(GENERAL_GROUP)?;
    if general.get::<bool>(HELP)? {
        return Ok(Startup::Help(store.help_text(FlagStyle::Bare)));
    }

    match explicit_path(store, LOAD_INI)? {
        Some(path) => store.parse_config_file_with_env(Utf8Path::new(&path), env)?,
        None => match store.parse_first_config_file_with_env(candidates, "", env) {
            Ok(found) => {
                debug!(path = %found, "loaded configuration file");
            }
            Err(ConfigError::FileNotFound { paths }) => {
                debug!(?paths, "no configuration file found");
            }
            Err(error) => return Err(error),
        },
    }

    store.parse_command_line(arguments, FlagStyle::Bare)?;

    if let Some(path) = explicit_path(store, SAVE_INI)? {
        store.write_config_file_with_env(Utf8Path::new(&path), env)?;
        debug!(%path, "configuration saved");
    }
    Ok(Startup::Run)
}

fn explicit_path(store: &ParameterStore, name: &str) -> Result<Option<String>> {
    let general = store.group(GENERAL_GROUP)?;
    if general.initialized(name)? {
        general.get::<String>(name).map(Some)
    } else {
        Ok(None)
    }
}
