//! Given/when step definitions for parameter-merge behavioural scenarios.

use paramstore::{FlagStyle, ParameterStore};
use rstest_bdd_macros::{given, when};

use super::state::{FileEntry, MergeState, StepResult, demo_store, render_file};

fn store(merge_state: &MergeState) -> StepResult<ParameterStore> {
    merge_state
        .store
        .get()
        .ok_or_else(|| String::from("parameter store should be set"))
}

/// Runs `operation` on the stored store, keeping the result and any error.
fn update_store(
    merge_state: &MergeState,
    operation: impl FnOnce(&mut ParameterStore) -> paramstore::Result<()>,
) -> StepResult<()> {
    let mut current = store(merge_state)?;
    if let Err(error) = operation(&mut current) {
        merge_state.error.set(error.to_string());
    }
    merge_state.store.set(current);
    Ok(())
}

#[given("the demo parameter store")]
fn the_demo_parameter_store(merge_state: &MergeState) -> StepResult<()> {
    merge_state.store.set(demo_store()?);
    Ok(())
}

#[given("the command-line flag {flag} with value {value}")]
fn the_command_line_flag_with_value(merge_state: &MergeState, flag: String, value: String) {
    let mut args = merge_state.args.get().unwrap_or_default();
    args.push(format!("--{flag}={value}"));
    merge_state.args.set(args);
}

#[given("a configuration file setting {key} in {group} to {value}")]
fn a_configuration_file_setting(
    merge_state: &MergeState,
    key: String,
    group: String,
    value: String,
) {
    let mut entries = merge_state.file_entries.get().unwrap_or_default();
    entries.push(FileEntry { group, key, value });
    merge_state.file_entries.set(entries);
}

#[when("the command line is parsed")]
fn the_command_line_is_parsed(merge_state: &MergeState) -> StepResult<()> {
    let args = merge_state.args.get().unwrap_or_default();
    let argv = std::iter::once(String::from("demo")).chain(args);
    update_store(merge_state, |current| {
        current.parse_command_line(argv, FlagStyle::Bare)
    })
}

#[when("the configuration file is read")]
fn the_configuration_file_is_read(merge_state: &MergeState) -> StepResult<()> {
    let text = render_file(&merge_state.file_entries.get().unwrap_or_default());
    update_store(merge_state, |current| {
        current.parse_config_str(&text, "scenario.ini")
    })
}

#[when("help is rendered")]
fn help_is_rendered(merge_state: &MergeState) -> StepResult<()> {
    let current = store(merge_state)?;
    merge_state.output.set(current.help_text(FlagStyle::Bare));
    Ok(())
}

#[when("the configuration is saved and reloaded into a fresh store")]
fn the_configuration_is_saved_and_reloaded(merge_state: &MergeState) -> StepResult<()> {
    let current = store(merge_state)?;
    let mut buffer = Vec::new();
    current
        .write_config(&mut buffer)
        .map_err(|error| format!("writing the configuration failed: {error}"))?;
    let text = String::from_utf8(buffer)
        .map_err(|error| format!("written configuration is not UTF-8: {error}"))?;

    merge_state.store.set(demo_store()?);
    update_store(merge_state, |fresh| fresh.parse_config_str(&text, "saved.ini"))
}
