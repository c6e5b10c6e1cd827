//! Behavioural tests for merging command-line, file, and default values.

mod bdd_parameter_merge_helpers;

pub use bdd_parameter_merge_helpers::{MergeState, merge_state};
use rstest_bdd_macros::scenario;

#[scenario(
    path = "tests/features/parameter_merge.feature",
    name = "Defaults apply when no source supplies a value"
)]
fn defaults_apply_when_no_source_supplies_a_value(merge_state: MergeState) {
    let _ = merge_state;
}

#[scenario(
    path = "tests/features/parameter_merge.feature",
    name = "Command-line flags fill parameters"
)]
fn command_line_flags_fill_parameters(merge_state: MergeState) {
    let _ = merge_state;
}

#[scenario(
    path = "tests/features/parameter_merge.feature",
    name = "The command line overrides the configuration file"
)]
fn the_command_line_overrides_the_configuration_file(merge_state: MergeState) {
    let _ = merge_state;
}

#[scenario(
    path = "tests/features/parameter_merge.feature",
    name = "A later file read keeps command-line values"
)]
fn a_later_file_read_keeps_command_line_values(merge_state: MergeState) {
    let _ = merge_state;
}

#[scenario(
    path = "tests/features/parameter_merge.feature",
    name = "File-only parameters are refused on the command line"
)]
fn file_only_parameters_are_refused_on_the_command_line(merge_state: MergeState) {
    let _ = merge_state;
}

#[scenario(
    path = "tests/features/parameter_merge.feature",
    name = "File-only parameters are read from the configuration file"
)]
fn file_only_parameters_are_read_from_the_configuration_file(merge_state: MergeState) {
    let _ = merge_state;
}

#[scenario(
    path = "tests/features/parameter_merge.feature",
    name = "Command-line-only parameters are refused in the configuration file"
)]
fn command_line_only_parameters_are_refused_in_the_configuration_file(
    merge_state: MergeState,
) {
    let _ = merge_state;
}

#[scenario(
    path = "tests/features/parameter_merge.feature",
    name = "Unknown flags are rejected"
)]
fn unknown_flags_are_rejected(merge_state: MergeState) {
    let _ = merge_state;
}

#[scenario(
    path = "tests/features/parameter_merge.feature",
    name = "Malformed numbers are rejected"
)]
fn malformed_numbers_are_rejected(merge_state: MergeState) {
    let _ = merge_state;
}

#[scenario(
    path = "tests/features/parameter_merge.feature",
    name = "Help lists flags with their defaults"
)]
fn help_lists_flags_with_their_defaults(merge_state: MergeState) {
    let _ = merge_state;
}

#[scenario(
    path = "tests/features/parameter_merge.feature",
    name = "A saved configuration reloads to the same values"
)]
fn a_saved_configuration_reloads_to_the_same_values(merge_state: MergeState) {
    let _ = merge_state;
}
