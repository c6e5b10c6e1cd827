//! Shared behavioural-test state for parameter-merge scenarios.

use paramstore::{Eligibility, Parameter, ParameterGroup, ParameterStore};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// Step result type for parameter-merge BDD tests.
pub type StepResult<T> = Result<T, String>;

/// One `key = value` line destined for a configuration file section.
#[derive(Clone)]
pub struct FileEntry {
    /// Section the line belongs to.
    pub(crate) group: String,
    /// Parameter name.
    pub(crate) key: String,
    /// Raw value text.
    pub(crate) value: String,
}

/// Shared scenario state for parameter-merge behavioural tests.
#[derive(Default, ScenarioState)]
pub struct MergeState {
    /// Store under test.
    pub(crate) store: Slot<ParameterStore>,

    /// Command-line arguments after the program name.
    pub(crate) args: Slot<Vec<String>>,

    /// Lines of the configuration file, in declaration order.
    pub(crate) file_entries: Slot<Vec<FileEntry>>,

    /// Display text of the most recent error.
    pub(crate) error: Slot<String>,

    /// Rendered help text.
    pub(crate) output: Slot<String>,
}

/// Fixture providing fresh state for each parameter-merge scenario.
#[fixture]
pub fn merge_state() -> MergeState {
    let state = MergeState::default();
    state.args.set(Vec::new());
    state.file_entries.set(Vec::new());
    state
}

/// Builds the store used by every scenario.
///
/// # Errors
///
/// Returns the error text if the declarations are rejected.
pub fn demo_store() -> StepResult<ParameterStore> {
    build_demo_store().map_err(|error| error.to_string())
}

fn build_demo_store() -> paramstore::Result<ParameterStore> {
    ParameterStore::new("All parameters for your program")
        .with_program_name("demo")
        .with_group(
            ParameterGroup::new("Input")
                .with_description("Input parameters")
                .with(Parameter::<f64>::with_default("k", "Value of k", 1.23))?
                .with(Parameter::<f64>::with_default("b", "Value of b", 9.87))?,
        )?
        .with_group(
            ParameterGroup::new("Interface")
                .with_description("User interface parameters")
                .with(Parameter::<String>::with_default(
                    "greeter",
                    "Greeting printed on start",
                    "Hi, user.",
                ))?
                .with(
                    Parameter::<bool>::new("verbose", "Chatty output")
                        .with_eligibility(Eligibility::CommandLineOnly),
                )?,
        )?
        .with_group(
            ParameterGroup::new("Secrets").with(
                Parameter::<String>::new("token", "Access token")
                    .with_eligibility(Eligibility::FileOnly),
            )?,
        )
}

/// Renders the collected file entries as INI text, one section per group in
/// first-seen order.
pub fn render_file(entries: &[FileEntry]) -> String {
    let mut groups: Vec<&str> = Vec::new();
    for entry in entries {
        if !groups.contains(&entry.group.as_str()) {
            groups.push(&entry.group);
        }
    }
    let mut text = String::new();
    for group in groups {
        text.push_str(&format!("[{group}]\n"));
        for entry in entries.iter().filter(|entry| entry.group == group) {
            text.push_str(&format!("{} = {}\n", entry.key, entry.value));
        }
    }
    text
}
