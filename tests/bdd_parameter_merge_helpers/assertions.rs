//! Then-step assertions for parameter-merge behavioural scenarios.

use paramstore::ParameterGroup;
use rstest_bdd_macros::then;

use super::state::{MergeState, StepResult};

fn with_group<R>(
    merge_state: &MergeState,
    group: &str,
    check: impl FnOnce(&ParameterGroup) -> StepResult<R>,
) -> StepResult<R> {
    let store = merge_state
        .store
        .get()
        .ok_or_else(|| String::from("parameter store should be set"))?;
    let found = store.group(group).map_err(|error| error.to_string())?;
    check(found)
}

fn output(merge_state: &MergeState) -> StepResult<String> {
    merge_state
        .output
        .get()
        .ok_or_else(|| String::from("help output should be set"))
}

#[then("the float {name} in {group} is {value}")]
#[expect(clippy::float_arithmetic, reason = "tolerance comparison")]
fn the_float_is(
    merge_state: &MergeState,
    name: String,
    group: String,
    value: String,
) -> StepResult<()> {
    let expected: f64 = value
        .parse()
        .map_err(|error| format!("expected value {value} is not a number: {error}"))?;
    let actual = with_group(merge_state, &group, |found| {
        found.get::<f64>(&name).map_err(|error| error.to_string())
    })?;
    if (actual - expected).abs() > f64::EPSILON {
        return Err(format!("expected {group}.{name} = {expected}, got {actual}"));
    }
    Ok(())
}

#[then("the text {name} in {group} is {value}")]
fn the_text_is(
    merge_state: &MergeState,
    name: String,
    group: String,
    value: String,
) -> StepResult<()> {
    let actual = with_group(merge_state, &group, |found| {
        found.get::<String>(&name).map_err(|error| error.to_string())
    })?;
    if actual != value {
        return Err(format!("expected {group}.{name} = {value:?}, got {actual:?}"));
    }
    Ok(())
}

#[then("{name} in {group} was set by the user")]
fn was_set_by_user(merge_state: &MergeState, name: String, group: String) -> StepResult<()> {
    let set = with_group(merge_state, &group, |found| {
        found.set_by_user(&name).map_err(|error| error.to_string())
    })?;
    assert!(set, "expected {group}.{name} to be set by the user");
    Ok(())
}

#[then("{name} in {group} was not set by the user")]
fn was_not_set_by_user(merge_state: &MergeState, name: String, group: String) -> StepResult<()> {
    let set = with_group(merge_state, &group, |found| {
        found.set_by_user(&name).map_err(|error| error.to_string())
    })?;
    assert!(!set, "expected {group}.{name} to keep its default");
    Ok(())
}

#[then("the last operation failed mentioning {fragment}")]
fn the_last_operation_failed(merge_state: &MergeState, fragment: String) -> StepResult<()> {
    let error = merge_state
        .error
        .get()
        .ok_or_else(|| String::from("an error should have been recorded"))?;
    assert!(
        error.contains(&fragment),
        "expected error mentioning {fragment:?}, got: {error}"
    );
    Ok(())
}

#[then("the output mentions {fragment}")]
fn the_output_mentions(merge_state: &MergeState, fragment: String) -> StepResult<()> {
    let text = output(merge_state)?;
    assert!(text.contains(&fragment), "expected {fragment:?} in:\n{text}");
    Ok(())
}

#[then("the output does not mention {fragment}")]
fn the_output_does_not_mention(merge_state: &MergeState, fragment: String) -> StepResult<()> {
    let text = output(merge_state)?;
    assert!(!text.contains(&fragment), "did not expect {fragment:?} in:\n{text}");
    Ok(())
}
