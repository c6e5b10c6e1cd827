//! Behavioural step helpers for parameter-merge scenarios.

mod assertions;
mod state;
mod steps;

pub use state::{MergeState, merge_state};
