//! Event sign-up, authored as JSON: multi-select branching and an optional question.

use branching_survey::{LoadError, StepGraph};

/// The survey as authored.
pub const JSON: &str = include_str!("../surveys/event_signup.json");

/// The survey, parsed and checked.
pub fn graph() -> Result<StepGraph, LoadError> {
    StepGraph::from_json(JSON)
}
