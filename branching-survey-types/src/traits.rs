use crate::{Answer, Question, StepId, ValidationError};

/// Trait for presentation layers that answer survey questions.
///
/// A respondent is shown one question at a time and decides how to present it
/// (CLI prompt, form field, chat message, scripted test input, ...).
/// Routing and validation stay in the engine.
pub trait Respondent {
    /// The error type for this respondent.
    type Error: Into<anyhow::Error>;

    /// Produce an answer for the question asked at `step`.
    ///
    /// # Returns
    /// * `Ok(answer)` to submit the answer (use [`Answer::None`] to skip an optional question)
    /// * `Err` on cancellation or presentation failure
    fn answer(&mut self, step: &StepId, question: &Question) -> Result<Answer, Self::Error>;

    /// Called when the last answer for `step` was rejected. The same question is asked again.
    ///
    /// The default implementation ignores the rejection.
    fn rejected(&mut self, _step: &StepId, _error: &ValidationError) {}
}
