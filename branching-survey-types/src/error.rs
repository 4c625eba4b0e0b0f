use chrono::NaiveDate;

use crate::{DateRange, StepId};

/// Why an answer was not accepted for a question.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// No answer was given, but the question requires one.
    #[error("An answer is required")]
    MissingRequiredAnswer,

    /// The answer names an option the question does not offer.
    #[error("Unknown choice '{0}'")]
    UnknownChoiceKey(String),

    /// A multi-select answer names the same option twice.
    #[error("Choice '{0}' was selected more than once")]
    DuplicateChoiceKey(String),

    /// The text is shorter than the question's minimum length.
    #[error("Answer must be at least {min} characters long, got {actual}")]
    TextTooShort { min: usize, actual: usize },

    /// The date does not satisfy the question's range.
    #[error("Date {date} is not in range '{range}' (today is {today})")]
    DateOutOfRange {
        date: NaiveDate,
        range: DateRange,
        today: NaiveDate,
    },

    /// The answer has the wrong shape for the question. An integration defect, not user input.
    #[error("Expected a {expected} answer, got {actual}")]
    ShapeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
}

impl ValidationError {
    /// Check if re-asking the same question with a corrected answer can succeed.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::ShapeMismatch { .. })
    }
}

/// Why the next step could not be determined for an accepted answer.
///
/// These indicate a graph that violates its own invariants; they are never caused by user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    /// No selection of a conditional rule matches the answer.
    #[error("Step '{step}' has no route for answer {answer}")]
    UnhandledAnswer { step: StepId, answer: String },

    /// The rule points at a step that does not exist.
    #[error("Step '{step}' routes to unknown step '{target}'")]
    DanglingStepReference { step: StepId, target: StepId },
}
