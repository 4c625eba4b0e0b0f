//! Scripted respondent for running surveys without user interaction.
//!
//! `ScriptedRespondent` answers each step from a queue of pre-defined answers.
//! This is useful for testing survey graphs and for replaying collected answers.
//!
//! # Example
//!
//! ```rust,ignore
//! use branching_survey::{ScriptedRespondent, Session};
//!
//! let mut session = Session::new(&graph);
//! session
//!     .run(
//!         &mut ScriptedRespondent::new()
//!             .with_choice("contact_method", "Email")
//!             .with_text("email_address", "me@example.com"),
//!     )
//!     .unwrap();
//! assert_eq!(session.history().len(), 2);
//! ```

use std::collections::{HashMap, VecDeque};

use chrono::NaiveDate;

use crate::{Answer, Question, Respondent, StepId, ValidationError};

/// A respondent that returns pre-configured answers.
///
/// Several answers may be queued for the same step; they are used in order, so a
/// script can give an invalid answer first and the corrected one after it.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRespondent {
    answers: HashMap<StepId, VecDeque<Answer>>,
    rejections: Vec<(StepId, ValidationError)>,
}

/// Error type for ScriptedRespondent.
#[derive(Debug, thiserror::Error)]
pub enum ScriptedRespondentError {
    #[error("No scripted answer left for step: {0}")]
    MissingAnswer(StepId),
}

impl ScriptedRespondent {
    /// Create a new respondent with no answers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an answer for a step.
    pub fn with_answer(mut self, step: impl Into<StepId>, answer: impl Into<Answer>) -> Self {
        self.answers
            .entry(step.into())
            .or_default()
            .push_back(answer.into());
        self
    }

    /// Queue a single-choice answer.
    pub fn with_choice(self, step: impl Into<StepId>, key: impl Into<String>) -> Self {
        self.with_answer(step, Answer::Choice(key.into()))
    }

    /// Queue a multi-choice answer.
    pub fn with_choices<I, S>(self, step: impl Into<StepId>, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_answer(step, Answer::choices(keys))
    }

    /// Queue a text answer.
    pub fn with_text(self, step: impl Into<StepId>, text: impl Into<String>) -> Self {
        self.with_answer(step, Answer::Text(text.into()))
    }

    /// Queue a date answer.
    pub fn with_date(self, step: impl Into<StepId>, date: NaiveDate) -> Self {
        self.with_answer(step, Answer::Date(date))
    }

    /// Queue an absent answer (skip an optional question).
    pub fn with_none(self, step: impl Into<StepId>) -> Self {
        self.with_answer(step, Answer::None)
    }

    /// Rejections reported by the session, in order.
    pub fn rejections(&self) -> &[(StepId, ValidationError)] {
        &self.rejections
    }

    /// Check if every queued answer has been used.
    pub fn is_exhausted(&self) -> bool {
        self.answers.values().all(VecDeque::is_empty)
    }
}

impl Respondent for ScriptedRespondent {
    type Error = ScriptedRespondentError;

    fn answer(&mut self, step: &StepId, _question: &Question) -> Result<Answer, Self::Error> {
        self.answers
            .get_mut(step)
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| ScriptedRespondentError::MissingAnswer(step.clone()))
    }

    fn rejected(&mut self, step: &StepId, error: &ValidationError) {
        self.rejections.push((step.clone(), error.clone()));
    }
}
