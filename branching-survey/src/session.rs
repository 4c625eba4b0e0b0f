use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    Answer, Clock, EndScreen, History, NextTarget, Question, ResolutionError, Step, StepGraph,
    StepId, SystemClock, ValidationError, Validator, coerce, resolve,
};

/// Where a session currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for an answer to the question at this step.
    Active(StepId),

    /// Reached this end screen. No further transitions.
    Completed(StepId),
}

/// What to present after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome<'g> {
    /// Ask this question next.
    Question { id: StepId, question: &'g Question },

    /// The survey is complete; show this end screen.
    Completed { id: StepId, screen: &'g EndScreen },
}

impl SessionOutcome<'_> {
    /// The step to present.
    pub fn id(&self) -> &StepId {
        match self {
            Self::Question { id, .. } | Self::Completed { id, .. } => id,
        }
    }

    /// Check if the survey is complete.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Error type for session operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The answer was not accepted. The session stays at the same step.
    #[error("Answer for step '{step}' rejected: {source}")]
    Validation {
        step: StepId,
        source: ValidationError,
    },

    /// The graph has no route for an accepted answer.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// The current step is not part of the graph.
    #[error("Step '{0}' does not exist")]
    UnknownStep(StepId),

    /// The session routed back to a step it has already visited.
    #[error("Step '{step}' routes back to already visited step '{target}'")]
    RevisitedStep { step: StepId, target: StepId },

    /// An answer was submitted after the survey was completed.
    #[error("Survey is already completed")]
    AlreadyCompleted,
}

impl SessionError {
    /// Check if the caller can re-ask the same question and expect a corrected answer to succeed.
    ///
    /// Everything else is a configuration or integration defect.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Validation { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }

    /// The validation error, if the answer was rejected.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// One traversal of a step graph, from its entry step to an end screen.
///
/// A session borrows the graph and never mutates it, so any number of sessions can run
/// over the same graph. A single session is driven by one caller at a time.
#[derive(Debug, Clone)]
pub struct Session<'g, C = SystemClock> {
    graph: &'g StepGraph,
    validator: Validator<C>,
    state: SessionState,
    history: History,
}

impl<'g> Session<'g> {
    /// Start a session at the graph's entry step, validating dates against the system clock.
    pub fn new(graph: &'g StepGraph) -> Self {
        Self::with_clock(graph, SystemClock)
    }
}

impl<'g, C: Clock> Session<'g, C> {
    /// Start a session at the graph's entry step, validating dates against `clock`.
    pub fn with_clock(graph: &'g StepGraph, clock: C) -> Self {
        let entry = graph.entry().clone();
        let state = match graph.get(entry.as_str()) {
            Some(Step::EndScreen(_)) => SessionState::Completed(entry),
            _ => SessionState::Active(entry),
        };
        Self {
            graph,
            validator: Validator::with_clock(clock),
            state,
            history: History::new(),
        }
    }

    /// The graph this session traverses.
    pub fn graph(&self) -> &'g StepGraph {
        self.graph
    }

    /// Get the current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Check if an end screen has been reached.
    pub fn is_completed(&self) -> bool {
        matches!(self.state, SessionState::Completed(_))
    }

    /// The id of the current step (the end screen once completed).
    pub fn current_id(&self) -> &StepId {
        match &self.state {
            SessionState::Active(id) | SessionState::Completed(id) => id,
        }
    }

    /// The current step.
    pub fn current(&self) -> Result<&'g Step, SessionError> {
        let id = self.current_id();
        self.graph
            .get(id.as_str())
            .ok_or_else(|| SessionError::UnknownStep(id.clone()))
    }

    /// What to present for the current step.
    pub fn view(&self) -> Result<SessionOutcome<'g>, SessionError> {
        self.outcome_at(self.current_id())
    }

    /// Accepted answers so far, in traversal order.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Finish the session and keep its history.
    pub fn into_history(self) -> History {
        self.history
    }

    /// Submit an answer to the current question.
    ///
    /// On success the answer is recorded and the session advances. On any error the
    /// session is left exactly as it was.
    pub fn submit(&mut self, answer: impl Into<Answer>) -> Result<SessionOutcome<'g>, SessionError> {
        let SessionState::Active(id) = &self.state else {
            return Err(SessionError::AlreadyCompleted);
        };
        let id = id.clone();
        let step = self.current()?;
        let Step::Question(question_step) = step else {
            return Err(SessionError::AlreadyCompleted);
        };

        let accepted = self
            .validator
            .validate(&question_step.question, answer.into())
            .map_err(|source| {
                debug!(step = %id, error = %source, "answer rejected");
                SessionError::Validation {
                    step: id.clone(),
                    source,
                }
            })?;

        let target = resolve(self.graph, &id, step, &accepted).inspect_err(|err| {
            warn!(step = %id, error = %err, "no route for accepted answer");
        })?;

        let (next, completed) = match target {
            NextTarget::Step(next) => (next, false),
            NextTarget::End(next) => (next, true),
            NextTarget::Terminal => return Err(SessionError::AlreadyCompleted),
        };
        if next == id || self.history.contains(next.as_str()) {
            warn!(step = %id, target = %next, "survey graph routes back to a visited step");
            return Err(SessionError::RevisitedStep { step: id, target: next });
        }
        let outcome = self.outcome_at(&next)?;

        debug!(step = %id, next = %next, "answer accepted");
        self.history.push(id, accepted);
        if completed {
            info!(end = %next, answers = self.history.len(), "survey completed");
            self.state = SessionState::Completed(next);
        } else {
            self.state = SessionState::Active(next);
        }
        Ok(outcome)
    }

    /// Submit an untyped answer payload, coercing it to the current question's answer shape.
    ///
    /// `null` stands for "no answer".
    pub fn submit_raw(&mut self, raw: &Value) -> Result<SessionOutcome<'g>, SessionError> {
        let id = self.current_id().clone();
        let Step::Question(question_step) = self.current()? else {
            return Err(SessionError::AlreadyCompleted);
        };
        let answer = coerce(question_step.question.kind(), raw)
            .map_err(|source| SessionError::Validation { step: id, source })?;
        self.submit(answer)
    }

    fn outcome_at(&self, id: &StepId) -> Result<SessionOutcome<'g>, SessionError> {
        match self.graph.get(id.as_str()) {
            Some(Step::Question(step)) => Ok(SessionOutcome::Question {
                id: id.clone(),
                question: &step.question,
            }),
            Some(Step::EndScreen(screen)) => Ok(SessionOutcome::Completed {
                id: id.clone(),
                screen,
            }),
            None => Err(SessionError::UnknownStep(id.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::{Choice, DateRange, FixedClock, PromptText, Selection, SurveyDefinition, NextRule};

    fn graph() -> StepGraph {
        let definition = SurveyDefinition::builder()
            .step(
                "contact_method",
                Step::question(
                    Question::single_choice(
                        PromptText::english("Email or phone?"),
                        true,
                        vec![Choice::plain("Email"), Choice::plain("Phone")],
                    ),
                    NextRule::conditional(vec![
                        Selection::new("contact_method", "Email", "email_address"),
                        Selection::new("contact_method", "Phone", "contact_date"),
                    ]),
                ),
            )
            .step(
                "email_address",
                Step::question(
                    Question::text(PromptText::english("What is your email address?"), Some(3)),
                    "contact_date",
                ),
            )
            .step(
                "contact_date",
                Step::question(
                    Question::date(PromptText::english("When?"), DateRange::TodayAndFuture),
                    "end_step",
                ),
            )
            .step("end_step", Step::end(PromptText::english("Thank you.")))
            .build();
        StepGraph::load(definition).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn current_is_idempotent() {
        let graph = graph();
        let session = Session::with_clock(&graph, FixedClock(today()));

        let first = session.current().unwrap();
        let second = session.current().unwrap();
        assert_eq!(first, second);
        assert_eq!(session.current_id(), &StepId::new("contact_method"));
        assert!(session.history().is_empty());
    }

    #[test]
    fn rejected_answer_leaves_state_untouched() {
        let graph = graph();
        let mut session = Session::with_clock(&graph, FixedClock(today()));

        let err = session.submit(Answer::None).unwrap_err();
        assert_eq!(
            err,
            SessionError::Validation {
                step: "contact_method".into(),
                source: ValidationError::MissingRequiredAnswer,
            }
        );
        assert!(err.is_recoverable());
        assert_eq!(session.state(), &SessionState::Active("contact_method".into()));
        assert!(session.history().is_empty());
    }

    #[test]
    fn walks_to_completion() {
        let graph = graph();
        let mut session = Session::with_clock(&graph, FixedClock(today()));

        let outcome = session.submit(Answer::choice("Email")).unwrap();
        assert_eq!(outcome.id(), &StepId::new("email_address"));

        let outcome = session.submit(Answer::text("me@example.com")).unwrap();
        assert_eq!(outcome.id(), &StepId::new("contact_date"));

        let outcome = session.submit(Answer::Date(today())).unwrap();
        assert!(outcome.is_completed());
        assert!(session.is_completed());
        assert_eq!(
            outcome,
            SessionOutcome::Completed {
                id: "end_step".into(),
                screen: &EndScreen {
                    display: PromptText::english("Thank you.")
                },
            }
        );

        let steps: Vec<_> = session.history().steps().map(StepId::as_str).collect();
        assert_eq!(steps, vec!["contact_method", "email_address", "contact_date"]);
        assert_eq!(
            session.submit(Answer::None),
            Err(SessionError::AlreadyCompleted)
        );
    }

    #[test]
    fn past_date_is_rejected() {
        let graph = graph();
        let mut session = Session::with_clock(&graph, FixedClock(today()));
        session.submit(Answer::choice("Phone")).unwrap();

        let yesterday = today().pred_opt().unwrap();
        let err = session.submit(Answer::Date(yesterday)).unwrap_err();
        assert!(matches!(
            err.as_validation(),
            Some(ValidationError::DateOutOfRange { .. })
        ));
        assert_eq!(session.current_id(), &StepId::new("contact_date"));
    }

    #[test]
    fn raw_answers_are_coerced() {
        let graph = graph();
        let mut session = Session::with_clock(&graph, FixedClock(today()));

        session.submit_raw(&json!("Phone")).unwrap();
        let outcome = session.submit_raw(&json!("2026-10-20")).unwrap();
        assert!(outcome.is_completed());
    }

    #[test]
    fn raw_shape_mismatch_is_not_recoverable() {
        let graph = graph();
        let mut session = Session::with_clock(&graph, FixedClock(today()));

        let err = session.submit_raw(&json!(7)).unwrap_err();
        assert!(!err.is_recoverable());
        assert_eq!(session.current_id(), &StepId::new("contact_method"));
    }

    #[test]
    fn view_matches_submit_outcome() {
        let graph = graph();
        let mut session = Session::with_clock(&graph, FixedClock(today()));

        let outcome = session.submit(Answer::choice("Email")).unwrap();
        assert_eq!(session.view().unwrap(), outcome);
    }

    #[test]
    fn entry_end_screen_is_already_complete() {
        let definition = SurveyDefinition::builder()
            .step("end", Step::end(PromptText::english("Nothing to ask")))
            .build();
        let graph = StepGraph::load(definition).unwrap();
        let session = Session::new(&graph);
        assert!(session.is_completed());
    }
}
