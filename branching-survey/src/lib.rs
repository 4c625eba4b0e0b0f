//! # branching-survey
//!
//! Validate and traverse branching surveys. Presentation-agnostic.
//!
//! A survey is a graph of steps. Each step asks one question and routes on, either
//! unconditionally or depending on the answer, until an end screen is reached.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use branching_survey::{Answer, Session, StepGraph};
//!
//! let graph = StepGraph::from_json(include_str!("feedback.json"))?;
//!
//! let mut session = Session::new(&graph);
//! session.submit(Answer::choice("suggestion"))?;
//! session.submit(Answer::text("I would like more parking"))?;
//!
//! for entry in session.history() {
//!     println!("{}: {:?}", entry.step, entry.answer);
//! }
//! ```
//!
//! ## Pieces
//!
//! - [`StepGraph::load`] - Checks a [`SurveyDefinition`] once and reports every violation
//! - [`Validator`] - Checks an answer against its question's constraints
//! - [`resolve`] - Picks the next step from a step's routing rule and the accepted answer
//! - [`Session`] - One traversal; holds the current step and the answer history
//! - [`Session::run`] - Drives a session with any [`Respondent`] (CLI, GUI, scripted, ...)

// Re-export all types from branching-survey-types
pub use branching_survey_types::*;

mod graph;
pub use graph::{GraphError, LoadError, StepGraph, Violation};

mod validate;
pub use validate::Validator;

mod resolve;
pub use resolve::{NextTarget, resolve};

mod coerce;
pub use coerce::coerce;

mod session;
pub use session::{Session, SessionError, SessionOutcome, SessionState};

mod run;
pub use run::RunError;

// Scripted respondent for running surveys without user interaction
mod scripted;
pub use scripted::{ScriptedRespondent, ScriptedRespondentError};
