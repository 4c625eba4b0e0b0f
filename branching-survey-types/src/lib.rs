//! Core types for the branching-survey crate.
//!
//! This crate provides the foundational types for defining branching surveys:
//! - `SurveyDefinition` and `StepTable` - The authored, not yet checked, step table
//! - `Step`, `NextRule` and `Selection` - Graph nodes and their routing rules
//! - `Question` and `QuestionKind` - Individual questions and their constraints
//! - `Answer` and `History` - Submitted values and the ordered record of accepted ones
//! - `Clock` - The injectable source of "today" for date questions
//! - `Respondent` trait - For implementing presentation layers

mod step_id;
pub use step_id::StepId;

mod prompt;
pub use prompt::PromptText;

mod answer;
pub use answer::Answer;

mod question;
pub use question::{
    Choice, ChoiceQuestion, DateQuestion, DateRange, Question, QuestionKind, TextQuestion,
};

mod step;
pub use step::{ConditionalRule, EndScreen, NextRule, QuestionStep, Selection, Step};

mod definition;
pub use definition::{StepTable, SurveyDefinition, SurveyDefinitionBuilder};

mod history;
pub use history::{History, HistoryEntry};

mod clock;
pub use clock::{Clock, FixedClock, SystemClock};

mod error;
pub use error::{ResolutionError, ValidationError};

mod traits;
pub use traits::Respondent;
