use std::collections::HashSet;

use crate::{
    Answer, ChoiceQuestion, Clock, DateQuestion, Question, QuestionKind, SystemClock, TextQuestion,
    ValidationError,
};

/// Checks answers against the constraints declared by a question.
///
/// Date constraints are evaluated against the injected clock at validation time.
#[derive(Debug, Clone, Default)]
pub struct Validator<C = SystemClock> {
    clock: C,
}

impl Validator {
    /// Create a validator using the system clock.
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> Validator<C> {
    /// Create a validator using the given clock.
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// Get the clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Validate `answer` for `question`, returning the answer as it is recorded.
    ///
    /// Skipped optional choice questions (absent answer or an empty multi-select) are
    /// recorded as [`Answer::None`].
    pub fn validate(&self, question: &Question, answer: Answer) -> Result<Answer, ValidationError> {
        let kind = question.kind();
        if !kind.accepts(&answer) {
            return Err(ValidationError::ShapeMismatch {
                expected: kind.expected_shape(),
                actual: answer.type_name(),
            });
        }

        match kind {
            QuestionKind::Choice(choice) => validate_choice(choice, answer),
            QuestionKind::Text(text) => validate_text(text, answer),
            QuestionKind::Date(date) => self.validate_date(date, answer),
        }
    }

    fn validate_date(&self, question: &DateQuestion, answer: Answer) -> Result<Answer, ValidationError> {
        let Answer::Date(date) = answer else {
            return Err(ValidationError::MissingRequiredAnswer);
        };
        let today = self.clock.today();
        if question.range.contains(date, today) {
            Ok(answer)
        } else {
            Err(ValidationError::DateOutOfRange {
                date,
                range: question.range,
                today,
            })
        }
    }
}

fn validate_choice(question: &ChoiceQuestion, answer: Answer) -> Result<Answer, ValidationError> {
    match answer {
        Answer::Choice(ref key) => {
            if question.has_key(key) {
                Ok(answer)
            } else {
                Err(ValidationError::UnknownChoiceKey(key.clone()))
            }
        }
        Answer::Choices(ref keys) => {
            check_selected_keys(question, keys)?;
            if !keys.is_empty() {
                Ok(answer)
            } else if question.required {
                Err(ValidationError::MissingRequiredAnswer)
            } else {
                Ok(Answer::None)
            }
        }
        Answer::None if !question.required => Ok(Answer::None),
        _ => Err(ValidationError::MissingRequiredAnswer),
    }
}

fn check_selected_keys(question: &ChoiceQuestion, keys: &[String]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key.as_str()) {
            return Err(ValidationError::DuplicateChoiceKey(key.clone()));
        }
        if !question.has_key(key) {
            return Err(ValidationError::UnknownChoiceKey(key.clone()));
        }
    }
    Ok(())
}

fn validate_text(question: &TextQuestion, answer: Answer) -> Result<Answer, ValidationError> {
    let Answer::Text(ref text) = answer else {
        return Err(ValidationError::MissingRequiredAnswer);
    };
    let min = question.min_length();
    let actual = text.chars().count();
    if actual < min {
        return Err(ValidationError::TextTooShort { min, actual });
    }
    Ok(answer)
}
