use serde::{Deserialize, Serialize};

use crate::{Answer, PromptText};

/// A single question asked at a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// The prompt text shown to the user.
    prompt: PromptText,

    /// The kind of question (determines the answer shape and its constraints).
    #[serde(flatten)]
    kind: QuestionKind,
}

impl Question {
    /// Create a new question.
    pub fn new(prompt: PromptText, kind: QuestionKind) -> Self {
        Self { prompt, kind }
    }

    /// Create a single-select choice question.
    pub fn single_choice(prompt: PromptText, required: bool, choices: Vec<Choice>) -> Self {
        Self::new(prompt, QuestionKind::Choice(ChoiceQuestion::single(required, choices)))
    }

    /// Create a multi-select choice question.
    pub fn multi_choice(prompt: PromptText, required: bool, choices: Vec<Choice>) -> Self {
        Self::new(prompt, QuestionKind::Choice(ChoiceQuestion::multi(required, choices)))
    }

    /// Create a free-form text question.
    pub fn text(prompt: PromptText, min_length: Option<usize>) -> Self {
        Self::new(prompt, QuestionKind::Text(TextQuestion { min_length }))
    }

    /// Create a date question.
    pub fn date(prompt: PromptText, range: DateRange) -> Self {
        Self::new(prompt, QuestionKind::Date(DateQuestion { range }))
    }

    /// Get the prompt text.
    pub fn prompt(&self) -> &PromptText {
        &self.prompt
    }

    /// Get the question kind.
    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    /// Get the choice configuration, if this is a choice question.
    pub fn as_choice(&self) -> Option<&ChoiceQuestion> {
        match &self.kind {
            QuestionKind::Choice(choice) => Some(choice),
            _ => None,
        }
    }
}

/// The kind of question, determining the answer shape and its constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    /// Pick one or several of a fixed list of options.
    Choice(ChoiceQuestion),

    /// Free-form text with an optional minimum length.
    Text(TextQuestion),

    /// A calendar date constrained relative to today.
    Date(DateQuestion),
}

impl QuestionKind {
    /// Check if an answer has the right shape for this kind of question.
    ///
    /// This is purely structural. Whether the answer is acceptable (known keys, length,
    /// date range, required) is decided by the validator.
    pub fn accepts(&self, answer: &Answer) -> bool {
        match (self, answer) {
            (_, Answer::None) => true,
            (Self::Choice(choice), Answer::Choice(_)) => choice.single,
            (Self::Choice(choice), Answer::Choices(_)) => !choice.single,
            (Self::Text(_), Answer::Text(_)) => true,
            (Self::Date(_), Answer::Date(_)) => true,
            _ => false,
        }
    }

    /// Name of the answer shape this kind of question expects.
    pub fn expected_shape(&self) -> &'static str {
        match self {
            Self::Choice(choice) if choice.single => "Choice",
            Self::Choice(_) => "Choices",
            Self::Text(_) => "Text",
            Self::Date(_) => "Date",
        }
    }

    /// Check if this is a choice question.
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::Choice(_))
    }
}

/// One option of a choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Key recorded in the answer and matched by conditional routing.
    pub key: String,

    /// Text shown for this option.
    pub display: PromptText,
}

impl Choice {
    /// Create a new option.
    pub fn new(key: impl Into<String>, display: PromptText) -> Self {
        Self {
            key: key.into(),
            display,
        }
    }

    /// Create an option whose English display text equals its key.
    pub fn plain(key: impl Into<String>) -> Self {
        let key = key.into();
        let display = PromptText::english(key.clone());
        Self { key, display }
    }
}

/// Configuration for a choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceQuestion {
    /// `true`: exactly one option. `false`: any non-empty subset.
    pub single: bool,

    /// Whether an answer must be given.
    pub required: bool,

    /// The options, in display order.
    pub choices: Vec<Choice>,
}

impl ChoiceQuestion {
    /// Create a single-select configuration.
    pub fn single(required: bool, choices: Vec<Choice>) -> Self {
        Self {
            single: true,
            required,
            choices,
        }
    }

    /// Create a multi-select configuration.
    pub fn multi(required: bool, choices: Vec<Choice>) -> Self {
        Self {
            single: false,
            required,
            choices,
        }
    }

    /// Check if a key is one of the declared options.
    pub fn has_key(&self, key: &str) -> bool {
        self.choices.iter().any(|choice| choice.key == key)
    }

    /// Iterate over the declared keys in display order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.choices.iter().map(|choice| choice.key.as_str())
    }
}

/// Configuration for a text question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextQuestion {
    /// Minimum number of characters. `None` means no minimum.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
}

impl TextQuestion {
    /// The effective minimum length.
    pub fn min_length(&self) -> usize {
        self.min_length.unwrap_or(0)
    }
}

/// Configuration for a date question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateQuestion {
    /// Which dates are acceptable, relative to the date of validation.
    pub range: DateRange,
}

/// A named constraint on acceptable dates, evaluated against "today".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateRange {
    /// Today or later.
    TodayAndFuture,

    /// Today or earlier.
    TodayAndPast,

    /// Strictly after today.
    Future,

    /// Strictly before today.
    Past,

    /// Any date.
    #[default]
    Any,
}

impl DateRange {
    /// Check if `date` satisfies this range when evaluated on `today`.
    pub fn contains(self, date: chrono::NaiveDate, today: chrono::NaiveDate) -> bool {
        match self {
            Self::TodayAndFuture => date >= today,
            Self::TodayAndPast => date <= today,
            Self::Future => date > today,
            Self::Past => date < today,
            Self::Any => true,
        }
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::TodayAndFuture => "todayAndFuture",
            Self::TodayAndPast => "todayAndPast",
            Self::Future => "future",
            Self::Past => "past",
            Self::Any => "any",
        };
        f.write_str(name)
    }
}
