use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single answer given to a question.
///
/// The shape of the answer must match the kind of question it is submitted to,
/// see [`QuestionKind::accepts`](crate::QuestionKind::accepts).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Answer {
    /// No answer given.
    #[default]
    None,

    /// The key of the chosen option (single-select choice questions).
    Choice(String),

    /// The keys of the chosen options (multi-select choice questions).
    Choices(Vec<String>),

    /// Free-form text (text questions).
    Text(String),

    /// A calendar date (date questions).
    Date(NaiveDate),
}

impl Answer {
    /// Create a single-choice answer.
    pub fn choice(key: impl Into<String>) -> Self {
        Self::Choice(key.into())
    }

    /// Create a multi-choice answer.
    pub fn choices<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Choices(keys.into_iter().map(Into::into).collect())
    }

    /// Create a text answer.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Check if no answer was given.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Try to get this answer as a chosen key.
    pub fn as_choice(&self) -> Option<&str> {
        match self {
            Self::Choice(key) => Some(key),
            _ => None,
        }
    }

    /// Try to get this answer as chosen keys.
    pub fn as_choices(&self) -> Option<&[String]> {
        match self {
            Self::Choices(keys) => Some(keys),
            _ => None,
        }
    }

    /// Try to get this answer as text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Try to get this answer as a date.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(date) => Some(*date),
            _ => None,
        }
    }

    /// Get the shape name of this answer for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Choice(_) => "Choice",
            Self::Choices(_) => "Choices",
            Self::Text(_) => "Text",
            Self::Date(_) => "Date",
        }
    }
}

impl From<NaiveDate> for Answer {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl<T: Into<Answer>> From<Option<T>> for Answer {
    fn from(answer: Option<T>) -> Self {
        answer.map_or(Self::None, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_match_variant() {
        assert_eq!(Answer::choice("Pay").as_choice(), Some("Pay"));
        assert_eq!(Answer::choice("Pay").as_text(), None);
        assert_eq!(Answer::text("hello").as_text(), Some("hello"));
        assert_eq!(
            Answer::choices(["a", "b"]).as_choices(),
            Some(&["a".to_string(), "b".to_string()][..])
        );
        assert!(Answer::None.is_none());
    }

    #[test]
    fn optional_date_converts() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(Answer::from(Some(date)), Answer::Date(date));
        assert_eq!(Answer::from(None::<NaiveDate>), Answer::None);
    }

    #[test]
    fn serializes_tagged() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let json = serde_json::to_value(Answer::Date(date)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "type": "date", "value": "2026-10-19" })
        );
        let none = serde_json::to_value(Answer::None).unwrap();
        assert_eq!(none, serde_json::json!({ "type": "none" }));
    }
}
