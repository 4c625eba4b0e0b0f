//! Coercion of untyped answer payloads from the presentation layer.

use chrono::NaiveDate;
use serde_json::Value;

use crate::{Answer, QuestionKind, ValidationError};

/// Turn a raw JSON payload into an [`Answer`] shaped for `kind`.
///
/// `null` means "no answer". Choice questions take a string (single) or an array of
/// strings (multi), text questions a string, date questions a `YYYY-MM-DD` string.
/// Anything else is a [`ValidationError::ShapeMismatch`].
pub fn coerce(kind: &QuestionKind, raw: &Value) -> Result<Answer, ValidationError> {
    let mismatch = || ValidationError::ShapeMismatch {
        expected: kind.expected_shape(),
        actual: json_type(raw),
    };

    match (kind, raw) {
        (_, Value::Null) => Ok(Answer::None),
        (QuestionKind::Choice(choice), Value::String(key)) if choice.single => {
            Ok(Answer::Choice(key.clone()))
        }
        (QuestionKind::Choice(choice), Value::Array(items)) if !choice.single => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(mismatch))
            .collect::<Result<Vec<_>, _>>()
            .map(Answer::Choices),
        (QuestionKind::Text(_), Value::String(text)) => Ok(Answer::Text(text.clone())),
        (QuestionKind::Date(_), Value::String(date)) => {
            NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map(Answer::Date)
                .map_err(|_| mismatch())
        }
        _ => Err(mismatch()),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
