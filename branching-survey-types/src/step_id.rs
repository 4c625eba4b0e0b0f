use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

/// The identifier of a step in a survey graph, e.g., `"what_else"`.
///
/// Steps reference each other by id rather than by pointer, so the graph stays
/// a plain table that can be serialized and checked for referential integrity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId {
    id: String,
}

impl StepId {
    /// Create a new step id.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.id
    }

    /// Check if the id is empty.
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl Borrow<str> for StepId {
    fn borrow(&self) -> &str {
        &self.id
    }
}

impl AsRef<str> for StepId {
    fn as_ref(&self) -> &str {
        &self.id
    }
}

impl From<&str> for StepId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for StepId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&String> for StepId {
    fn from(s: &String) -> Self {
        Self::new(s.clone())
    }
}

impl From<&StepId> for StepId {
    fn from(id: &StepId) -> Self {
        id.clone()
    }
}

impl PartialEq<str> for StepId {
    fn eq(&self, other: &str) -> bool {
        self.id == other
    }
}

impl PartialEq<&str> for StepId {
    fn eq(&self, other: &&str) -> bool {
        self.id == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new() {
        let id = StepId::new("what_else");
        assert_eq!(id.as_str(), "what_else");
    }

    #[test]
    fn display() {
        let id = StepId::new("contact_date");
        assert_eq!(format!("{id}"), "contact_date");
    }

    #[test]
    fn from_str() {
        let id: StepId = "end_step".into();
        assert_eq!(id, "end_step");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = StepId::new("your_name");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"your_name\"");
        let back: StepId = serde_json::from_str("\"your_name\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn lookup_by_str() {
        let mut map = std::collections::HashMap::new();
        map.insert(StepId::new("a"), 1);
        assert_eq!(map.get("a"), Some(&1));
    }
}
