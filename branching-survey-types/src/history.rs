use serde::{Deserialize, Serialize};

use crate::{Answer, StepId};

/// One accepted answer, recorded in the order it was given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub step: StepId,
    pub answer: Answer,
}

/// Accepted answers of a session, in traversal order.
///
/// Each step appears at most once, since a traversal never revisits a step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    /// Create an empty history.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record an accepted answer.
    pub fn push(&mut self, step: impl Into<StepId>, answer: Answer) {
        self.entries.push(HistoryEntry {
            step: step.into(),
            answer,
        });
    }

    /// Get the answer recorded for a step.
    pub fn get(&self, step: &str) -> Option<&Answer> {
        self.entries
            .iter()
            .find(|entry| entry.step == step)
            .map(|entry| &entry.answer)
    }

    /// Check if a step has been answered.
    pub fn contains(&self, step: &str) -> bool {
        self.get(step).is_some()
    }

    /// Iterate over the entries in traversal order.
    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.entries.iter()
    }

    /// The ids of the answered steps, in traversal order.
    pub fn steps(&self) -> impl Iterator<Item = &StepId> {
        self.entries.iter().map(|entry| &entry.step)
    }

    /// Get the number of answers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no answers.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the entries as a slice.
    pub fn as_slice(&self) -> &[HistoryEntry] {
        &self.entries
    }
}

impl IntoIterator for History {
    type Item = HistoryEntry;
    type IntoIter = std::vec::IntoIter<HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
