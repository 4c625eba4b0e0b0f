use std::fmt;

use indexmap::IndexMap;
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};

use crate::{Step, StepId};

/// An authored survey: a table of steps plus an optional entry step.
///
/// A definition is not yet checked. It has to be loaded into a step graph before
/// any session can traverse it, which is where every structural problem is reported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveyDefinition {
    /// The first step. When absent, the step without incoming edges is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<StepId>,

    /// All steps, in authoring order.
    pub steps: StepTable,
}

impl SurveyDefinition {
    /// Create a definition from a step table.
    pub fn new(steps: StepTable) -> Self {
        Self { entry: None, steps }
    }

    /// Start building a definition step by step.
    pub fn builder() -> SurveyDefinitionBuilder {
        SurveyDefinitionBuilder::default()
    }

    /// Set the entry step.
    pub fn with_entry(mut self, entry: impl Into<StepId>) -> Self {
        self.entry = Some(entry.into());
        self
    }
}

/// Builds a [`SurveyDefinition`] from explicitly constructed steps.
#[derive(Debug, Clone, Default)]
pub struct SurveyDefinitionBuilder {
    entry: Option<StepId>,
    steps: StepTable,
}

impl SurveyDefinitionBuilder {
    /// Set the entry step.
    pub fn entry(mut self, entry: impl Into<StepId>) -> Self {
        self.entry = Some(entry.into());
        self
    }

    /// Add a step.
    pub fn step(mut self, id: impl Into<StepId>, step: Step) -> Self {
        self.steps.insert(id, step);
        self
    }

    /// Finish building.
    pub fn build(self) -> SurveyDefinition {
        SurveyDefinition {
            entry: self.entry,
            steps: self.steps,
        }
    }
}

/// Steps keyed by id, in authoring order.
///
/// Inserting an id twice keeps the first step and remembers the id as a duplicate,
/// so that the loader can report it instead of silently dropping a step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepTable {
    steps: IndexMap<StepId, Step>,
    duplicates: Vec<StepId>,
}

impl StepTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a step. Returns `false` if the id was already present.
    pub fn insert(&mut self, id: impl Into<StepId>, step: Step) -> bool {
        let id = id.into();
        if self.steps.contains_key(&id) {
            self.duplicates.push(id);
            false
        } else {
            self.steps.insert(id, step);
            true
        }
    }

    /// Get a step by id.
    pub fn get(&self, id: &str) -> Option<&Step> {
        self.steps.get(id)
    }

    /// Check if a step exists.
    pub fn contains(&self, id: &str) -> bool {
        self.steps.contains_key(id)
    }

    /// Iterate over the steps in authoring order.
    pub fn iter(&self) -> impl Iterator<Item = (&StepId, &Step)> {
        self.steps.iter()
    }

    /// Ids that were inserted more than once.
    pub fn duplicates(&self) -> &[StepId] {
        &self.duplicates
    }

    /// Get the number of distinct steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if there are no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Take the steps out of the table, dropping the duplicate record.
    pub fn into_steps(self) -> IndexMap<StepId, Step> {
        self.steps
    }
}

impl FromIterator<(StepId, Step)> for StepTable {
    fn from_iter<T: IntoIterator<Item = (StepId, Step)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (id, step) in iter {
            table.insert(id, step);
        }
        table
    }
}

impl Serialize for StepTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.steps.len()))?;
        for (id, step) in &self.steps {
            map.serialize_entry(id, step)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StepTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = StepTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of step ids to steps")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<StepTable, A::Error> {
                let mut table = StepTable::new();
                while let Some((id, step)) = access.next_entry::<StepId, Step>()? {
                    table.insert(id, step);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}
