use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, warn};

use crate::{NextRule, QuestionStep, Step, StepId, SurveyDefinition};

/// A structural problem found while loading a survey definition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("Survey has no steps")]
    NoSteps,

    #[error("Step id '{0}' is defined more than once")]
    DuplicateStepId(StepId),

    #[error("Entry step '{0}' does not exist")]
    UnknownEntry(StepId),

    #[error("Every step has an incoming edge, so the entry step must be given explicitly")]
    NoEntry,

    #[error("Several steps have no incoming edges ({}); the entry step must be given explicitly", join_ids(.candidates))]
    AmbiguousEntry { candidates: Vec<StepId> },

    #[error("Step '{step}' routes to unknown step '{target}'")]
    DanglingReference { step: StepId, target: StepId },

    #[error("Step '{step}' has display text without any locale")]
    EmptyPrompt { step: StepId },

    #[error("Choice question at step '{step}' has no options")]
    EmptyChoices { step: StepId },

    #[error("Choice question at step '{step}' declares key '{key}' more than once")]
    DuplicateChoiceKey { step: StepId, key: String },

    #[error("Step '{step}' branches on its answer but is not a choice question")]
    ConditionalOnNonChoice { step: StepId },

    #[error("Step '{step}' has a conditional rule without selections")]
    EmptySelections { step: StepId },

    #[error("Selection at step '{step}' branches on step '{branches_on}' instead of its own answer")]
    ForeignSelectionSource { step: StepId, branches_on: StepId },

    #[error("Selection at step '{step}' matches '{key}', which is not one of its choices")]
    UnknownMatchKey { step: StepId, key: String },

    #[error("Choice '{key}' at step '{step}' is not covered by any selection")]
    UncoveredChoiceKey { step: StepId, key: String },

    #[error("Optional question at step '{step}' branches on its answer but has no fallback")]
    MissingFallback { step: StepId },

    #[error("Steps form a cycle: {}", join_path(.path))]
    Cycle { path: Vec<StepId> },
}

fn join_ids(ids: &[StepId]) -> String {
    ids.iter().map(StepId::as_str).collect::<Vec<_>>().join(", ")
}

fn join_path(ids: &[StepId]) -> String {
    ids.iter().map(StepId::as_str).collect::<Vec<_>>().join(" -> ")
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Every structural violation of a rejected survey definition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid survey graph: {}", join_violations(.violations))]
pub struct GraphError {
    violations: Vec<Violation>,
}

impl GraphError {
    /// Get the violations, in the order they were found.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Check if a specific violation was reported.
    pub fn contains(&self, violation: &Violation) -> bool {
        self.violations.contains(violation)
    }
}

/// Error type for loading a survey from JSON.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The JSON could not be parsed into a survey definition.
    #[error("Malformed survey definition: {0}")]
    Parse(#[from] serde_json::Error),

    /// The definition parsed, but violates structural invariants.
    #[error(transparent)]
    Invalid(#[from] GraphError),
}

/// A checked, immutable survey graph.
///
/// The only way to obtain one is [`StepGraph::load`], so every step graph satisfies:
/// all references resolve, no cycle is reachable from the entry, and every choice key of
/// a branching question has a route. Sessions borrow the graph; it can be shared freely
/// between threads.
#[derive(Debug, Clone, PartialEq)]
pub struct StepGraph {
    entry: StepId,
    steps: IndexMap<StepId, Step>,
}

impl StepGraph {
    /// Check a definition and turn it into a step graph.
    ///
    /// All violations are collected and reported together.
    pub fn load(definition: SurveyDefinition) -> Result<Self, GraphError> {
        let mut violations: Vec<Violation> = definition
            .steps
            .duplicates()
            .iter()
            .cloned()
            .map(Violation::DuplicateStepId)
            .collect();

        let SurveyDefinition { entry, steps } = definition;
        let steps = steps.into_steps();
        if steps.is_empty() {
            violations.push(Violation::NoSteps);
        }

        for (id, step) in &steps {
            check_step(id, step, &steps, &mut violations);
        }

        let entry = resolve_entry(entry, &steps, &mut violations);
        if let Some(entry) = &entry {
            let reachable = check_cycles(entry, &steps, &mut violations);
            for id in steps.keys().filter(|id| !reachable.contains(id)) {
                warn!(step = %id, "step is unreachable from the entry step");
            }
        }

        match entry {
            Some(entry) if violations.is_empty() => {
                debug!(entry = %entry, steps = steps.len(), "loaded survey graph");
                Ok(Self { entry, steps })
            }
            _ => {
                warn!(violations = violations.len(), "rejected survey graph");
                Err(GraphError { violations })
            }
        }
    }

    /// Parse a survey definition from JSON and load it.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let definition: SurveyDefinition = serde_json::from_str(json)?;
        Ok(Self::load(definition)?)
    }

    /// The step every session starts at.
    pub fn entry(&self) -> &StepId {
        &self.entry
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

    /// Get the number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// A loaded graph always has at least its entry step.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Convert back into an (explicit-entry) definition.
    pub fn to_definition(&self) -> SurveyDefinition {
        SurveyDefinition {
            entry: Some(self.entry.clone()),
            steps: self
                .steps
                .iter()
                .map(|(id, step)| (id.clone(), step.clone()))
                .collect(),
        }
    }

    /// Serialize the graph as a JSON survey definition.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl TryFrom<SurveyDefinition> for StepGraph {
    type Error = GraphError;

    fn try_from(definition: SurveyDefinition) -> Result<Self, Self::Error> {
        Self::load(definition)
    }
}

impl Serialize for StepGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_definition().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StepGraph {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let definition = SurveyDefinition::deserialize(deserializer)?;
        Self::load(definition).map_err(serde::de::Error::custom)
    }
}

fn check_step(
    id: &StepId,
    step: &Step,
    steps: &IndexMap<StepId, Step>,
    violations: &mut Vec<Violation>,
) {
    for target in step.targets() {
        if !steps.contains_key(target) {
            violations.push(Violation::DanglingReference {
                step: id.clone(),
                target: target.clone(),
            });
        }
    }

    match step {
        Step::EndScreen(screen) => {
            if screen.display.is_empty() {
                violations.push(Violation::EmptyPrompt { step: id.clone() });
            }
        }
        Step::Question(step) => check_question_step(id, step, violations),
    }
}

fn check_question_step(id: &StepId, step: &QuestionStep, violations: &mut Vec<Violation>) {
    let question = &step.question;
    let choice = question.as_choice();

    let empty_display = choice.is_some_and(|c| c.choices.iter().any(|o| o.display.is_empty()));
    if question.prompt().is_empty() || empty_display {
        violations.push(Violation::EmptyPrompt { step: id.clone() });
    }

    if let Some(choice) = choice {
        if choice.choices.is_empty() {
            violations.push(Violation::EmptyChoices { step: id.clone() });
        }
        let mut seen = HashSet::new();
        for key in choice.keys() {
            if !seen.insert(key) {
                violations.push(Violation::DuplicateChoiceKey {
                    step: id.clone(),
                    key: key.to_string(),
                });
            }
        }
    }

    let NextRule::Conditional(rule) = &step.next else {
        return;
    };
    let Some(choice) = choice else {
        violations.push(Violation::ConditionalOnNonChoice { step: id.clone() });
        return;
    };

    if rule.selections.is_empty() {
        violations.push(Violation::EmptySelections { step: id.clone() });
    }
    for selection in &rule.selections {
        if selection.source != *id {
            violations.push(Violation::ForeignSelectionSource {
                step: id.clone(),
                branches_on: selection.source.clone(),
            });
        }
        if !choice.has_key(&selection.answer) {
            violations.push(Violation::UnknownMatchKey {
                step: id.clone(),
                key: selection.answer.clone(),
            });
        }
    }
    for key in choice.keys() {
        if !rule.selections.iter().any(|selection| selection.answer == key) {
            violations.push(Violation::UncoveredChoiceKey {
                step: id.clone(),
                key: key.to_string(),
            });
        }
    }
    if !choice.required && rule.fallback.is_none() {
        violations.push(Violation::MissingFallback { step: id.clone() });
    }
}

/// Use the given entry, or find the one step nothing routes to.
fn resolve_entry(
    entry: Option<StepId>,
    steps: &IndexMap<StepId, Step>,
    violations: &mut Vec<Violation>,
) -> Option<StepId> {
    if let Some(entry) = entry {
        if steps.contains_key(&entry) {
            return Some(entry);
        }
        violations.push(Violation::UnknownEntry(entry));
        return None;
    }
    if steps.is_empty() {
        return None;
    }

    let targeted: HashSet<&StepId> = steps.values().flat_map(Step::targets).collect();
    let mut candidates: Vec<StepId> = steps
        .keys()
        .filter(|id| !targeted.contains(id))
        .cloned()
        .collect();

    match candidates.len() {
        0 => {
            violations.push(Violation::NoEntry);
            None
        }
        1 => candidates.pop(),
        _ => {
            violations.push(Violation::AmbiguousEntry { candidates });
            None
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    OnPath,
    Done,
}

/// Depth-first search from the entry, reporting every cycle it closes.
/// Returns the set of reachable steps.
fn check_cycles<'a>(
    entry: &'a StepId,
    steps: &'a IndexMap<StepId, Step>,
    violations: &mut Vec<Violation>,
) -> HashSet<&'a StepId> {
    let targets_of = |id: &StepId| -> std::vec::IntoIter<&'a StepId> {
        steps
            .get(id)
            .map(|step| step.targets().collect::<Vec<_>>())
            .unwrap_or_default()
            .into_iter()
    };

    let mut marks: HashMap<&'a StepId, Mark> = HashMap::new();
    let mut stack = vec![(entry, targets_of(entry))];
    marks.insert(entry, Mark::OnPath);

    while let Some((_, children)) = stack.last_mut() {
        let Some(child) = children.next() else {
            if let Some((done, _)) = stack.pop() {
                marks.insert(done, Mark::Done);
            }
            continue;
        };
        match marks.get(child) {
            Some(Mark::OnPath) => {
                let start = stack.iter().position(|(id, _)| *id == child).unwrap_or(0);
                let path = stack[start..]
                    .iter()
                    .map(|(id, _)| (*id).clone())
                    .chain(std::iter::once(child.clone()))
                    .collect();
                violations.push(Violation::Cycle { path });
            }
            Some(Mark::Done) => {}
            None if steps.contains_key(child) => {
                marks.insert(child, Mark::OnPath);
                stack.push((child, targets_of(child)));
            }
            None => {}
        }
    }

    marks.into_keys().collect()
}
