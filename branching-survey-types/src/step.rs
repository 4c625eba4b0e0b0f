use serde::{Deserialize, Serialize};

use crate::{PromptText, Question, StepId};

/// A node of the survey graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Ask a question, then route on.
    Question(QuestionStep),

    /// Terminal screen; the survey is complete.
    EndScreen(EndScreen),
}

impl Step {
    /// Create a question step.
    pub fn question(question: Question, next: impl Into<NextRule>) -> Self {
        Self::Question(QuestionStep {
            question,
            next: next.into(),
        })
    }

    /// Create an end screen.
    pub fn end(display: PromptText) -> Self {
        Self::EndScreen(EndScreen { display })
    }

    /// Get the question asked at this step, if any.
    pub fn as_question(&self) -> Option<&QuestionStep> {
        match self {
            Self::Question(step) => Some(step),
            Self::EndScreen(_) => None,
        }
    }

    /// Get the end screen, if this is one.
    pub fn as_end_screen(&self) -> Option<&EndScreen> {
        match self {
            Self::EndScreen(screen) => Some(screen),
            Self::Question(_) => None,
        }
    }

    /// Check if this step ends the survey.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::EndScreen(_))
    }

    /// Iterate over every step id this step may route to.
    pub fn targets(&self) -> Box<dyn Iterator<Item = &StepId> + '_> {
        match self {
            Self::Question(step) => Box::new(step.next.targets()),
            Self::EndScreen(_) => Box::new(std::iter::empty()),
        }
    }
}

/// A question together with its routing rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionStep {
    #[serde(flatten)]
    pub question: Question,
    pub next: NextRule,
}

/// A terminal screen. No question, no outgoing edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndScreen {
    pub display: PromptText,
}

/// How the next step is chosen once a question has been answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NextRule {
    /// Always go to this step.
    Direct(StepId),

    /// Branch on the answer just given.
    Conditional(ConditionalRule),
}

impl NextRule {
    /// Create a direct rule.
    pub fn to(target: impl Into<StepId>) -> Self {
        Self::Direct(target.into())
    }

    /// Create a conditional rule.
    pub fn conditional(selections: Vec<Selection>) -> Self {
        Self::Conditional(ConditionalRule {
            selections,
            fallback: None,
        })
    }

    /// Iterate over every step id this rule may route to.
    pub fn targets(&self) -> impl Iterator<Item = &StepId> {
        let (direct, conditional) = match self {
            Self::Direct(target) => (Some(target), None),
            Self::Conditional(rule) => (None, Some(rule)),
        };
        direct.into_iter().chain(
            conditional
                .into_iter()
                .flat_map(|rule| rule.selections.iter().map(|s| &s.next).chain(&rule.fallback)),
        )
    }
}

impl From<StepId> for NextRule {
    fn from(target: StepId) -> Self {
        Self::Direct(target)
    }
}

impl From<&str> for NextRule {
    fn from(target: &str) -> Self {
        Self::Direct(target.into())
    }
}

impl From<ConditionalRule> for NextRule {
    fn from(rule: ConditionalRule) -> Self {
        Self::Conditional(rule)
    }
}

/// An ordered list of answer-matched branches. The first matching selection wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalRule {
    pub selections: Vec<Selection>,

    /// Where to go when an optional question is left unanswered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<StepId>,
}

impl ConditionalRule {
    /// Set the route taken when no answer is given.
    pub fn with_fallback(mut self, fallback: impl Into<StepId>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }
}

/// One branch of a conditional rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// The step whose answer is inspected. Always the step owning the rule.
    #[serde(rename = "name")]
    pub source: StepId,

    /// The choice key this branch matches.
    pub answer: String,

    /// Where to go when the branch matches.
    pub next: StepId,
}

impl Selection {
    /// Create a new selection.
    pub fn new(source: impl Into<StepId>, answer: impl Into<String>, next: impl Into<StepId>) -> Self {
        Self {
            source: source.into(),
            answer: answer.into(),
            next: next.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn targets_include_fallback() {
        let rule = NextRule::Conditional(
            ConditionalRule {
                selections: vec![
                    Selection::new("q", "a", "x"),
                    Selection::new("q", "b", "y"),
                ],
                fallback: None,
            }
            .with_fallback("z"),
        );
        let targets: Vec<_> = rule.targets().map(StepId::as_str).collect();
        assert_eq!(targets, vec!["x", "y", "z"]);
    }

    #[test]
    fn end_screen_has_no_targets() {
        let step = Step::end(PromptText::english("Thanks"));
        assert!(step.is_terminal());
        assert_eq!(step.targets().count(), 0);
    }

    #[test]
    fn next_rule_deserializes_both_forms() {
        let direct: NextRule = serde_json::from_str("\"what_else\"").unwrap();
        assert_eq!(direct, NextRule::to("what_else"));

        let conditional: NextRule = serde_json::from_value(serde_json::json!({
            "selections": [
                { "name": "is_work_difficult", "answer": "Yes", "next": "what_is_difficult" },
            ]
        }))
        .unwrap();
        assert_eq!(
            conditional,
            NextRule::conditional(vec![Selection::new(
                "is_work_difficult",
                "Yes",
                "what_is_difficult"
            )])
        );
    }

    #[test]
    fn question_step_round_trips() {
        let step = Step::question(
            Question::text(PromptText::english("What is your name?"), Some(1)),
            "contact_method",
        );
        let json = serde_json::to_string(&step).unwrap();
        let back: Step = serde_json::from_str(&json).unwrap();
        assert_eq!(back, step);
    }
}
