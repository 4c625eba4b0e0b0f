use crate::{Answer, ConditionalRule, NextRule, ResolutionError, Step, StepGraph, StepId};

/// Where a traversal goes after a step has been answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextTarget {
    /// Continue by asking the question at this step.
    Step(StepId),

    /// Continue at this end screen; the traversal is complete.
    End(StepId),

    /// The step has no question and no outgoing edge.
    Terminal,
}

/// Compute the step following `step` (identified by `id`) for an accepted answer.
///
/// Direct rules ignore the answer. Conditional rules take the first selection that
/// matches: for a single choice the key must be equal, for a multi-select the key must
/// be among the selected ones. An absent answer takes the rule's fallback.
pub fn resolve(
    graph: &StepGraph,
    id: &StepId,
    step: &Step,
    answer: &Answer,
) -> Result<NextTarget, ResolutionError> {
    let Step::Question(question) = step else {
        return Ok(NextTarget::Terminal);
    };

    let target = match &question.next {
        NextRule::Direct(target) => target,
        NextRule::Conditional(rule) => select(id, rule, answer)?,
    };

    match graph.get(target.as_str()) {
        Some(Step::Question(_)) => Ok(NextTarget::Step(target.clone())),
        Some(Step::EndScreen(_)) => Ok(NextTarget::End(target.clone())),
        None => Err(ResolutionError::DanglingStepReference {
            step: id.clone(),
            target: target.clone(),
        }),
    }
}

fn select<'r>(
    id: &StepId,
    rule: &'r ConditionalRule,
    answer: &Answer,
) -> Result<&'r StepId, ResolutionError> {
    let matched = match answer {
        Answer::None => rule.fallback.as_ref(),
        Answer::Choice(key) => rule
            .selections
            .iter()
            .find(|selection| selection.answer == *key)
            .map(|selection| &selection.next),
        Answer::Choices(keys) => rule
            .selections
            .iter()
            .find(|selection| keys.contains(&selection.answer))
            .map(|selection| &selection.next),
        Answer::Text(_) | Answer::Date(_) => None,
    };

    matched.ok_or_else(|| ResolutionError::UnhandledAnswer {
        step: id.clone(),
        answer: describe(answer),
    })
}

fn describe(answer: &Answer) -> String {
    match answer {
        Answer::None => "<none>".to_string(),
        Answer::Choice(key) => format!("'{key}'"),
        Answer::Choices(keys) => format!("{keys:?}"),
        Answer::Text(text) => format!("{text:?}"),
        Answer::Date(date) => date.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Choice, PromptText, Question, Selection, SurveyDefinition};

    fn graph() -> StepGraph {
        let pets = Step::question(
            Question::multi_choice(
                PromptText::english("Which pets?"),
                false,
                vec![
                    Choice::plain("cat"),
                    Choice::plain("dog"),
                    Choice::plain("fish"),
                ],
            ),
            ConditionalRule {
                selections: vec![
                    Selection::new("pets", "dog", "walks"),
                    Selection::new("pets", "cat", "litter"),
                    Selection::new("pets", "fish", "end"),
                ],
                fallback: None,
            }
            .with_fallback("end"),
        );
        let definition = SurveyDefinition::builder()
            .step("pets", pets)
            .step(
                "walks",
                Step::question(Question::text(PromptText::english("How often?"), None), "end"),
            )
            .step(
                "litter",
                Step::question(Question::text(PromptText::english("Which?"), None), "end"),
            )
            .step("end", Step::end(PromptText::english("Thanks")))
            .build();
        StepGraph::load(definition).unwrap()
    }

    fn resolve_at(graph: &StepGraph, id: &str, answer: Answer) -> Result<NextTarget, ResolutionError> {
        let id = StepId::new(id);
        let step = graph.get(id.as_str()).unwrap();
        resolve(graph, &id, step, &answer)
    }

    #[test]
    fn direct_rule_ignores_answer() {
        let graph = graph();
        assert_eq!(
            resolve_at(&graph, "walks", Answer::text("daily")),
            Ok(NextTarget::End("end".into()))
        );
    }

    #[test]
    fn multi_select_uses_first_matching_selection() {
        let graph = graph();
        assert_eq!(
            resolve_at(&graph, "pets", Answer::choices(["cat", "dog"])),
            Ok(NextTarget::Step("walks".into()))
        );
        assert_eq!(
            resolve_at(&graph, "pets", Answer::choices(["fish", "cat"])),
            Ok(NextTarget::Step("litter".into()))
        );
    }

    #[test]
    fn absent_answer_takes_fallback() {
        let graph = graph();
        assert_eq!(
            resolve_at(&graph, "pets", Answer::None),
            Ok(NextTarget::End("end".into()))
        );
    }

    #[test]
    fn end_screen_is_terminal() {
        let graph = graph();
        assert_eq!(resolve_at(&graph, "end", Answer::None), Ok(NextTarget::Terminal));
    }

    #[test]
    fn unmatched_answer_is_unhandled() {
        let graph = graph();
        assert_eq!(
            resolve_at(&graph, "pets", Answer::choices(["hamster"])),
            Err(ResolutionError::UnhandledAnswer {
                step: "pets".into(),
                answer: "[\"hamster\"]".into(),
            })
        );
    }

    #[test]
    fn foreign_step_with_dangling_target() {
        let graph = graph();
        let stray = Step::question(Question::text(PromptText::english("?"), None), "gone");
        assert_eq!(
            resolve(&graph, &"stray".into(), &stray, &Answer::text("x")),
            Err(ResolutionError::DanglingStepReference {
                step: "stray".into(),
                target: "gone".into(),
            })
        );
    }
}
