use branching_survey::{
    Answer, Choice, NextRule, PromptText, Question, Selection, Session, SessionOutcome, Step,
    StepGraph, SurveyDefinition, ValidationError, Validator, Violation,
};
use proptest::prelude::*;

/// Shape of a generated step. Targets are indices; an index past the end is a dangling reference.
#[derive(Debug, Clone)]
enum Node {
    End,
    Text(usize),
    Choice(usize, usize),
}

fn id(index: usize) -> String {
    format!("s{index}")
}

fn definition(nodes: &[Node]) -> SurveyDefinition {
    let mut builder = SurveyDefinition::builder().entry(id(0));
    for (index, node) in nodes.iter().enumerate() {
        let step_id = id(index);
        let step = match *node {
            Node::End => Step::end(PromptText::english("Done")),
            Node::Text(next) => Step::question(
                Question::text(PromptText::english("Why?"), None),
                NextRule::to(id(next)),
            ),
            Node::Choice(a, b) => Step::question(
                Question::single_choice(
                    PromptText::english("Which one?"),
                    true,
                    vec![Choice::plain("a"), Choice::plain("b")],
                ),
                NextRule::conditional(vec![
                    Selection::new(step_id.as_str(), "a", id(a)),
                    Selection::new(step_id.as_str(), "b", id(b)),
                ]),
            ),
        };
        builder = builder.step(step_id, step);
    }
    builder.build()
}

fn node(targets: std::ops::Range<usize>) -> impl Strategy<Value = Node> {
    prop_oneof![
        Just(Node::End),
        targets.clone().prop_map(Node::Text),
        (targets.clone(), targets).prop_map(|(a, b)| Node::Choice(a, b)),
    ]
}

/// Any wiring, including self-loops, cycles and dangling targets.
fn arbitrary_graph() -> impl Strategy<Value = Vec<Node>> {
    (1..10usize).prop_flat_map(|n| proptest::collection::vec(node(0..n + 1), n))
}

/// Edges only point forward and the last step is an end screen.
fn forward_graph() -> impl Strategy<Value = Vec<Node>> {
    (2..12usize).prop_flat_map(|n| {
        proptest::collection::vec((0..3u8, any::<usize>(), any::<usize>()), n - 1).prop_map(
            move |raw| {
                let mut nodes: Vec<Node> = raw
                    .into_iter()
                    .enumerate()
                    .map(|(i, (kind, x, y))| {
                        let span = n - 1 - i;
                        let a = i + 1 + x % span;
                        let b = i + 1 + y % span;
                        match kind {
                            0 => Node::End,
                            1 => Node::Text(a),
                            _ => Node::Choice(a, b),
                        }
                    })
                    .collect();
                nodes.push(Node::End);
                nodes
            },
        )
    })
}

/// Answer every question validly until the session completes; returns the number of submits.
fn walk(graph: &StepGraph, picks: &[bool]) -> Result<usize, TestCaseError> {
    let mut session = Session::new(graph);
    let mut picks = picks.iter().cycle();
    let mut submits = 0;

    while let SessionOutcome::Question { question, .. } = session.view().unwrap() {
        prop_assert!(submits < graph.len(), "traversal did not terminate");
        let answer = if question.as_choice().is_some() {
            match picks.next() {
                Some(false) => Answer::choice("b"),
                _ => Answer::choice("a"),
            }
        } else {
            Answer::text("because")
        };
        session.submit(answer).unwrap();
        submits += 1;
    }

    prop_assert!(session.is_completed());
    prop_assert_eq!(session.history().len(), submits);
    Ok(submits)
}

proptest! {
    #[test]
    fn prop_loaded_graphs_always_terminate(
        nodes in arbitrary_graph(),
        picks in proptest::collection::vec(any::<bool>(), 0..10)
    ) {
        match StepGraph::load(definition(&nodes)) {
            Ok(graph) => {
                walk(&graph, &picks)?;
            }
            Err(err) => {
                // The generator only ever produces these two kinds of defects
                prop_assert!(!err.violations().is_empty());
                for violation in err.violations() {
                    prop_assert!(
                        matches!(
                            violation,
                            Violation::DanglingReference { .. } | Violation::Cycle { .. }
                        ),
                        "unexpected violation: {}",
                        violation
                    );
                }
            }
        }
    }

    #[test]
    fn prop_forward_graphs_load(
        nodes in forward_graph(),
        picks in proptest::collection::vec(any::<bool>(), 0..10)
    ) {
        let graph = StepGraph::load(definition(&nodes))
            .map_err(|err| TestCaseError::fail(err.to_string()))?;

        let submits = walk(&graph, &picks)?;
        prop_assert!(submits < nodes.len());

        let reloaded = StepGraph::from_json(&graph.to_json().unwrap()).unwrap();
        prop_assert_eq!(reloaded, graph);
    }

    #[test]
    fn prop_text_length_counts_characters(text in "\\PC{0,12}", min in 0..8usize) {
        let question = Question::text(PromptText::english("Say something"), Some(min));
        let actual = text.chars().count();

        match Validator::new().validate(&question, Answer::text(text.clone())) {
            Ok(answer) => {
                prop_assert!(actual >= min);
                prop_assert_eq!(answer, Answer::Text(text));
            }
            Err(err) => {
                prop_assert!(actual < min);
                prop_assert_eq!(err, ValidationError::TextTooShort { min, actual });
            }
        }
    }
}

#[test]
fn test_self_loop_is_a_cycle() {
    let err = StepGraph::load(definition(&[Node::Text(0)])).unwrap_err();
    assert_eq!(
        err.violations(),
        &[Violation::Cycle {
            path: vec!["s0".into(), "s0".into()],
        }]
    );
}

#[test]
fn test_cycle_behind_a_branch_is_found() {
    let nodes = [Node::Choice(1, 2), Node::End, Node::Text(3), Node::Text(2)];
    let err = StepGraph::load(definition(&nodes)).unwrap_err();
    assert_eq!(
        err.violations(),
        &[Violation::Cycle {
            path: vec!["s2".into(), "s3".into(), "s2".into()],
        }]
    );
}
