//! Workplace feedback: suggestions and problems, followed by contact details.

use branching_survey::{
    Choice, DateRange, NextRule, PromptText, Question, Selection, Step, StepGraph,
    SurveyDefinition,
};

/// The first step of the survey.
pub const ENTRY: &str = "suggestion_or_problem";

fn choice(key: &str, display: &str) -> Choice {
    Choice::new(key, PromptText::english(display))
}

/// Route every declared key of a single-choice step to its target.
fn branch(step: &str, routes: &[(&str, &str)]) -> NextRule {
    NextRule::conditional(
        routes
            .iter()
            .map(|(answer, next)| Selection::new(step, *answer, *next))
            .collect(),
    )
}

pub fn suggestion_or_problem() -> Question {
    Question::single_choice(
        PromptText::english(
            "Would you like to make a suggestion for improvements, or tell us about a problem?",
        ),
        true,
        vec![
            choice("problem", "Tell us about a problem"),
            choice("suggestion", "Make a suggestion"),
        ],
    )
}

pub fn make_suggestion() -> Question {
    Question::text(PromptText::english("What is your suggestion?"), Some(5))
}

pub fn is_work_difficult() -> Question {
    Question::single_choice(
        PromptText::english("Is this making work difficult for you?"),
        true,
        vec![choice("Yes", "Yes"), choice("No", "No")],
    )
}

pub fn what_is_difficult() -> Question {
    Question::text(
        PromptText::english("What about this is making work difficult for you?"),
        Some(5),
    )
}

pub fn what_is_the_problem() -> Question {
    Question::single_choice(
        PromptText::english("Is the problem with one of the following:"),
        true,
        vec![
            choice("Co-worker", "Co-Worker"),
            choice("Environment", "Environment"),
            choice("Type", "Type of Work"),
            choice("Pay", "Pay"),
            choice("Schedule", "Schedule"),
        ],
    )
}

pub fn fix_problem() -> Question {
    Question::text(
        PromptText::english("If you could fix the problem, what would you do?"),
        Some(5),
    )
}

pub fn what_else() -> Question {
    Question::text(
        PromptText::english("Would you like to tell us anything else?"),
        Some(1),
    )
}

pub fn contact_date() -> Question {
    Question::date(
        PromptText::english(
            "If we need to contact you in the next week, what date would work best for you?",
        ),
        DateRange::TodayAndFuture,
    )
}

pub fn your_name() -> Question {
    Question::text(PromptText::english("What is your name?"), Some(1))
}

pub fn contact_method() -> Question {
    Question::single_choice(
        PromptText::english(
            "For follow-up, would you prefer to be contacted by email or phone number?",
        ),
        true,
        vec![choice("Email", "Email"), choice("Phone", "Phone")],
    )
}

pub fn email_address() -> Question {
    Question::text(PromptText::english("What is your email address?"), None)
}

pub fn phone_number() -> Question {
    Question::text(PromptText::english("What is your phone number?"), None)
}

pub fn contact_time() -> Question {
    Question::single_choice(
        PromptText::english(
            "For follow-up, when would you prefer to be contacted by email or phone number?",
        ),
        true,
        vec![
            choice("Morning", "Morning"),
            choice("Afternoon", "Afternoon"),
            choice("Early", "Early evening"),
            choice("Late", "Late evening"),
        ],
    )
}

pub fn end_screen() -> Step {
    Step::end(PromptText::english("Thank you for letting us know."))
}

/// The complete survey definition.
pub fn definition() -> SurveyDefinition {
    SurveyDefinition::builder()
        .entry(ENTRY)
        .step(
            "suggestion_or_problem",
            Step::question(
                suggestion_or_problem(),
                branch(
                    "suggestion_or_problem",
                    &[
                        ("problem", "is_work_difficult"),
                        ("suggestion", "make_suggestion"),
                    ],
                ),
            ),
        )
        .step("make_suggestion", Step::question(make_suggestion(), "what_else"))
        .step(
            "is_work_difficult",
            Step::question(
                is_work_difficult(),
                branch(
                    "is_work_difficult",
                    &[("Yes", "what_is_difficult"), ("No", "what_is_the_problem")],
                ),
            ),
        )
        .step(
            "what_is_difficult",
            Step::question(what_is_difficult(), "what_is_the_problem"),
        )
        .step(
            "what_is_the_problem",
            Step::question(what_is_the_problem(), "fix_problem"),
        )
        .step("fix_problem", Step::question(fix_problem(), "what_else"))
        .step("what_else", Step::question(what_else(), "contact_date"))
        .step("contact_date", Step::question(contact_date(), "your_name"))
        .step("your_name", Step::question(your_name(), "contact_method"))
        .step(
            "contact_method",
            Step::question(
                contact_method(),
                branch(
                    "contact_method",
                    &[("Email", "email_address"), ("Phone", "phone_number")],
                ),
            ),
        )
        .step("email_address", Step::question(email_address(), "contact_time"))
        .step("phone_number", Step::question(phone_number(), "contact_time"))
        .step("contact_time", Step::question(contact_time(), "end_step"))
        .step("end_step", end_screen())
        .build()
}

/// The survey, loaded and checked.
pub fn graph() -> Result<StepGraph, branching_survey::GraphError> {
    StepGraph::load(definition())
}
