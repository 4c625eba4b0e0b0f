use std::{
    collections::{HashMap, VecDeque},
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use branching_survey::{
    Answer, FixedClock, PromptText, Question, Respondent, Session, StepGraph,
    StepId, ValidationError, coerce,
};
use chrono::NaiveDate;
use clap::Parser;
use example_surveys::workplace_feedback;
use serde_json::Value;
use tracing::{info, warn};

/// Run a branching survey with answers read from a JSON file.
#[derive(Parser, Debug)]
#[command(name = "survey-demo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Survey definition (JSON). Defaults to the built-in workplace feedback survey
    #[arg(long, env = "SURVEY_FILE")]
    survey: Option<PathBuf>,

    /// Answers: a JSON object mapping step ids to a raw answer, or to
    /// `{"attempts": [...]}` when earlier attempts are expected to be rejected
    #[arg(long)]
    answers: PathBuf,

    /// Evaluate date questions as if today were this date (YYYY-MM-DD)
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Locale used to print prompts
    #[arg(long, default_value = PromptText::DEFAULT_LOCALE)]
    locale: String,
}

/// Answers each step from the attempts listed in the answers file.
struct FileRespondent {
    attempts: HashMap<StepId, VecDeque<Value>>,
    locale: String,
}

impl FileRespondent {
    fn load(path: &Path, locale: String) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read answers from {}", path.display()))?;
        let raw: HashMap<StepId, Value> =
            serde_json::from_str(&text).context("Answers must be a JSON object")?;

        let attempts = raw
            .into_iter()
            .map(|(step, value)| match value {
                Value::Object(mut object) if object.contains_key("attempts") => {
                    match object.remove("attempts") {
                        Some(Value::Array(items)) => Ok((step, items.into())),
                        _ => Err(anyhow!("'attempts' for step '{step}' must be a list")),
                    }
                }
                other => Ok((step, VecDeque::from([other]))),
            })
            .collect::<Result<_>>()?;
        Ok(Self { attempts, locale })
    }
}

impl Respondent for FileRespondent {
    type Error = anyhow::Error;

    fn answer(&mut self, step: &StepId, question: &Question) -> Result<Answer> {
        let prompt = question.prompt().localized(&self.locale).unwrap_or_default();
        let raw = self
            .attempts
            .get_mut(step)
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| anyhow!("No answer left for step '{step}'"))?;
        println!("? {prompt}\n> {raw}");
        Ok(coerce(question.kind(), &raw)?)
    }

    fn rejected(&mut self, step: &StepId, error: &ValidationError) {
        warn!(step = %step, "{error}");
        println!("! {error}");
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let graph = match &cli.survey {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read survey from {}", path.display()))?;
            StepGraph::from_json(&json)?
        }
        None => workplace_feedback::graph()?,
    };
    info!(entry = %graph.entry(), steps = graph.len(), "survey loaded");

    let today = cli
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let mut session = Session::with_clock(&graph, FixedClock(today));
    let mut respondent = FileRespondent::load(&cli.answers, cli.locale.clone())?;
    let screen = session.run(&mut respondent)?;
    info!(answers = session.history().len(), "survey completed");

    println!("{}", screen.display.localized(&cli.locale).unwrap_or_default());
    println!("{}", serde_json::to_string_pretty(session.history())?);
    Ok(())
}
