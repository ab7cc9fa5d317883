//! Evaluator run boundary: file loading, engine invocation, and the
//! graceful-failure contract.
//!
//! Every run function returns `Result<Evaluation, RunError>`; `main`
//! converts a domain error into the terminal
//! `{"status":"FAILED","reason":...}` line and exits 0, because the
//! orchestrator treats FAILED the same as any other terminal status.
//! Only unclassified errors (I/O on the output stream itself) escape
//! and terminate the process abnormally.

use std::fs;
use std::path::Path;

use gatecheck_config::{parse_config, CheckConfig, ConfigError, DEFAULT_CYCLE_IN_DAYS};
use gatecheck_engine::{EvalError, Evaluation};
use time::OffsetDateTime;

/// Domain errors of one evaluator run. All of these convert into the
/// FAILED output contract.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("File {path} does not exist, no data can be evaluated")]
    MissingFile { path: String },

    #[error("File {path} could not be read: {message}")]
    UnreadableFile { path: String, message: String },

    #[error("File {path} could not be parsed: {message}")]
    UnparsableFile { path: String, message: String },

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Eval(#[from] EvalError),
}

/// Load and parse a JSON file, mapping each failure mode to its
/// designed message.
pub fn load_json(path: &Path) -> Result<serde_json::Value, RunError> {
    if !path.exists() {
        return Err(RunError::MissingFile {
            path: path.display().to_string(),
        });
    }
    let text = fs::read_to_string(path).map_err(|e| RunError::UnreadableFile {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&text).map_err(|e| RunError::UnparsableFile {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn load_config(path: &Path) -> Result<CheckConfig, RunError> {
    let value = load_json(path)?;
    Ok(parse_config(&value)?)
}

/// The JSON-document evaluator: structural severity reduction.
pub fn run_data(records_path: &Path, config_path: &Path) -> Result<Evaluation, RunError> {
    let records = load_json(records_path)?;
    let config = load_config(config_path)?;
    Ok(gatecheck_engine::evaluate(&records, &config)?)
}

/// The work-item evaluator: heuristic textual severity reduction with
/// fixed reason phrases.
pub fn run_issues(records_path: &Path, config_path: &Path) -> Result<Evaluation, RunError> {
    let records = load_json(records_path)?;
    let config = load_config(config_path)?;
    Ok(gatecheck_engine::evaluate_work_items(&records, &config)?)
}

/// The manual-answer evaluator. `now` is read once by the caller and
/// held constant for the run.
///
/// The reminder window comes from the flag when given, else from the
/// configuration's `cycleInDays`, else the built-in default.
pub fn run_answers(
    answers_path: &Path,
    config_path: Option<&Path>,
    cycle_override: Option<u32>,
    now: OffsetDateTime,
) -> Result<Evaluation, RunError> {
    let answers = load_json(answers_path)?;
    let cycle_in_days = match cycle_override {
        Some(days) => days,
        None => match config_path {
            Some(path) => load_config(path)?.cycle_in_days,
            None => DEFAULT_CYCLE_IN_DAYS,
        },
    };
    Ok(gatecheck_engine::evaluate_answers(
        &answers,
        cycle_in_days,
        now,
    )?)
}
