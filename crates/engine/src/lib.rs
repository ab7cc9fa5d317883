//! gatecheck-engine: declarative compliance evaluation.
//!
//! The engine consumes an already-loaded record set (any
//! `serde_json::Value` object or array of objects) and a validated
//! [`CheckConfig`], walks each declared check over the configured field
//! paths, combines named check results under the concatenation
//! expression, resolves severities into a single terminal output, and
//! hands everything to the result protocol writer.
//!
//! The engine performs no I/O and reads no clocks: record acquisition,
//! configuration loading, and "now" are supplied by collaborators, so
//! two runs over identical inputs produce byte-identical output.

pub mod concat;
pub mod condition;
pub mod expiration;
pub mod field;
pub mod protocol;
pub mod quantifier;
pub mod severity;
pub mod types;

use std::collections::BTreeMap;

use gatecheck_config::CheckConfig;
use serde_json::Value;
use time::{Duration, OffsetDateTime};

pub use protocol::ProtocolWriter;
pub use types::{CheckResult, EvalError, Evaluation, Output, ResultMetadata, Severity};

/// Evaluate a record set against a check configuration, with
/// structural severity reduction.
///
/// This is the top-level API for the JSON-data evaluator family.
pub fn evaluate(records: &Value, config: &CheckConfig) -> Result<Evaluation, EvalError> {
    let results = run_checks(records, config)?;
    let output = severity::reduce_structural(&results);
    Ok(Evaluation { results, output })
}

/// Evaluate a record set with the heuristic textual severity reduction
/// used by the lighter-weight work-item evaluators.
///
/// Same checks, same results; only the terminal output differs: the
/// status is classified from the concatenated justification text and
/// the reason is one of two fixed phrases.
pub fn evaluate_work_items(records: &Value, config: &CheckConfig) -> Result<Evaluation, EvalError> {
    let results = run_checks(records, config)?;
    let output = severity::reduce_textual(&results);
    Ok(Evaluation { results, output })
}

/// Evaluate time-bound manual answers against a constant `now`.
///
/// Each entry is `{ "question": str, "answer"?: str, "expiry_date"?: str }`.
/// Unanswered entries are terminal: the run reports `UNANSWERED`
/// instead of reducing over the color chain.
pub fn evaluate_answers(
    answers: &Value,
    cycle_in_days: u32,
    now: OffsetDateTime,
) -> Result<Evaluation, EvalError> {
    let entries = answers.as_array().ok_or_else(|| EvalError::RecordShape {
        message: format!("expected an array of answers, got {}", kind_of(answers)),
    })?;

    let reminder = Duration::days(i64::from(cycle_in_days));
    let mut results = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let question = entry
            .get("question")
            .and_then(|v| v.as_str())
            .ok_or_else(|| EvalError::AnswerShape {
                index,
                message: "missing 'question' field".to_string(),
            })?;
        let criterion = format!("**{}**", question);

        let answered = entry
            .get("answer")
            .and_then(|v| v.as_str())
            .is_some_and(|a| !a.is_empty());
        if !answered {
            results.push(CheckResult::with_status(
                criterion,
                "Question has not been answered".to_string(),
                false,
                Severity::Unanswered,
            ));
            continue;
        }

        let expiry = match entry.get("expiry_date").and_then(|v| v.as_str()) {
            None => {
                results.push(CheckResult::with_status(
                    criterion,
                    "Answer does not expire".to_string(),
                    true,
                    Severity::Green,
                ));
                continue;
            }
            // An unparsable date fails this entry closed; the other
            // entries still report.
            Some(raw) => match expiration::parse_expiry(raw) {
                Some(ts) => ts,
                None => {
                    results.push(CheckResult::with_status(
                        criterion,
                        format!("Answer has unparsable expiry date \"{}\"", raw),
                        false,
                        Severity::Red,
                    ));
                    continue;
                }
            },
        };

        let status = expiration::classify(expiry, now, reminder);
        let date = expiry.date();
        let justification = match status {
            Severity::Red => format!("Answer expired on {}", date),
            Severity::Yellow => format!(
                "Answer expires on {} ({} days remaining)",
                date,
                (expiry - now).whole_days()
            ),
            _ => format!("Answer expires on {}", date),
        };
        results.push(CheckResult::with_status(
            criterion,
            justification,
            status == Severity::Green,
            status,
        ));
    }

    let unanswered = results
        .iter()
        .any(|r| r.metadata.map(|m| m.status) == Some(Severity::Unanswered));
    let output = if unanswered {
        Output {
            status: Severity::Unanswered,
            reason: results
                .iter()
                .map(|r| r.justification.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    } else {
        severity::reduce_structural(&results)
    };

    Ok(Evaluation { results, output })
}

fn run_checks(records: &Value, config: &CheckConfig) -> Result<Vec<CheckResult>, EvalError> {
    if !records.is_object() && !records.is_array() {
        return Err(EvalError::RecordShape {
            message: format!(
                "expected an object or an array of objects, got {}",
                kind_of(records)
            ),
        });
    }

    let mut results = Vec::new();
    let mut fulfilled_by_id: BTreeMap<String, bool> = BTreeMap::new();

    for def in &config.checks {
        let outcome = quantifier::run_check(def, records, config.search);
        fulfilled_by_id.insert(def.id.clone(), outcome.fulfilled);
        results.extend(outcome.results);
    }

    if let Some(expr) = &config.concatenation {
        results.push(concat::combine(expr, &fulfilled_by_id));
    }

    Ok(results)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ──────────────────────────────────────────────
// Integration tests
// ──────────────────────────────────────────────
