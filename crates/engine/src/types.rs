//! Result and severity types shared by every evaluator program.
//!
//! These types are DISTINCT from the configuration types: the engine
//! consumes a validated [`gatecheck_config::CheckConfig`] and produces
//! the protocol vocabulary defined here. Everything serializes with a
//! stable field order so two runs over the same inputs are
//! byte-identical.

use serde::{Deserialize, Serialize};
use std::fmt;

// ──────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────

/// Errors that can occur during evaluation.
///
/// All of these are domain errors: the process boundary converts them
/// into a terminal `FAILED` output rather than crashing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// The record set is neither an object nor an array of objects.
    RecordShape { message: String },
    /// A manual-answer entry is structurally unusable.
    AnswerShape { index: usize, message: String },
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::RecordShape { message } => {
                write!(f, "unsupported record shape: {}", message)
            }
            EvalError::AnswerShape { index, message } => {
                write!(f, "answer entry {}: {}", index, message)
            }
        }
    }
}

impl std::error::Error for EvalError {}

// ──────────────────────────────────────────────
// Severity
// ──────────────────────────────────────────────

/// Graded outcome vocabulary shared by results and the terminal output.
///
/// Only the `RED > YELLOW > GREEN > NA` chain participates in severity
/// reduction. The remaining values are terminal/structural statuses
/// produced outside normal reduction (configuration failures, missing
/// answers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Green,
    Yellow,
    Red,
    Na,
    Failed,
    Unanswered,
    Pending,
    Error,
}

impl Severity {
    /// Position in the reduction chain, or `None` for statuses that do
    /// not participate in reduction.
    pub fn rank(self) -> Option<u8> {
        match self {
            Severity::Na => Some(0),
            Severity::Green => Some(1),
            Severity::Yellow => Some(2),
            Severity::Red => Some(3),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Green => "GREEN",
            Severity::Yellow => "YELLOW",
            Severity::Red => "RED",
            Severity::Na => "NA",
            Severity::Failed => "FAILED",
            Severity::Unanswered => "UNANSWERED",
            Severity::Pending => "PENDING",
            Severity::Error => "ERROR",
        };
        f.write_str(s)
    }
}

// ──────────────────────────────────────────────
// Check results and terminal output
// ──────────────────────────────────────────────

/// Status metadata attached to a check result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultMetadata {
    pub status: Severity,
}

/// One evaluated check (or one offending element in exhaustive mode, or
/// the synthetic concatenation result). Immutable once created and
/// streamed in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Human-readable criterion text; contains the check title wrapped
    /// in `**` emphasis markers.
    pub criterion: String,
    pub justification: String,
    pub fulfilled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResultMetadata>,
}

impl CheckResult {
    pub fn new(criterion: String, justification: String, fulfilled: bool) -> CheckResult {
        let status = if fulfilled {
            Severity::Green
        } else {
            Severity::Red
        };
        CheckResult {
            criterion,
            justification,
            fulfilled,
            metadata: Some(ResultMetadata { status }),
        }
    }

    pub fn with_status(
        criterion: String,
        justification: String,
        fulfilled: bool,
        status: Severity,
    ) -> CheckResult {
        CheckResult {
            criterion,
            justification,
            fulfilled,
            metadata: Some(ResultMetadata { status }),
        }
    }
}

/// The single top-level verdict of one evaluator run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub status: Severity,
    pub reason: String,
}

impl Output {
    /// Terminal output for a domain failure. The orchestrator treats
    /// `FAILED` the same as any other terminal status, so this is a
    /// designed exit, not a crash path.
    pub fn failed(reason: impl Into<String>) -> Output {
        Output {
            status: Severity::Failed,
            reason: reason.into(),
        }
    }
}

/// Everything one evaluation run produces, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub results: Vec<CheckResult>,
    pub output: Output,
}
