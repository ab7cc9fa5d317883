//! Severity resolution: reducing many check results to one output.
//!
//! Two strategies exist in the evaluator family and both are supported.
//! Structural reduction takes the maximum severity over the
//! `RED > YELLOW > GREEN > NA` chain and is preferred for every new
//! check type. The textual strategy classifies from justification text
//! with a deliberately coarse substring match; it is preserved verbatim
//! for compatibility with the work-item evaluators and must not be
//! extended.

use crate::types::{CheckResult, Output, Severity};

/// Fixed reason phrases used by the textual strategy.
pub const ALL_VALID: &str = "All work items are valid";
pub const SOME_INVALID: &str = "Some work items are invalid";

/// Structural reduction: maximum severity over the reduction chain
/// from each result's status metadata. No results reduce to `NA`.
///
/// The fold is idempotent under duplication, which is what keeps
/// exhaustive mode from changing the aggregate status.
pub fn reduce_structural(results: &[CheckResult]) -> Output {
    let status = results
        .iter()
        .filter_map(|r| r.metadata.map(|m| m.status))
        .filter(|s| s.rank().is_some())
        .max_by_key(|s| s.rank())
        .unwrap_or(Severity::Na);

    Output {
        status,
        reason: joined_reason(results),
    }
}

/// Heuristic textual reduction: `RED` iff the concatenated reason text
/// contains `"invalid"` or `"no "` (case-sensitive), else `GREEN`.
pub fn reduce_textual(results: &[CheckResult]) -> Output {
    let joined = joined_reason(results);
    let invalid = joined.contains("invalid") || joined.contains("no ");
    Output {
        status: if invalid {
            Severity::Red
        } else {
            Severity::Green
        },
        reason: if invalid { SOME_INVALID } else { ALL_VALID }.to_string(),
    }
}

fn joined_reason(results: &[CheckResult]) -> String {
    if results.is_empty() {
        return "No checks were evaluated".to_string();
    }
    results
        .iter()
        .map(|r| r.justification.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
