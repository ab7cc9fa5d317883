//! Quantifier aggregation: lifting per-element verdicts into named
//! check results.
//!
//! Evaluation order over a collection is the collection's insertion
//! order. In fail-fast mode a check yields at most one result and the
//! first violation encountered is the one reported; exhaustive mode
//! additionally yields one result per offending element. The two modes
//! never differ in per-result semantics, only in how many results are
//! emitted.

use gatecheck_config::{CheckDefinition, ConditionKind, Quantifier, SearchMode};
use serde_json::Value;

use crate::condition::{self, Bucket, ElementVerdict};
use crate::field;
use crate::types::CheckResult;

/// Everything one check evaluation produces: the emitted results plus
/// the boolean the concatenation combinator consumes.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub fulfilled: bool,
    pub results: Vec<CheckResult>,
}

/// Evaluate one check against the record set.
pub fn run_check(def: &CheckDefinition, record: &Value, mode: SearchMode) -> CheckOutcome {
    let elements = field::resolve(record, &def.field_path).into_elements();
    let verdicts: Vec<ElementVerdict> = elements
        .iter()
        .map(|e| condition::evaluate(&def.condition, e))
        .collect();

    let (fulfilled, offenders) = fold(def.quantifier, &verdicts, mode);

    // An empty resolution only satisfies the universal quantifiers;
    // `exists` and `any` need at least one element to point at.
    if verdicts.is_empty() && !fulfilled {
        let result = CheckResult::new(
            criterion(def),
            violation_text(&def.field_path, Bucket::Missing, &[]),
            false,
        );
        return CheckOutcome {
            fulfilled: false,
            results: vec![result],
        };
    }

    if fulfilled {
        let result = CheckResult::new(criterion(def), fulfilled_text(def), true);
        return CheckOutcome {
            fulfilled: true,
            results: vec![result],
        };
    }

    // Base summary result: the first violation encountered.
    let first = &offenders[0];
    let mut results = vec![CheckResult::new(
        criterion(def),
        violation_text(&def.field_path, first.bucket, &[offender_item(first)]),
        false,
    )];

    if mode == SearchMode::Exhaustive {
        for offender in &offenders {
            results.push(CheckResult::new(
                criterion(def),
                violation_text(&def.field_path, offender.bucket, &[offender_item(offender)]),
                false,
            ));
        }
    }

    CheckOutcome {
        fulfilled: false,
        results,
    }
}

/// One reportable violation.
#[derive(Debug, Clone)]
struct Offender {
    display: String,
    label: Option<String>,
    bucket: Bucket,
}

fn fold(
    quantifier: Quantifier,
    verdicts: &[ElementVerdict],
    mode: SearchMode,
) -> (bool, Vec<Offender>) {
    match quantifier {
        Quantifier::All => {
            let offenders = scan(verdicts, mode, |v| !v.fulfilled, |v| {
                v.bucket.unwrap_or(Bucket::Actual)
            });
            (offenders.is_empty(), offenders)
        }
        // `none` inverts the predicate: elements that match the
        // condition are the offenders, reported as illegal values.
        Quantifier::None => {
            let offenders = scan(verdicts, mode, |v| v.fulfilled, |_| Bucket::Illegal);
            (offenders.is_empty(), offenders)
        }
        Quantifier::Any => {
            if verdicts.iter().any(|v| v.fulfilled) {
                (true, Vec::new())
            } else {
                // No element matched: every element is an offender.
                let offenders = scan(verdicts, mode, |_| true, |v| {
                    v.bucket.unwrap_or(Bucket::Actual)
                });
                (false, offenders)
            }
        }
    }
}

/// Walk the verdicts in collection order collecting offenders;
/// fail-fast stops the scan at the first one.
fn scan(
    verdicts: &[ElementVerdict],
    mode: SearchMode,
    offends: impl Fn(&ElementVerdict) -> bool,
    bucket: impl Fn(&ElementVerdict) -> Bucket,
) -> Vec<Offender> {
    let mut offenders = Vec::new();
    for v in verdicts {
        if offends(v) {
            offenders.push(Offender {
                display: v.display.clone(),
                label: v.label.clone(),
                bucket: bucket(v),
            });
            if mode == SearchMode::FailFast {
                break;
            }
        }
    }
    offenders
}

fn criterion(def: &CheckDefinition) -> String {
    format!("**{}**", def.title)
}

fn offender_item(offender: &Offender) -> String {
    match (&offender.label, offender.bucket) {
        // Resolved-family displays already carry the item name.
        (_, Bucket::Overdue | Bucket::UndefinedDueDate | Bucket::Unresolved) => {
            offender.display.clone()
        }
        (Some(label), _) => format!("{} (item: \"{}\")", offender.display, label),
        (None, _) => offender.display.clone(),
    }
}

fn violation_text(field: &str, bucket: Bucket, items: &[String]) -> String {
    let joined = items.join(", ");
    match bucket {
        Bucket::Actual => format!("Actual values equal: \"**[{}]**\"", joined),
        Bucket::Illegal => {
            format!("Field \"{}\" contains invalid value: \"**[{}]**\"", field, joined)
        }
        Bucket::Missing => format!("Field \"{}\" has no value", field),
        Bucket::Overdue => {
            format!("Found invalid due dates, overdue items: \"**[{}]**\"", joined)
        }
        Bucket::UndefinedDueDate => {
            format!("Found items with no due date: \"**[{}]**\"", joined)
        }
        Bucket::Unresolved => {
            format!("Unresolved items found with no resolution: \"**[{}]**\"", joined)
        }
    }
}

fn fulfilled_text(def: &CheckDefinition) -> String {
    let field = &def.field_path;
    match (&def.condition, def.quantifier) {
        (ConditionKind::Exists, _) => format!("Field \"{}\" is present", field),
        (ConditionKind::Expected { .. }, Quantifier::All) => {
            format!("All values of field \"{}\" are within the expected set", field)
        }
        (ConditionKind::Expected { .. }, Quantifier::Any) => format!(
            "At least one value of field \"{}\" is within the expected set",
            field
        ),
        (ConditionKind::Expected { .. }, Quantifier::None) => format!(
            "No value of field \"{}\" is within the forbidden set",
            field
        ),
        (ConditionKind::Illegal { .. }, _) => {
            format!("No illegal values found for field \"{}\"", field)
        }
        (ConditionKind::Resolved { .. }, _) => format!(
            "All items of field \"{}\" are resolved or within their due date",
            field
        ),
    }
}
