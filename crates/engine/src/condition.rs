//! Per-element condition evaluation.
//!
//! Each [`ConditionKind`] defines a fulfilled/violated predicate over a
//! single resolved field value. Violations carry a bucket so the
//! aggregator can group them into the right justification wording
//! (actual-value mismatch, illegal value, overdue, undefined due date).

use gatecheck_config::ConditionKind;
use serde_json::Value;
use time::macros::format_description;
use time::Date;

use crate::field::Element;

/// Violation classification, one bucket per justification wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    /// Actual value outside the expected set.
    Actual,
    /// Actual value inside the illegal set.
    Illegal,
    /// No usable value present.
    Missing,
    /// Unresolved item whose due date has passed the cutoff.
    Overdue,
    /// Unresolved item without a parseable due date.
    UndefinedDueDate,
    /// Unresolved item where an open due date is not acceptable.
    Unresolved,
}

/// Verdict for one element of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementVerdict {
    pub fulfilled: bool,
    /// Rendering of the element's actual value, used in justifications.
    pub display: String,
    /// Representative label from the enclosing record, if any.
    pub label: Option<String>,
    /// Violation bucket; present iff `fulfilled` is false.
    pub bucket: Option<Bucket>,
}

impl ElementVerdict {
    fn fulfilled(display: String, label: Option<String>) -> ElementVerdict {
        ElementVerdict {
            fulfilled: true,
            display,
            label,
            bucket: None,
        }
    }

    fn violated(display: String, label: Option<String>, bucket: Bucket) -> ElementVerdict {
        ElementVerdict {
            fulfilled: false,
            display,
            label,
            bucket: Some(bucket),
        }
    }
}

/// Evaluate one condition against one element.
pub fn evaluate(condition: &ConditionKind, element: &Element) -> ElementVerdict {
    let label = element.label.clone();
    match condition {
        ConditionKind::Exists => {
            let present = element.value.as_ref().is_some_and(|v| !is_empty(v));
            let display = element
                .value
                .as_ref()
                .map(display_value)
                .unwrap_or_default();
            if present {
                ElementVerdict::fulfilled(display, label)
            } else {
                ElementVerdict::violated(display, label, Bucket::Missing)
            }
        }

        ConditionKind::Expected { values } => match &element.value {
            Some(v) => {
                let display = display_value(v);
                if values.contains(&display) {
                    ElementVerdict::fulfilled(display, label)
                } else {
                    ElementVerdict::violated(display, label, Bucket::Actual)
                }
            }
            None => ElementVerdict::violated(String::new(), label, Bucket::Actual),
        },

        ConditionKind::Illegal { values } => match &element.value {
            Some(v) => {
                let display = display_value(v);
                if values.contains(&display) {
                    ElementVerdict::violated(display, label, Bucket::Illegal)
                } else {
                    ElementVerdict::fulfilled(display, label)
                }
            }
            // A missing value cannot match a forbidden one.
            None => ElementVerdict::fulfilled(String::new(), label),
        },

        ConditionKind::Resolved {
            acceptable_condition_met,
            overdue_cutoff,
        } => evaluate_resolved(element, *acceptable_condition_met, overdue_cutoff.as_ref()),
    }
}

fn evaluate_resolved(
    element: &Element,
    acceptable_condition_met: bool,
    overdue_cutoff: Option<&Date>,
) -> ElementVerdict {
    let item = match &element.value {
        Some(v) => v,
        // Nothing to resolve.
        None => return ElementVerdict::fulfilled(String::new(), element.label.clone()),
    };

    let name = item_name(item, element.label.as_deref());

    if is_resolved(item) {
        return ElementVerdict::fulfilled(name, element.label.clone());
    }

    if !acceptable_condition_met {
        return ElementVerdict::violated(name, element.label.clone(), Bucket::Unresolved);
    }

    match due_date(item) {
        None => ElementVerdict::violated(name, element.label.clone(), Bucket::UndefinedDueDate),
        Some(due) => match overdue_cutoff {
            Some(cutoff) if due < *cutoff => ElementVerdict::violated(
                format!("{} (due {})", name, due),
                element.label.clone(),
                Bucket::Overdue,
            ),
            _ => ElementVerdict::fulfilled(name, element.label.clone()),
        },
    }
}

/// An item counts as resolved when it carries a truthy `resolved` flag,
/// a terminal `status`, or a non-empty `resolution`.
fn is_resolved(item: &Value) -> bool {
    let obj = match item.as_object() {
        Some(o) => o,
        None => return false,
    };
    if obj.get("resolved").and_then(|v| v.as_bool()) == Some(true) {
        return true;
    }
    if let Some(status) = obj.get("status").and_then(|v| v.as_str()) {
        if status == "resolved" || status == "closed" {
            return true;
        }
    }
    matches!(obj.get("resolution").and_then(|v| v.as_str()), Some(r) if !r.is_empty())
}

/// Reads the item's `dueDate` field as `YYYY-MM-DD` (a timestamp is
/// truncated to its date part). Unparsable dates count as undefined.
fn due_date(item: &Value) -> Option<Date> {
    let raw = item.as_object()?.get("dueDate")?.as_str()?;
    // A cut that is out of range or off a char boundary leaves the
    // whole string, which then fails to parse and counts as undefined.
    let date_part = raw.get(..10).unwrap_or(raw);
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(date_part, &format).ok()
}

fn item_name(item: &Value, label: Option<&str>) -> String {
    if let Some(l) = label {
        return l.to_string();
    }
    let from_fields = item.as_object().and_then(|obj| {
        obj.get("title")
            .or_else(|| obj.get("name"))
            .or_else(|| obj.get("id"))
            .or_else(|| obj.get("key"))
            .and_then(|v| v.as_str())
    });
    match from_fields {
        Some(s) => s.to_string(),
        None => display_value(item),
    }
}

/// Stable textual rendering of a field value. Strings render without
/// quotes; numbers render with their source precision.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn element(value: Value) -> Element {
        Element {
            value: Some(value),
            label: None,
        }
    }

    fn missing() -> Element {
        Element {
            value: None,
            label: None,
        }
    }

    #[test]
    fn exists_fulfilled_on_value() {
        let v = evaluate(&ConditionKind::Exists, &element(json!("fiction")));
        assert!(v.fulfilled);
        assert_eq!(v.bucket, None);
    }

    #[test]
    fn exists_violated_on_missing_and_empty() {
        let v = evaluate(&ConditionKind::Exists, &missing());
        assert!(!v.fulfilled);
        assert_eq!(v.bucket, Some(Bucket::Missing));

        let v = evaluate(&ConditionKind::Exists, &element(json!("")));
        assert!(!v.fulfilled);

        let v = evaluate(&ConditionKind::Exists, &element(json!([])));
        assert!(!v.fulfilled);
    }

    #[test]
    fn expected_membership() {
        let cond = ConditionKind::Expected {
            values: vec!["fiction".to_string(), "reference".to_string()],
        };
        assert!(evaluate(&cond, &element(json!("fiction"))).fulfilled);

        let v = evaluate(&cond, &element(json!("fantasy")));
        assert!(!v.fulfilled);
        assert_eq!(v.bucket, Some(Bucket::Actual));
        assert_eq!(v.display, "fantasy");
    }

    #[test]
    fn expected_missing_is_a_violation() {
        let cond = ConditionKind::Expected {
            values: vec!["fiction".to_string()],
        };
        let v = evaluate(&cond, &missing());
        assert!(!v.fulfilled);
        assert_eq!(v.display, "");
    }

    #[test]
    fn expected_preserves_number_precision() {
        let cond = ConditionKind::Expected {
            values: vec!["75".to_string()],
        };
        let record: Value = serde_json::from_str("{\"coverage\": 70.70}").unwrap();
        let v = evaluate(&cond, &element(record["coverage"].clone()));
        assert!(!v.fulfilled);
        assert_eq!(v.display, "70.70");
    }

    #[test]
    fn illegal_membership() {
        let cond = ConditionKind::Illegal {
            values: vec!["wontfix".to_string()],
        };
        assert!(evaluate(&cond, &element(json!("fixed"))).fulfilled);

        let v = evaluate(&cond, &element(json!("wontfix")));
        assert!(!v.fulfilled);
        assert_eq!(v.bucket, Some(Bucket::Illegal));
        assert_eq!(v.display, "wontfix");
    }

    #[test]
    fn illegal_missing_is_fulfilled() {
        let cond = ConditionKind::Illegal {
            values: vec!["wontfix".to_string()],
        };
        assert!(evaluate(&cond, &missing()).fulfilled);
    }

    #[test]
    fn resolved_item_is_fulfilled() {
        let cond = ConditionKind::Resolved {
            acceptable_condition_met: true,
            overdue_cutoff: None,
        };
        for item in [
            json!({ "title": "WI-1", "resolved": true }),
            json!({ "title": "WI-2", "status": "closed" }),
            json!({ "title": "WI-3", "resolution": "fixed" }),
        ] {
            assert!(evaluate(&cond, &element(item)).fulfilled);
        }
    }

    #[test]
    fn unresolved_without_due_date_is_undefined() {
        let cond = ConditionKind::Resolved {
            acceptable_condition_met: true,
            overdue_cutoff: None,
        };
        let v = evaluate(&cond, &element(json!({ "title": "WI-1", "status": "open" })));
        assert!(!v.fulfilled);
        assert_eq!(v.bucket, Some(Bucket::UndefinedDueDate));
        assert_eq!(v.display, "WI-1");
    }

    #[test]
    fn unresolved_past_cutoff_is_overdue() {
        use time::macros::date;
        let cond = ConditionKind::Resolved {
            acceptable_condition_met: true,
            overdue_cutoff: Some(date!(2026 - 08 - 01)),
        };
        let v = evaluate(
            &cond,
            &element(json!({ "title": "WI-1", "status": "open", "dueDate": "2026-07-15" })),
        );
        assert!(!v.fulfilled);
        assert_eq!(v.bucket, Some(Bucket::Overdue));
        assert_eq!(v.display, "WI-1 (due 2026-07-15)");
    }

    #[test]
    fn unresolved_before_cutoff_is_fulfilled() {
        use time::macros::date;
        let cond = ConditionKind::Resolved {
            acceptable_condition_met: true,
            overdue_cutoff: Some(date!(2026 - 08 - 01)),
        };
        let v = evaluate(
            &cond,
            &element(json!({ "title": "WI-1", "status": "open", "dueDate": "2026-09-01" })),
        );
        assert!(v.fulfilled);
    }

    #[test]
    fn unresolved_not_acceptable_violates_regardless_of_due_date() {
        let cond = ConditionKind::Resolved {
            acceptable_condition_met: false,
            overdue_cutoff: None,
        };
        let v = evaluate(
            &cond,
            &element(json!({ "title": "WI-1", "status": "open", "dueDate": "2099-01-01" })),
        );
        assert!(!v.fulfilled);
        assert_eq!(v.bucket, Some(Bucket::Unresolved));
    }

    #[test]
    fn multibyte_due_date_counts_as_undefined() {
        let cond = ConditionKind::Resolved {
            acceptable_condition_met: true,
            overdue_cutoff: None,
        };
        // Byte 10 sits inside the two-byte 'é'; the date must come out
        // undefined, not panic the evaluator.
        let v = evaluate(
            &cond,
            &element(
                json!({ "title": "WI-1", "status": "open", "dueDate": "2026-07-1é later" }),
            ),
        );
        assert!(!v.fulfilled);
        assert_eq!(v.bucket, Some(Bucket::UndefinedDueDate));
    }

    #[test]
    fn timestamp_due_dates_truncate_to_date() {
        use time::macros::date;
        let cond = ConditionKind::Resolved {
            acceptable_condition_met: true,
            overdue_cutoff: Some(date!(2026 - 08 - 01)),
        };
        let v = evaluate(
            &cond,
            &element(
                json!({ "title": "WI-1", "status": "open", "dueDate": "2026-07-15T10:30:00Z" }),
            ),
        );
        assert_eq!(v.bucket, Some(Bucket::Overdue));
    }
}
