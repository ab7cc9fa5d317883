//! Raw configuration structs mirroring the on-disk JSON surface.
//!
//! These types are the serde boundary: field names match the
//! configuration format (`fieldName`, `closedAfterDate`, ...) and every
//! struct carries `deny_unknown_fields` so that a typo in a check
//! configuration is an error, not a silently ignored key.
//!
//! Validation beyond structure (exactly one condition per check, date
//! parsing, quantifier defaults) happens in [`crate::validate`].

use serde::Deserialize;
use std::collections::BTreeMap;

/// Top-level check configuration as written by gate authors.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct RawConfig {
    /// Named checks, keyed by check id.
    #[serde(default)]
    pub checks: BTreeMap<String, RawCheck>,

    /// Optional flat boolean expression over check ids (`a && b || c`).
    #[serde(default)]
    pub concatenation: Option<String>,

    /// When true, every offending element produces its own result
    /// instead of stopping at the first violation.
    #[serde(default)]
    pub continue_search_on_fail: bool,

    /// Reminder window in days for expiration-style evaluations.
    #[serde(default)]
    pub cycle_in_days: Option<u32>,
}

/// One named check.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct RawCheck {
    /// Field path the check evaluates, dotted for nested access.
    pub field_name: String,

    /// Reference date for overdue classification (`YYYY-MM-DD`).
    #[serde(default)]
    pub closed_after_date: Option<String>,

    /// Fold strategy over array-valued fields. Defaults to `any`.
    #[serde(default)]
    pub quantifier: Option<RawQuantifier>,

    pub conditions: RawConditions,
}

/// Quantifier names accepted in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawQuantifier {
    All,
    None,
    #[serde(alias = "some")]
    Any,
}

/// The condition block of a check. Exactly one key must be present;
/// that rule is enforced in [`crate::validate`] because serde cannot
/// express it structurally.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConditions {
    /// Field value must be a member of this set.
    #[serde(default)]
    pub expected: Option<Vec<String>>,

    /// Field value must not be a member of this set.
    #[serde(default)]
    pub illegal: Option<Vec<String>>,

    /// Items must be resolved, or unresolved with an acceptable due
    /// date when the flag is true.
    #[serde(default)]
    pub resolved: Option<bool>,

    /// Field must resolve to a non-empty value.
    #[serde(default)]
    pub exists: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_minimal_config() {
        let raw: RawConfig = serde_json::from_value(serde_json::json!({
            "checks": {
                "category_check": {
                    "fieldName": "category",
                    "quantifier": "all",
                    "conditions": { "expected": ["fiction", "reference"] }
                }
            }
        }))
        .unwrap();
        assert_eq!(raw.checks.len(), 1);
        let check = &raw.checks["category_check"];
        assert_eq!(check.field_name, "category");
        assert_eq!(check.quantifier, Some(RawQuantifier::All));
        assert_eq!(
            check.conditions.expected.as_deref(),
            Some(&["fiction".to_string(), "reference".to_string()][..])
        );
    }

    #[test]
    fn unknown_top_level_key_rejected() {
        let result: Result<RawConfig, _> = serde_json::from_value(serde_json::json!({
            "checks": {},
            "dataExist": true
        }));
        assert!(result.is_err());
    }

    #[test]
    fn unknown_condition_key_rejected() {
        let result: Result<RawConfig, _> = serde_json::from_value(serde_json::json!({
            "checks": {
                "c": {
                    "fieldName": "f",
                    "conditions": { "expcted": ["x"] }
                }
            }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn some_is_an_alias_for_any() {
        let raw: RawConfig = serde_json::from_value(serde_json::json!({
            "checks": {
                "c": {
                    "fieldName": "f",
                    "quantifier": "some",
                    "conditions": { "exists": true }
                }
            }
        }))
        .unwrap();
        assert_eq!(raw.checks["c"].quantifier, Some(RawQuantifier::Any));
    }
}
