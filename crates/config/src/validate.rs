//! Conversion of raw configuration into the closed check algebra.
//!
//! [`parse_config`] walks the raw structs and produces a
//! [`CheckConfig`] whose conditions are tagged variants. Everything the
//! evaluation engine consumes comes out of here already validated:
//! exactly one condition per check, parsed dates, resolved quantifier
//! defaults.

use crate::types::{RawCheck, RawConfig, RawQuantifier};
use std::fmt;
use time::macros::format_description;
use time::Date;

/// Default reminder window for expiration-style evaluations, in days.
pub const DEFAULT_CYCLE_IN_DAYS: u32 = 14;

/// Errors during configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The JSON value does not match the configuration structure
    /// (missing fields, unknown keys, wrong types).
    InvalidStructure { message: String },
    /// A check declares no condition.
    MissingCondition { check_id: String },
    /// A check declares more than one condition.
    AmbiguousCondition { check_id: String },
    /// A date field could not be parsed as `YYYY-MM-DD`.
    InvalidDate { check_id: String, value: String },
    /// The concatenation expression is empty or malformed.
    InvalidConcatenation { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidStructure { message } => {
                write!(f, "invalid configuration: {}", message)
            }
            ConfigError::MissingCondition { check_id } => {
                write!(f, "check '{}' declares no condition", check_id)
            }
            ConfigError::AmbiguousCondition { check_id } => {
                write!(
                    f,
                    "check '{}' declares more than one condition; exactly one of \
                     expected/illegal/resolved/exists is allowed",
                    check_id
                )
            }
            ConfigError::InvalidDate { check_id, value } => {
                write!(
                    f,
                    "check '{}' has unparsable date '{}', expected YYYY-MM-DD",
                    check_id, value
                )
            }
            ConfigError::InvalidConcatenation { message } => {
                write!(f, "invalid concatenation expression: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// One declared condition, as a closed variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionKind {
    /// Field must resolve to a non-empty value.
    Exists,
    /// Field value must be a member of the set.
    Expected { values: Vec<String> },
    /// Field value must not be a member of the set.
    Illegal { values: Vec<String> },
    /// Items must be resolved/closed; when `acceptable_condition_met`
    /// is true an unresolved item with an unexpired due date also
    /// passes. `overdue_cutoff` is the reference date items are
    /// measured against.
    Resolved {
        acceptable_condition_met: bool,
        overdue_cutoff: Option<Date>,
    },
}

/// Fold strategy applied when a check's field resolves to a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    /// Every element must satisfy the condition.
    All,
    /// No element may satisfy the condition.
    None,
    /// At least one element must satisfy the condition.
    Any,
}

/// Search strategy for collection evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Stop a check at its first violation (default).
    #[default]
    FailFast,
    /// Report every offending element with its own result.
    Exhaustive,
}

/// One validated, named check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckDefinition {
    pub id: String,
    /// Human-readable title, derived from the id (`category_check` ->
    /// `CATEGORY CHECK`).
    pub title: String,
    pub field_path: String,
    pub condition: ConditionKind,
    pub quantifier: Quantifier,
}

/// A validated check configuration, ready for evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckConfig {
    /// Checks in deterministic (id) order.
    pub checks: Vec<CheckDefinition>,
    pub concatenation: Option<String>,
    pub search: SearchMode,
    pub cycle_in_days: u32,
}

/// Parse and validate a check configuration from already-parsed JSON.
pub fn parse_config(value: &serde_json::Value) -> Result<CheckConfig, ConfigError> {
    let raw: RawConfig = serde_json::from_value(value.clone()).map_err(|e| {
        ConfigError::InvalidStructure {
            message: e.to_string(),
        }
    })?;

    let mut checks = Vec::with_capacity(raw.checks.len());
    for (id, raw_check) in &raw.checks {
        checks.push(validate_check(id, raw_check)?);
    }

    if let Some(expr) = &raw.concatenation {
        validate_concatenation(expr)?;
    }

    Ok(CheckConfig {
        checks,
        concatenation: raw.concatenation,
        search: if raw.continue_search_on_fail {
            SearchMode::Exhaustive
        } else {
            SearchMode::FailFast
        },
        cycle_in_days: raw.cycle_in_days.unwrap_or(DEFAULT_CYCLE_IN_DAYS),
    })
}

fn validate_check(id: &str, raw: &RawCheck) -> Result<CheckDefinition, ConfigError> {
    let c = &raw.conditions;
    let declared = [
        c.expected.is_some(),
        c.illegal.is_some(),
        c.resolved.is_some(),
        c.exists.is_some(),
    ]
    .iter()
    .filter(|d| **d)
    .count();

    if declared == 0 {
        return Err(ConfigError::MissingCondition {
            check_id: id.to_string(),
        });
    }
    if declared > 1 {
        return Err(ConfigError::AmbiguousCondition {
            check_id: id.to_string(),
        });
    }

    let condition = if let Some(values) = &c.expected {
        ConditionKind::Expected {
            values: values.clone(),
        }
    } else if let Some(values) = &c.illegal {
        ConditionKind::Illegal {
            values: values.clone(),
        }
    } else if let Some(acceptable) = c.resolved {
        ConditionKind::Resolved {
            acceptable_condition_met: acceptable,
            overdue_cutoff: raw
                .closed_after_date
                .as_deref()
                .map(|d| parse_date(id, d))
                .transpose()?,
        }
    } else {
        ConditionKind::Exists
    };

    Ok(CheckDefinition {
        id: id.to_string(),
        title: derive_title(id),
        field_path: raw.field_name.clone(),
        condition,
        quantifier: match raw.quantifier {
            Some(RawQuantifier::All) => Quantifier::All,
            Some(RawQuantifier::None) => Quantifier::None,
            Some(RawQuantifier::Any) | None => Quantifier::Any,
        },
    })
}

fn validate_concatenation(expr: &str) -> Result<(), ConfigError> {
    let tokens: Vec<&str> = expr.split_whitespace().collect();
    if tokens.is_empty() {
        return Err(ConfigError::InvalidConcatenation {
            message: "expression is empty".to_string(),
        });
    }
    for (i, token) in tokens.iter().enumerate() {
        let is_op = *token == "&&" || *token == "||";
        if i % 2 == 0 && is_op {
            return Err(ConfigError::InvalidConcatenation {
                message: format!("expected check id at position {}, found '{}'", i, token),
            });
        }
        if i % 2 == 1 && !is_op {
            return Err(ConfigError::InvalidConcatenation {
                message: format!("expected '&&' or '||' at position {}, found '{}'", i, token),
            });
        }
    }
    if tokens.len() % 2 == 0 {
        return Err(ConfigError::InvalidConcatenation {
            message: "expression ends with an operator".to_string(),
        });
    }
    Ok(())
}

fn parse_date(check_id: &str, value: &str) -> Result<Date, ConfigError> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(value, &format).map_err(|_| ConfigError::InvalidDate {
        check_id: check_id.to_string(),
        value: value.to_string(),
    })
}

fn derive_title(id: &str) -> String {
    id.replace('_', " ").to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn config(v: serde_json::Value) -> Result<CheckConfig, ConfigError> {
        parse_config(&v)
    }

    #[test]
    fn validate_expected_check() {
        let cfg = config(serde_json::json!({
            "checks": {
                "category_check": {
                    "fieldName": "category",
                    "quantifier": "all",
                    "conditions": { "expected": ["fiction", "reference"] }
                }
            },
            "concatenation": "category_check"
        }))
        .unwrap();

        assert_eq!(cfg.checks.len(), 1);
        let check = &cfg.checks[0];
        assert_eq!(check.id, "category_check");
        assert_eq!(check.title, "CATEGORY CHECK");
        assert_eq!(check.quantifier, Quantifier::All);
        assert_eq!(
            check.condition,
            ConditionKind::Expected {
                values: vec!["fiction".to_string(), "reference".to_string()]
            }
        );
        assert_eq!(cfg.search, SearchMode::FailFast);
        assert_eq!(cfg.cycle_in_days, DEFAULT_CYCLE_IN_DAYS);
    }

    #[test]
    fn validate_resolved_check_with_cutoff() {
        let cfg = config(serde_json::json!({
            "checks": {
                "resolution_check": {
                    "fieldName": "issues",
                    "quantifier": "all",
                    "closedAfterDate": "2026-08-01",
                    "conditions": { "resolved": true }
                }
            }
        }))
        .unwrap();

        assert_eq!(
            cfg.checks[0].condition,
            ConditionKind::Resolved {
                acceptable_condition_met: true,
                overdue_cutoff: Some(date!(2026 - 08 - 01)),
            }
        );
    }

    #[test]
    fn missing_condition_is_an_error() {
        let err = config(serde_json::json!({
            "checks": { "c": { "fieldName": "f", "conditions": {} } }
        }))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingCondition {
                check_id: "c".to_string()
            }
        );
    }

    #[test]
    fn two_conditions_are_an_error() {
        let err = config(serde_json::json!({
            "checks": {
                "c": {
                    "fieldName": "f",
                    "conditions": { "expected": ["a"], "illegal": ["b"] }
                }
            }
        }))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::AmbiguousCondition {
                check_id: "c".to_string()
            }
        );
    }

    #[test]
    fn bad_date_is_an_error() {
        let err = config(serde_json::json!({
            "checks": {
                "c": {
                    "fieldName": "f",
                    "closedAfterDate": "01.08.2026",
                    "conditions": { "resolved": true }
                }
            }
        }))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDate { .. }));
    }

    #[test]
    fn quantifier_defaults_to_any() {
        let cfg = config(serde_json::json!({
            "checks": { "c": { "fieldName": "f", "conditions": { "exists": true } } }
        }))
        .unwrap();
        assert_eq!(cfg.checks[0].quantifier, Quantifier::Any);
    }

    #[test]
    fn checks_come_out_in_id_order() {
        let cfg = config(serde_json::json!({
            "checks": {
                "b_check": { "fieldName": "f", "conditions": { "exists": true } },
                "a_check": { "fieldName": "f", "conditions": { "exists": true } }
            }
        }))
        .unwrap();
        let ids: Vec<&str> = cfg.checks.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a_check", "b_check"]);
    }

    #[test]
    fn concatenation_must_alternate_ids_and_operators() {
        let bad = config(serde_json::json!({
            "checks": { "a": { "fieldName": "f", "conditions": { "exists": true } } },
            "concatenation": "a && && b"
        }));
        assert!(matches!(
            bad,
            Err(ConfigError::InvalidConcatenation { .. })
        ));

        let trailing = config(serde_json::json!({
            "checks": { "a": { "fieldName": "f", "conditions": { "exists": true } } },
            "concatenation": "a &&"
        }));
        assert!(matches!(
            trailing,
            Err(ConfigError::InvalidConcatenation { .. })
        ));
    }

    #[test]
    fn exhaustive_search_flag() {
        let cfg = config(serde_json::json!({
            "checks": { "c": { "fieldName": "f", "conditions": { "exists": true } } },
            "continueSearchOnFail": true
        }))
        .unwrap();
        assert_eq!(cfg.search, SearchMode::Exhaustive);
    }
}
