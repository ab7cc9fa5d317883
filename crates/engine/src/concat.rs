//! Concatenation: boolean combination of named check results.
//!
//! A concatenation expression is a flat `&&`/`||` expression over check
//! ids, evaluated strictly left-to-right with no precedence or
//! parentheses. There is no short-circuiting to skip: every referenced
//! check has already been evaluated eagerly, because each check result
//! must exist in the output stream regardless of earlier operands.

use std::collections::BTreeMap;

use crate::types::CheckResult;

/// Combine evaluated check booleans under `expr` into one synthetic
/// check result.
///
/// An identifier with no evaluated result is a configuration error and
/// fails the criterion closed rather than aborting the run; partial
/// reporting beats silent loss of every other check.
pub fn combine(expr: &str, fulfilled_by_id: &BTreeMap<String, bool>) -> CheckResult {
    match evaluate(expr, fulfilled_by_id) {
        Ok(fulfilled) => {
            let status = if fulfilled { "GREEN" } else { "RED" };
            CheckResult::new(
                expr.to_string(),
                format!("Resulting overall status is {}", status),
                fulfilled,
            )
        }
        Err(message) => CheckResult::new(
            expr.to_string(),
            format!("{}. Resulting overall status is RED", message),
            false,
        ),
    }
}

fn evaluate(expr: &str, fulfilled_by_id: &BTreeMap<String, bool>) -> Result<bool, String> {
    let mut tokens = expr.split_whitespace();

    let first = tokens
        .next()
        .ok_or_else(|| "Concatenation expression is empty".to_string())?;
    let mut value = lookup(first, fulfilled_by_id)?;

    while let Some(op) = tokens.next() {
        let id = tokens
            .next()
            .ok_or_else(|| format!("Operator '{}' has no right-hand operand", op))?;
        let rhs = lookup(id, fulfilled_by_id)?;
        value = match op {
            "&&" => value && rhs,
            "||" => value || rhs,
            other => return Err(format!("Unknown operator '{}'", other)),
        };
    }

    Ok(value)
}

fn lookup(id: &str, fulfilled_by_id: &BTreeMap<String, bool>) -> Result<bool, String> {
    fulfilled_by_id
        .get(id)
        .copied()
        .ok_or_else(|| format!("Check id \"{}\" was not evaluated in this run", id))
}
