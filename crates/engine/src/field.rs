//! Field access: resolving a dotted field path against a record.
//!
//! Resolution is case-sensitive and supports no wildcards. A missing
//! field is a first-class outcome consumed by the `exists` condition,
//! never an error.

use serde_json::Value;

/// One element of a resolved collection: the value the condition sees
/// plus an optional representative label taken from the enclosing
/// record (an item title or name) used in violation justifications.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// `None` when the path did not resolve for this element.
    pub value: Option<Value>,
    pub label: Option<String>,
}

impl Element {
    fn scalar(value: Value) -> Element {
        let label = element_label(&value);
        Element {
            value: Some(value),
            label,
        }
    }
}

/// Outcome of resolving a field path against a record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Missing,
    Scalar(Value),
    Collection(Vec<Element>),
}

impl FieldValue {
    /// Normalizes to the element list the quantifier iterates over.
    /// `Missing` becomes the empty list; a scalar becomes a single
    /// element.
    pub fn into_elements(self) -> Vec<Element> {
        match self {
            FieldValue::Missing => Vec::new(),
            FieldValue::Scalar(v) => vec![Element::scalar(v)],
            FieldValue::Collection(elements) => elements,
        }
    }
}

/// Resolve `path` against `record`.
///
/// A record that is itself an array of objects resolves the path once
/// per item, with each item contributing one element labeled by its
/// title. Inside a single record, dotted segments descend through
/// nested objects; an array at the final position yields a collection.
pub fn resolve(record: &Value, path: &str) -> FieldValue {
    if let Value::Array(items) = record {
        let elements = items
            .iter()
            .map(|item| Element {
                value: lookup(item, path).cloned().filter(|v| !v.is_null()),
                label: record_label(item),
            })
            .collect();
        return FieldValue::Collection(elements);
    }

    match lookup(record, path) {
        None => FieldValue::Missing,
        Some(Value::Null) => FieldValue::Missing,
        Some(Value::Array(items)) => FieldValue::Collection(
            items
                .iter()
                .map(|item| Element::scalar(item.clone()))
                .collect(),
        ),
        Some(v) => FieldValue::Scalar(v.clone()),
    }
}

fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = record;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Representative label for a record element: its `title`, falling back
/// to `name`.
fn record_label(item: &Value) -> Option<String> {
    let obj = item.as_object()?;
    obj.get("title")
        .or_else(|| obj.get("name"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

fn element_label(value: &Value) -> Option<String> {
    match value {
        Value::Object(_) => record_label(value),
        _ => None,
    }
}
