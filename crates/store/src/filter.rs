//! Typed filter predicates evaluated against JSON documents.

use serde_json::Value;
use std::cmp::Ordering;

/// Comparison applied to a single document field.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Eq(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    In(Vec<Value>),
    /// Case-insensitive substring match on string fields.
    ContainsCi(String),
}

impl Predicate {
    /// Evaluate the predicate against a field value.
    /// A missing field never matches.
    pub fn matches(&self, actual: Option<&Value>) -> bool {
        match self {
            Predicate::Eq(expected) => match compare(actual, expected) {
                Some(ordering) => ordering == Ordering::Equal,
                None => actual == Some(expected),
            },
            Predicate::Gt(expected) => compare(actual, expected) == Some(Ordering::Greater),
            Predicate::Gte(expected) => matches!(
                compare(actual, expected),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Predicate::Lt(expected) => compare(actual, expected) == Some(Ordering::Less),
            Predicate::Lte(expected) => matches!(
                compare(actual, expected),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Predicate::In(candidates) => actual
                .map(|value| candidates.iter().any(|c| values_equal(value, c)))
                .unwrap_or(false),
            Predicate::ContainsCi(needle) => actual
                .and_then(Value::as_str)
                .map(|haystack| haystack.to_lowercase().contains(&needle.to_lowercase()))
                .unwrap_or(false),
        }
    }
}

/// Compare two JSON scalars: numbers numerically, strings
/// lexicographically. Mismatched or non-orderable types do not compare.
fn compare(actual: Option<&Value>, expected: &Value) -> Option<Ordering> {
    match (actual?, expected) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match compare(Some(a), b) {
        Some(ordering) => ordering == Ordering::Equal,
        None => a == b,
    }
}

/// A predicate bound to a document field.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub predicate: Predicate,
}

impl Condition {
    pub fn new(field: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            field: field.into(),
            predicate,
        }
    }

    pub fn matches(&self, doc: &Value) -> bool {
        self.predicate.matches(doc.get(&self.field))
    }
}

/// Conjunction (`All`) or disjunction (`Any`) of conditions.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    All(Vec<Condition>),
    Any(Vec<Condition>),
}

impl Filter {
    /// A filter matching every document.
    pub fn empty() -> Self {
        Filter::All(Vec::new())
    }

    pub fn all(conditions: Vec<Condition>) -> Self {
        Filter::All(conditions)
    }

    pub fn any(conditions: Vec<Condition>) -> Self {
        Filter::Any(conditions)
    }

    /// Single equality condition, the most common filter shape.
    pub fn field_eq(field: impl Into<String>, value: Value) -> Self {
        Filter::All(vec![Condition::new(field, Predicate::Eq(value))])
    }

    pub fn matches(&self, doc: &Value) -> bool {
        match self {
            Filter::All(conditions) => conditions.iter().all(|c| c.matches(doc)),
            Filter::Any(conditions) => conditions.iter().any(|c| c.matches(doc)),
        }
    }
}

/// Pagination window applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub limit: u64,
}
