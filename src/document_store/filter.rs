//! # Filter Expressions
//!
//! Field equality predicates evaluated against stored JSON documents. A
//! query is the conjunction of its filters.

use serde_json::Value;

/// `field == value` on a stored document
#[derive(Debug, Clone, PartialEq)]
pub struct FilterExpr {
    pub field: String,
    pub value: Value,
}

impl FilterExpr {
    /// Create an equality filter
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// A document lacking the field never matches
    pub fn matches(&self, doc: &Value) -> bool {
        doc.get(&self.field) == Some(&self.value)
    }
}

/// Check a document against every filter (AND)
pub fn matches_all(filters: &[FilterExpr], doc: &Value) -> bool {
    filters.iter().all(|f| f.matches(doc))
}
