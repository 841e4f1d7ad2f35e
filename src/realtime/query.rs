//! Equality queries over the children of a collection.

use serde_json::Value;

/// Selects the records of a collection whose `child` field equals a value.
///
/// Matching is exact JSON equality, so the string `"42"` does not match the
/// number `42`.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    child: String,
    equals: Value,
}

impl Query {
    /// Match records whose field `child` is equal to `value`.
    pub fn equal_to(child: &str, value: impl Into<Value>) -> Self {
        Self {
            child: child.to_owned(),
            equals: value.into(),
        }
    }

    /// Whether the record `value` satisfies this query.
    pub fn matches(&self, value: &Value) -> bool {
        value.get(&self.child) == Some(&self.equals)
    }
}
