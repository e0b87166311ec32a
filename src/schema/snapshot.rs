//! Immutable map of current field values

use super::field::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw value of every field that has been set, keyed by field name.
///
/// Snapshots are never edited in place: [`ValueSnapshot::with`] returns a new
/// snapshot, so a validation result always refers to exactly one set of
/// values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueSnapshot {
    values: BTreeMap<String, FieldValue>,
}

impl ValueSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy of this snapshot with `name` set to `value`
    pub fn with(&self, name: &str, value: impl Into<FieldValue>) -> Self {
        let mut values = self.values.clone();
        values.insert(name.to_string(), value.into());
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Text value of `name`, empty when unset
    pub fn text(&self, name: &str) -> &str {
        self.get(name).map(FieldValue::as_text).unwrap_or("")
    }

    /// Boolean value of `name`, false when unset
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).is_some_and(FieldValue::as_bool)
    }

    /// True when `name` is unset, whitespace-only, or false
    pub fn is_blank(&self, name: &str) -> bool {
        self.get(name).map_or(true, FieldValue::is_empty)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ValueSnapshot
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
