//! SPARQL Results JSON flattening
//!
//! A SPARQL 1.1 JSON result looks like
//!
//! ```text
//! { "head": { "vars": [...] },
//!   "results": { "bindings": [ { "var": { "type": "literal", "value": "..." } } ] } }
//! ```
//!
//! Each binding becomes a [`ResultRow`] of `variable → value`; `type`,
//! `datatype` and `xml:lang` are dropped. Unbound variables are absent.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// One solution: variable name → lexical value, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultRow {
    entries: Vec<(String, String)>,
}

/// Rows in the order the engine returned them
pub type ResultSet = Vec<ResultRow>;

impl ResultRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable, replacing an earlier value for the same name
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ResultRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = ResultRow::new();
        for (key, value) in iter {
            row.insert(key, value);
        }
        row
    }
}

impl IntoIterator for ResultRow {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for ResultRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Lexical value of one bound term
///
/// Strings are taken as-is; other scalars keep their JSON text. A term
/// without a usable `value` is treated as unbound.
fn term_value(term: &Value) -> Option<String> {
    match term.get("value")? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other @ (Value::Number(_) | Value::Bool(_)) => Some(other.to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Flatten a parsed SPARQL Results JSON document
///
/// Returns an empty set when `results.bindings` is missing, null or not an
/// array. A binding that is not an object yields an empty row.
pub fn flatten_bindings(data: &Value) -> ResultSet {
    let bindings = match data
        .get("results")
        .and_then(|results| results.get("bindings"))
        .and_then(Value::as_array)
    {
        Some(bindings) => bindings,
        None => return Vec::new(),
    };

    bindings
        .iter()
        .map(|binding| match binding.as_object() {
            Some(vars) => vars
                .iter()
                .filter_map(|(name, term)| term_value(term).map(|value| (name.clone(), value)))
                .collect(),
            None => ResultRow::new(),
        })
        .collect()
}
