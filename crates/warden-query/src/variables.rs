//! Case-insensitive variable map

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Variables supplied with a single execution request.
///
/// Lookup ignores ASCII case: `SID`, `sid` and `Sid` name the same variable.
/// Inserting a name that differs only by case replaces the earlier value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct VariableMap {
    /// lower-cased name -> (name as supplied, value)
    entries: HashMap<String, (String, String)>,
}

impl VariableMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable, stringifying its value
    pub fn insert(&mut self, name: impl Into<String>, value: impl ToString) {
        let name = name.into();
        self.entries
            .insert(name.to_ascii_lowercase(), (name, value.to_string()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, value)` pairs with names as originally supplied
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .values()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for VariableMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

impl From<BTreeMap<String, String>> for VariableMap {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<VariableMap> for BTreeMap<String, String> {
    fn from(map: VariableMap) -> Self {
        map.entries.into_values().collect()
    }
}
