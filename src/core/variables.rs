//! Case-insensitive string variables attached to a game.
//!
//! Holds the ruleset name, display name, URL, export path, and anything
//! else the front end wants to remember. Keys compare without regard to
//! ASCII case but keep the spelling they were first written with.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Variable key with case-insensitive ordering.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VarKey(String);

impl VarKey {
    /// Key as originally written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for VarKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for VarKey {}

impl PartialOrd for VarKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VarKey {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.0.bytes().map(|b| b.to_ascii_lowercase());
        let rhs = other.0.bytes().map(|b| b.to_ascii_lowercase());
        lhs.cmp(rhs)
    }
}

/// String-keyed, case-insensitive variable map.
///
/// ```
/// use civ_ledger::core::Variables;
///
/// let mut vars = Variables::new();
/// vars.set("Ruleset", "AdvCiv");
/// assert_eq!(vars.get("ruleset"), Some("AdvCiv"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Variables {
    values: BTreeMap<VarKey, String>,
}

impl Variables {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a variable.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&VarKey(key.to_string())).map(String::as_str)
    }

    /// Get a variable, or the empty string if unset.
    #[must_use]
    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    /// Set a variable, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = VarKey(key.into());
        let value = value.into();
        // Keep the first spelling of the key.
        if let Some(slot) = self.values.get_mut(&key) {
            return Some(std::mem::replace(slot, value));
        }
        self.values.insert(key, value)
    }

    /// Set a variable only if it is not already present.
    pub fn set_default(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.entry(VarKey(key.into())).or_insert_with(|| value.into());
    }

    /// Remove a variable.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(&VarKey(key.to_string()))
    }

    /// Check whether a variable is set.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no variables are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate in case-insensitive key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
