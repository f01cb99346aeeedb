//! Settings map for a single profile
//!
//! A profile's configuration is a flat key → value string mapping. Values are
//! stored as strings and interpreted by whoever reads them (booleans as
//! `insert`/`do_not_insert` or `true`/`false`, integers, enum tokens).

pub mod keys;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use keys::KNOWN_KEYS;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsMap {
    values: BTreeMap<String, String>,
}

impl SettingsMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map holding every known key at its default value
    pub fn defaults() -> Self {
        let mut map = Self::new();
        map.complete();
        map
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns the previous value, if any
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Swap the stored values of two keys. A missing side removes the other.
    pub fn swap_values(&mut self, a: &str, b: &str) {
        let first = self.values.remove(a);
        let second = self.values.remove(b);
        if let Some(value) = second {
            self.values.insert(a.to_string(), value);
        }
        if let Some(value) = first {
            self.values.insert(b.to_string(), value);
        }
    }

    /// Entries in canonical order: known keys in registry order, then any
    /// unknown keys sorted lexically
    pub fn canonical_entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self.iter().collect();
        entries.sort_by(|(a, _), (b, _)| match (keys::position(a), keys::position(b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.cmp(b),
        });
        entries
    }

    /// Fill every missing known key with its default
    pub fn complete(&mut self) {
        for def in KNOWN_KEYS {
            if !self.values.contains_key(def.id) {
                self.values.insert(def.id.to_string(), def.default.to_string());
            }
        }
    }

    /// Drop keys outside the known-key registry
    pub fn retain_known(&mut self) {
        self.values.retain(|key, _| keys::is_known(key));
    }

    /// True when both maps agree on every known key (absent == absent)
    pub fn equal_on_known(&self, other: &SettingsMap) -> bool {
        KNOWN_KEYS
            .iter()
            .all(|def| self.get(def.id) == other.get(def.id))
    }

    /// Copy of `self` without keys outside the registry
    pub fn known_subset(&self) -> SettingsMap {
        let mut subset = SettingsMap::new();
        for def in KNOWN_KEYS {
            if let Some(value) = self.get(def.id) {
                subset.insert(def.id, value);
            }
        }
        subset
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SettingsMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_cover_known_keys() {
        let map = SettingsMap::defaults();
        assert_eq!(map.len(), KNOWN_KEYS.len());
        assert_eq!(map.get(keys::TAB_CHAR), Some(keys::TAB_POLICY_TAB));
    }

    #[test]
    fn test_complete_keeps_existing_values() {
        let mut map: SettingsMap = [(keys::TAB_SIZE, "8")].into_iter().collect();
        map.complete();
        assert_eq!(map.get(keys::TAB_SIZE), Some("8"));
        assert_eq!(map.get(keys::INDENTATION_SIZE), Some("4"));
    }

    #[test]
    fn test_canonical_entries_order() {
        let map: SettingsMap = [
            ("zzz_unknown", "1"),
            (keys::INDENTATION_SIZE, "2"),
            ("aaa_unknown", "1"),
            (keys::TAB_CHAR, "space"),
        ]
        .into_iter()
        .collect();

        let order: Vec<&str> = map.canonical_entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            order,
            vec![keys::TAB_CHAR, keys::INDENTATION_SIZE, "aaa_unknown", "zzz_unknown"]
        );
    }

    #[test]
    fn test_equal_on_known_ignores_unknown_keys() {
        let mut a = SettingsMap::defaults();
        let b = SettingsMap::defaults();
        a.insert("vendor_extension", "x");
        assert!(a.equal_on_known(&b));

        a.insert(keys::LINE_SPLIT, "100");
        assert!(!a.equal_on_known(&b));
    }

    #[test]
    fn test_swap_values() {
        let mut map: SettingsMap = [(keys::TAB_SIZE, "8"), (keys::INDENTATION_SIZE, "2")]
            .into_iter()
            .collect();
        map.swap_values(keys::TAB_SIZE, keys::INDENTATION_SIZE);
        assert_eq!(map.get(keys::TAB_SIZE), Some("2"));
        assert_eq!(map.get(keys::INDENTATION_SIZE), Some("8"));

        map.remove(keys::TAB_SIZE);
        map.swap_values(keys::TAB_SIZE, keys::INDENTATION_SIZE);
        assert_eq!(map.get(keys::TAB_SIZE), Some("8"));
        assert_eq!(map.get(keys::INDENTATION_SIZE), None);
    }
}
